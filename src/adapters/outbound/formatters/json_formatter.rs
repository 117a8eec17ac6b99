use crate::application::dto::SyncSummary;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// JsonFormatter adapter rendering the sync summary as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, summary: &SyncSummary) -> Result<String> {
        let mut json = serde_json::to_string_pretty(summary)?;
        json.push('\n');
        Ok(json)
    }
}
