use crate::application::dto::SyncSummary;
use crate::shared::Result;

/// ReportFormatter port for rendering the sync report
///
/// This port abstracts the rendering of a finished sync (JSON, plain
/// summary text) from where the result is presented.
pub trait ReportFormatter {
    /// Renders a sync summary
    ///
    /// # Arguments
    /// * `summary` - Outcome of one product sync, with enrichment reports
    ///   attached when the caller waited for them
    ///
    /// # Returns
    /// Rendered report content
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, summary: &SyncSummary) -> Result<String>;
}
