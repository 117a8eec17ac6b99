use crate::discovery::domain::EnrichmentGapReport;
use crate::ports::outbound::ComplianceNotifier;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// LoggingComplianceNotifier adapter that logs gap reports
///
/// Reports with gaps are logged at `warn`, clean runs at `info`. Every
/// report is also retained so the CLI can print and threshold them after
/// the background run finishes.
#[derive(Default)]
pub struct LoggingComplianceNotifier {
    reports: Mutex<Vec<(String, EnrichmentGapReport)>>,
}

impl LoggingComplianceNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far, in arrival order
    pub fn reports(&self) -> Vec<(String, EnrichmentGapReport)> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ComplianceNotifier for LoggingComplianceNotifier {
    async fn notify(&self, product: &str, report: &EnrichmentGapReport) -> Result<()> {
        if report.has_gaps() {
            tracing::warn!(
                product,
                kind = %report.kind,
                no_version = report.gaps.no_version,
                unsupported_ecosystem = report.gaps.unsupported_ecosystem,
                not_found = report.gaps.not_found,
                fetch_error = report.gaps.fetch_error,
                "compliance gaps after enrichment"
            );
        } else {
            tracing::info!(product, kind = %report.kind, enriched = report.enriched, "enrichment complete without gaps");
        }

        self.reports
            .lock()
            .map_err(|_| anyhow::anyhow!("Report log lock poisoned"))?
            .push((product.to_string(), report.clone()));
        Ok(())
    }
}
