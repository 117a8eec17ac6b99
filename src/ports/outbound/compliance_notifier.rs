use crate::discovery::domain::EnrichmentGapReport;
use crate::shared::Result;
use async_trait::async_trait;

/// ComplianceNotifier port receiving enrichment gap reports
///
/// Whether and how stakeholders get alerted is the implementation's call;
/// the enrichment pipeline only classifies.
#[async_trait]
pub trait ComplianceNotifier: Send + Sync {
    async fn notify(&self, product: &str, report: &EnrichmentGapReport) -> Result<()>;
}
