use super::GraphSyncSummary;
use crate::application::use_cases::EnrichmentHandle;
use crate::discovery::domain::{Confidence, EnrichmentGapReport};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncStatus {
    Acquired,
    NoData,
}

/// Serializable outcome of one product sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub product: String,
    pub status: SyncStatus,
    /// Provenance tag such as `lockfile:yarn.lock`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub package_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphSyncSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detected_languages: Vec<String>,
    /// Filled in by callers that wait for background enrichment
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enrichment: Vec<EnrichmentGapReport>,
}

impl SyncSummary {
    pub fn no_data(product: &str) -> Self {
        Self {
            product: product.to_string(),
            status: SyncStatus::NoData,
            source: None,
            package_count: 0,
            graph: None,
            confidence: None,
            detected_languages: Vec::new(),
            enrichment: Vec::new(),
        }
    }

    /// Total gaps across the attached enrichment reports
    pub fn total_gaps(&self) -> usize {
        self.enrichment.iter().map(|report| report.gaps.total()).sum()
    }
}

/// SyncResponse - result DTO of the product sync use case
///
/// The summary is final when returned; enrichment, if requested, is still
/// running on its own task behind `enrichment`.
#[derive(Debug)]
pub struct SyncResponse {
    pub summary: SyncSummary,
    pub enrichment: Option<EnrichmentHandle>,
}
