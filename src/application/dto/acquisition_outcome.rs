use crate::discovery::domain::{DependencyDocument, SbomSource};
use serde::Serialize;

/// Result of tiered acquisition
///
/// `NoData` is a legitimate terminal state, not an error: the product
/// simply has no detectable dependency source yet.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionOutcome {
    Acquired {
        document: DependencyDocument,
        source: SbomSource,
    },
    NoData,
}

impl AcquisitionOutcome {
    pub fn source(&self) -> Option<&SbomSource> {
        match self {
            AcquisitionOutcome::Acquired { source, .. } => Some(source),
            AcquisitionOutcome::NoData => None,
        }
    }

    pub fn document(&self) -> Option<&DependencyDocument> {
        match self {
            AcquisitionOutcome::Acquired { document, .. } => Some(document),
            AcquisitionOutcome::NoData => None,
        }
    }
}

/// What one graph sync wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSyncSummary {
    /// Unique purls upserted
    pub nodes: usize,
    /// Direct edge count; `None` when depth was left unclassified
    pub direct: Option<usize>,
    pub transitive: Option<usize>,
}
