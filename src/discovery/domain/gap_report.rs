use super::GapReason;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which attribute an enrichment run fills in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentKind {
    Hash,
    License,
}

impl fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentKind::Hash => write!(f, "hash"),
            EnrichmentKind::License => write!(f, "license"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapCounts {
    pub no_version: usize,
    pub unsupported_ecosystem: usize,
    pub not_found: usize,
    pub fetch_error: usize,
}

impl GapCounts {
    pub fn record(&mut self, reason: GapReason) {
        match reason {
            GapReason::NoVersion => self.no_version += 1,
            GapReason::UnsupportedEcosystem => self.unsupported_ecosystem += 1,
            GapReason::NotFound => self.not_found += 1,
            GapReason::FetchError => self.fetch_error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.no_version + self.unsupported_ecosystem + self.not_found + self.fetch_error
    }
}

/// Aggregate outcome of one enrichment run
///
/// `skipped` counts triage gaps (no version, unsupported ecosystem) and
/// `failed` counts lookup gaps (not found, fetch error), so
/// `enriched + skipped + failed == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentGapReport {
    pub kind: EnrichmentKind,
    pub total: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub failed: usize,
    pub gaps: GapCounts,
}

impl EnrichmentGapReport {
    pub fn new(kind: EnrichmentKind, total: usize) -> Self {
        Self {
            kind,
            total,
            enriched: 0,
            skipped: 0,
            failed: 0,
            gaps: GapCounts::default(),
        }
    }

    pub fn record_enriched(&mut self) {
        self.enriched += 1;
    }

    pub fn record_gap(&mut self, reason: GapReason) {
        match reason {
            GapReason::NoVersion | GapReason::UnsupportedEcosystem => self.skipped += 1,
            GapReason::NotFound | GapReason::FetchError => self.failed += 1,
        }
        self.gaps.record(reason);
    }

    pub fn is_balanced(&self) -> bool {
        self.enriched + self.skipped + self.failed == self.total
    }

    pub fn has_gaps(&self) -> bool {
        self.gaps.total() > 0
    }
}

impl fmt::Display for EnrichmentGapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} enrichment: {} enriched, {} skipped, {} failed out of {} (noVersion={}, unsupportedEcosystem={}, notFound={}, fetchError={})",
            self.kind,
            self.enriched,
            self.skipped,
            self.failed,
            self.total,
            self.gaps.no_version,
            self.gaps.unsupported_ecosystem,
            self.gaps.not_found,
            self.gaps.fetch_error
        )
    }
}
