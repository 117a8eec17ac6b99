use crate::discovery::domain::{DependencyNode, Ecosystem, EnrichmentKind, GapReason};
use crate::discovery::policies::LicensePolicy;
use std::collections::HashSet;

/// Triage outcome for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageDecision {
    Eligible,
    Gap(GapReason),
}

/// EnrichmentTriage service: selection and triage for enrichment runs
///
/// Gap reasons are checked in priority order: a missing version beats an
/// unsupported ecosystem, which beats a `notFound` answer remembered from an
/// earlier run. Remembered fetch errors are retried.
#[derive(Debug, Clone)]
pub struct EnrichmentTriage {
    supported: HashSet<Ecosystem>,
}

impl EnrichmentTriage {
    pub fn new(supported: impl IntoIterator<Item = Ecosystem>) -> Self {
        Self {
            supported: supported.into_iter().collect(),
        }
    }

    /// Whether the node still lacks the attribute this run fills in.
    pub fn needs_enrichment(kind: EnrichmentKind, node: &DependencyNode) -> bool {
        match kind {
            EnrichmentKind::Hash => node.hash.as_deref().is_none_or(|h| h.trim().is_empty()),
            EnrichmentKind::License => LicensePolicy::is_missing(node.license.as_deref()),
        }
    }

    pub fn decide(&self, kind: EnrichmentKind, node: &DependencyNode) -> TriageDecision {
        if !node.has_version() {
            TriageDecision::Gap(GapReason::NoVersion)
        } else if !self.supported.contains(&node.ecosystem) {
            TriageDecision::Gap(GapReason::UnsupportedEcosystem)
        } else if node.gap_reason(kind) == Some(GapReason::NotFound) {
            TriageDecision::Gap(GapReason::NotFound)
        } else {
            TriageDecision::Eligible
        }
    }

    /// Splits nodes into lookup candidates and triage gaps.
    pub fn partition(
        &self,
        kind: EnrichmentKind,
        nodes: Vec<DependencyNode>,
    ) -> (Vec<DependencyNode>, Vec<(DependencyNode, GapReason)>) {
        let mut eligible = Vec::new();
        let mut gaps = Vec::new();
        for node in nodes {
            match self.decide(kind, &node) {
                TriageDecision::Eligible => eligible.push(node),
                TriageDecision::Gap(reason) => gaps.push((node, reason)),
            }
        }
        (eligible, gaps)
    }
}
