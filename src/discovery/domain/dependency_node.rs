use super::{Ecosystem, EnrichmentKind};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOASSERTION: &str = "NOASSERTION";

/// Direct/transitive classification of a product→dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyDepth {
    Direct,
    Transitive,
}

impl fmt::Display for DependencyDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyDepth::Direct => write!(f, "direct"),
            DependencyDepth::Transitive => write!(f, "transitive"),
        }
    }
}

/// Why an enrichment attribute could not be determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GapReason {
    NoVersion,
    UnsupportedEcosystem,
    NotFound,
    FetchError,
}

impl fmt::Display for GapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GapReason::NoVersion => "noVersion",
            GapReason::UnsupportedEcosystem => "unsupportedEcosystem",
            GapReason::NotFound => "notFound",
            GapReason::FetchError => "fetchError",
        };
        write!(f, "{}", text)
    }
}

/// Mutable attributes written on every sync of a node
///
/// Enrichment-owned fields (hash, license gaps) are not part of this set so
/// that a re-sync never wipes what enrichment already found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    pub name: String,
    pub version: String,
    pub ecosystem: Ecosystem,
    /// Only overwrites when the source actually asserted a license
    pub license: Option<String>,
    pub supplier: Option<String>,
}

/// Durable graph node, keyed by canonical purl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub purl: String,
    pub name: String,
    pub version: String,
    pub ecosystem: Ecosystem,
    pub license: Option<String>,
    pub supplier: Option<String>,
    pub hash: Option<String>,
    pub hash_algorithm: Option<String>,
    pub license_gap_reason: Option<GapReason>,
    pub hash_gap_reason: Option<GapReason>,
}

impl DependencyNode {
    pub fn new(purl: &str, attrs: NodeAttributes) -> Self {
        Self {
            purl: purl.to_string(),
            name: attrs.name,
            version: attrs.version,
            ecosystem: attrs.ecosystem,
            license: Some(attrs.license.unwrap_or_else(|| NOASSERTION.to_string())),
            supplier: attrs.supplier,
            hash: None,
            hash_algorithm: None,
            license_gap_reason: None,
            hash_gap_reason: None,
        }
    }

    /// Merge semantics for re-syncs: overwrite mutable attributes, keep
    /// enrichment results unless the source now asserts a license.
    pub fn merge(&mut self, attrs: NodeAttributes) {
        self.name = attrs.name;
        self.version = attrs.version;
        self.ecosystem = attrs.ecosystem;
        if let Some(license) = attrs.license {
            self.license = Some(license);
            self.license_gap_reason = None;
        }
        if attrs.supplier.is_some() {
            self.supplier = attrs.supplier;
        }
    }

    /// Gap recorded by the last enrichment run of `kind`
    pub fn gap_reason(&self, kind: EnrichmentKind) -> Option<GapReason> {
        match kind {
            EnrichmentKind::Hash => self.hash_gap_reason,
            EnrichmentKind::License => self.license_gap_reason,
        }
    }

    pub fn has_version(&self) -> bool {
        !self.version.trim().is_empty()
    }
}

/// Attributes of a `DEPENDS_ON` edge from a product to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeAttributes {
    /// `None` until a relationship document classified the edge
    pub depth: Option<DependencyDepth>,
    /// Parser-level hint from lockfile/import tiers
    pub direct_hint: Option<bool>,
}
