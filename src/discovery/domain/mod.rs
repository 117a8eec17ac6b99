pub mod dependency_node;
pub mod document;
pub mod ecosystem;
pub mod gap_report;
pub mod parsed_dependency;
pub mod purl;
pub mod registry_metadata;
pub mod sbom_snapshot;

pub use dependency_node::{
    DependencyDepth, DependencyNode, EdgeAttributes, GapReason, NodeAttributes, NOASSERTION,
};
pub use document::{
    Checksum, Confidence, DependencyDocument, DocumentPackage, ExternalRef, Relationship,
    DOCUMENT_SPDX_ID, RELATIONSHIP_DEPENDS_ON, RELATIONSHIP_DESCRIBES,
};
pub use ecosystem::Ecosystem;
pub use gap_report::{EnrichmentGapReport, EnrichmentKind, GapCounts};
pub use parsed_dependency::{DependencyCollector, LockfileParseResult, ParsedDependency};
pub use purl::{strip_version_prefix, ParsedPurl, Purl};
pub use registry_metadata::{PackageHash, RegistryMetadata};
pub use sbom_snapshot::{SbomSnapshot, SbomSource};
