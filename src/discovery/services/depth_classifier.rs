use crate::discovery::domain::{DependencyDepth, DependencyDocument, RELATIONSHIP_DEPENDS_ON};
use std::collections::HashSet;

/// Inverse relationship types: `A <TYPE> B` means B depends on A
const INVERSE_DEPENDENCY_TYPES: [&str; 6] = [
    "DEPENDENCY_OF",
    "DEV_DEPENDENCY_OF",
    "BUILD_DEPENDENCY_OF",
    "TEST_DEPENDENCY_OF",
    "RUNTIME_DEPENDENCY_OF",
    "OPTIONAL_DEPENDENCY_OF",
];

/// Set of purls the root package depends on directly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthClassification {
    direct: HashSet<String>,
}

impl DepthClassification {
    /// Every purl outside the direct set is transitive, including packages the
    /// relationship document never mentions.
    pub fn depth_of(&self, purl: &str) -> DependencyDepth {
        if self.direct.contains(purl) {
            DependencyDepth::Direct
        } else {
            DependencyDepth::Transitive
        }
    }

    pub fn direct_count(&self) -> usize {
        self.direct.len()
    }
}

/// DepthClassifier service for direct/transitive edge classification
///
/// Pure logic over a [`DependencyDocument`]; writing the result to the graph
/// is the caller's job.
pub struct DepthClassifier;

impl DepthClassifier {
    /// Computes the direct set from the document's relationships.
    ///
    /// # Arguments
    /// * `document` - Dependency document, possibly without relationships
    ///
    /// # Returns
    /// `None` when the document carries no relationship data or does not say
    /// which package it describes. Depth must then stay unset rather than be
    /// guessed.
    pub fn classify(document: &DependencyDocument) -> Option<DepthClassification> {
        let relationships = document.relationships.as_ref()?;
        let root = document.described_root()?;

        let direct_ids = relationships.iter().filter_map(|rel| {
            let forward =
                rel.spdx_element_id == root && rel.relationship_type == RELATIONSHIP_DEPENDS_ON;
            let inverse = rel.related_spdx_element == root
                && INVERSE_DEPENDENCY_TYPES.contains(&rel.relationship_type.as_str());
            if forward {
                Some(rel.related_spdx_element.as_str())
            } else if inverse {
                Some(rel.spdx_element_id.as_str())
            } else {
                None
            }
        });

        let direct = direct_ids
            .filter(|id| *id != root)
            .filter_map(|id| document.find_package(id))
            .map(|package| package.canonical_purl())
            .collect();

        Some(DepthClassification { direct })
    }
}
