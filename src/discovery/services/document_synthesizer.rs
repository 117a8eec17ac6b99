use super::ImportScanResult;
use crate::discovery::domain::{
    DependencyDocument, DocumentPackage, LockfileParseResult, ParsedDependency, DOCUMENT_SPDX_ID,
};

/// Builds tier-1-shaped documents from lockfile and import-scan results
///
/// Synthesized documents never carry relationships: neither source says
/// which package the product is, so depth stays unclassified and only the
/// parser's direct hint travels along.
pub struct DocumentSynthesizer;

impl DocumentSynthesizer {
    pub fn from_lockfile(product: &str, result: &LockfileParseResult) -> DependencyDocument {
        DependencyDocument {
            spdx_id: DOCUMENT_SPDX_ID.to_string(),
            name: product.to_string(),
            packages: Self::packages(&result.dependencies),
            ..Default::default()
        }
    }

    pub fn from_import_scan(product: &str, result: &ImportScanResult) -> DependencyDocument {
        DependencyDocument {
            spdx_id: DOCUMENT_SPDX_ID.to_string(),
            name: product.to_string(),
            packages: Self::packages(&result.dependencies),
            relationships: None,
            confidence: Some(result.confidence),
            detected_languages: result.languages.clone(),
        }
    }

    fn packages(dependencies: &[ParsedDependency]) -> Vec<DocumentPackage> {
        dependencies
            .iter()
            .enumerate()
            .map(|(index, dependency)| DocumentPackage {
                spdx_id: format!("SPDXRef-Package-{}", index + 1),
                name: dependency.name.clone(),
                version_info: (!dependency.version.is_empty()).then(|| dependency.version.clone()),
                external_refs: vec![DocumentPackage::purl_ref(&dependency.purl)],
                direct_hint: Some(dependency.is_direct),
                ..Default::default()
            })
            .collect()
    }
}
