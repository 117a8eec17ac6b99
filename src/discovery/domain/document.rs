use super::{Ecosystem, Purl};
use serde::{Deserialize, Serialize};

pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";
pub const RELATIONSHIP_DESCRIBES: &str = "DESCRIBES";
pub const RELATIONSHIP_DEPENDS_ON: &str = "DEPENDS_ON";

/// Canonical dependency-bearing document
///
/// SPDX 2.3 JSON shaped so that provider SBOMs deserialize into it directly.
/// Lockfile and import-scan tiers synthesize the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDocument {
    #[serde(rename = "SPDXID", default = "default_document_id")]
    pub spdx_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub packages: Vec<DocumentPackage>,
    /// `None` means the source carried no relationship information at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
    /// Only set for import-scan documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detected_languages: Vec<String>,
}

fn default_document_id() -> String {
    DOCUMENT_SPDX_ID.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPackage {
    #[serde(rename = "SPDXID", default)]
    pub spdx_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<ExternalRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_declared: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checksums: Vec<Checksum>,
    /// Parser-level direct/transitive hint for synthesized documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_hint: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRef {
    #[serde(default)]
    pub reference_category: String,
    pub reference_type: String,
    pub reference_locator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checksum {
    pub algorithm: String,
    pub checksum_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub spdx_element_id: String,
    pub relationship_type: String,
    pub related_spdx_element: String,
}

impl Relationship {
    pub fn new(from: &str, relationship_type: &str, to: &str) -> Self {
        Self {
            spdx_element_id: from.to_string(),
            relationship_type: relationship_type.to_string(),
            related_spdx_element: to.to_string(),
        }
    }
}

/// How much an import-scan document can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl DependencyDocument {
    /// Element id of the root package the document describes, if declared.
    pub fn described_root(&self) -> Option<&str> {
        self.relationships.as_ref()?.iter().find_map(|rel| {
            let from_document =
                rel.spdx_element_id == self.spdx_id || rel.spdx_element_id == DOCUMENT_SPDX_ID;
            (from_document && rel.relationship_type == RELATIONSHIP_DESCRIBES)
                .then_some(rel.related_spdx_element.as_str())
        })
    }

    /// Packages other than the root/self-describing entry.
    pub fn dependency_packages(&self) -> impl Iterator<Item = &DocumentPackage> {
        let root = self.described_root().map(str::to_string);
        self.packages
            .iter()
            .filter(move |pkg| root.as_deref() != Some(pkg.spdx_id.as_str()))
    }

    pub fn find_package(&self, spdx_id: &str) -> Option<&DocumentPackage> {
        self.packages.iter().find(|pkg| pkg.spdx_id == spdx_id)
    }
}

impl DocumentPackage {
    /// Canonical purl: the purl external reference when present, otherwise
    /// one constructed from name and version.
    pub fn canonical_purl(&self) -> String {
        self.external_refs
            .iter()
            .filter(|r| r.reference_type.eq_ignore_ascii_case("purl"))
            .find_map(|r| Purl::canonicalize(&r.reference_locator))
            .unwrap_or_else(|| {
                let (ecosystem, name) = self.ecosystem_and_name();
                Purl::build(ecosystem, &name, self.version().unwrap_or_default())
            })
    }

    pub fn version(&self) -> Option<&str> {
        self.version_info
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != "NOASSERTION")
    }

    /// Splits provider names like `npm:lodash` into ecosystem and name.
    pub fn ecosystem_and_name(&self) -> (Ecosystem, String) {
        match self.name.split_once(':') {
            Some((prefix, rest)) if !rest.is_empty() => {
                let ecosystem = Ecosystem::from_purl_type(prefix);
                if ecosystem == Ecosystem::Generic {
                    (Ecosystem::Generic, self.name.clone())
                } else {
                    (ecosystem, rest.to_string())
                }
            }
            _ => (Ecosystem::Generic, self.name.clone()),
        }
    }

    /// Declared license wins over the concluded one; `NOASSERTION` when neither.
    pub fn license(&self) -> Option<&str> {
        [self.license_declared.as_deref(), self.license_concluded.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|l| !l.is_empty() && *l != "NOASSERTION" && *l != "NONE")
    }

    pub fn purl_ref(purl: &str) -> ExternalRef {
        ExternalRef {
            reference_category: "PACKAGE-MANAGER".to_string(),
            reference_type: "purl".to_string(),
            reference_locator: purl.to_string(),
        }
    }
}
