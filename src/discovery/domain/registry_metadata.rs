/// Package metadata returned by a registry lookup
///
/// A registry may know a package yet lack one of the attributes; each
/// enrichment pass looks only at the field it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryMetadata {
    pub license: Option<String>,
    pub hash: Option<PackageHash>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageHash {
    pub algorithm: String,
    pub value: String,
}

impl PackageHash {
    pub fn new(algorithm: &str, value: &str) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            value: value.to_string(),
        }
    }

    /// Splits SRI strings such as `sha512-<base64>` into algorithm and digest.
    pub fn from_integrity(integrity: &str) -> Option<Self> {
        let (algorithm, value) = integrity.trim().split_once('-')?;
        if algorithm.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self::new(&algorithm.to_uppercase(), value))
    }
}
