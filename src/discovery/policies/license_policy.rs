use crate::discovery::domain::NOASSERTION;

/// Registry license strings longer than this are full license texts, not ids
const MAX_LICENSE_ID_LENGTH: usize = 100;

/// Common registry spellings mapped onto SPDX identifiers
const SPDX_ALIASES: &[(&str, &str)] = &[
    ("mit", "MIT"),
    ("mit license", "MIT"),
    ("the mit license", "MIT"),
    ("apache", "Apache-2.0"),
    ("apache 2", "Apache-2.0"),
    ("apache 2.0", "Apache-2.0"),
    ("apache-2", "Apache-2.0"),
    ("apache license 2.0", "Apache-2.0"),
    ("apache license, version 2.0", "Apache-2.0"),
    ("apache software license", "Apache-2.0"),
    ("apache software license 2.0", "Apache-2.0"),
    ("bsd", "BSD-3-Clause"),
    ("bsd license", "BSD-3-Clause"),
    ("new bsd license", "BSD-3-Clause"),
    ("bsd 3-clause", "BSD-3-Clause"),
    ("3-clause bsd license", "BSD-3-Clause"),
    ("bsd 2-clause", "BSD-2-Clause"),
    ("simplified bsd license", "BSD-2-Clause"),
    ("isc license", "ISC"),
    ("isc license (iscl)", "ISC"),
    ("mozilla public license 2.0 (mpl 2.0)", "MPL-2.0"),
    ("mpl 2.0", "MPL-2.0"),
    ("gplv2", "GPL-2.0-only"),
    ("gplv3", "GPL-3.0-only"),
    ("gnu general public license v3 (gplv3)", "GPL-3.0-only"),
    ("gnu general public license v2 (gplv2)", "GPL-2.0-only"),
    ("lgplv3", "LGPL-3.0-only"),
    ("gnu lesser general public license v3 (lgplv3)", "LGPL-3.0-only"),
    ("python software foundation license", "PSF-2.0"),
    ("the unlicense (unlicense)", "Unlicense"),
    ("ruby", "Ruby"),
];

/// LicensePolicy for deciding which license values count as known
///
/// Registries return licenses in many shapes: SPDX ids, human names,
/// full license texts, PyPI classifiers. This policy decides what is
/// "missing" and folds the rest onto SPDX identifiers where a mapping is known.
///
/// PyPI priority order:
/// 1. license_expression field (PEP 639, already SPDX)
/// 2. license field (if non-empty, not "UNKNOWN" and not a full license text)
/// 3. OSI Approved license from classifiers
pub struct LicensePolicy;

impl LicensePolicy {
    /// Whether a stored license value still needs enrichment.
    pub fn is_missing(license: Option<&str>) -> bool {
        match license.map(str::trim) {
            None => true,
            Some(value) => {
                value.is_empty()
                    || value.eq_ignore_ascii_case(NOASSERTION)
                    || value.eq_ignore_ascii_case("NONE")
                    || value.eq_ignore_ascii_case("UNKNOWN")
            }
        }
    }

    /// Normalizes a registry license string.
    ///
    /// # Arguments
    /// * `license` - Raw value from a registry response
    ///
    /// # Returns
    /// The SPDX id when a mapping is known, the trimmed input otherwise, or
    /// None when the value carries no license information
    pub fn normalize(license: &str) -> Option<String> {
        let trimmed = license.trim();
        if Self::is_missing(Some(trimmed)) || trimmed.len() > MAX_LICENSE_ID_LENGTH {
            return None;
        }
        let lower = trimmed.to_lowercase();
        let mapped = SPDX_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, id)| id.to_string());
        Some(mapped.unwrap_or_else(|| trimmed.to_string()))
    }

    /// Selects the most appropriate license from PyPI package metadata
    ///
    /// # Arguments
    /// * `license` - License field from package metadata
    /// * `license_expression` - License expression field from package metadata
    /// * `classifiers` - List of classifier strings from package metadata
    ///
    /// # Returns
    /// The selected, normalized license, or None if no valid license found
    pub fn select_pypi_license(
        license: Option<&str>,
        license_expression: Option<&str>,
        classifiers: &[String],
    ) -> Option<String> {
        license_expression
            .and_then(Self::normalize)
            .or_else(|| license.and_then(Self::normalize))
            .or_else(|| {
                Self::extract_license_from_classifiers(classifiers).and_then(Self::normalize)
            })
    }

    /// Looks for classifiers with the prefix "License :: OSI Approved :: "
    /// and extracts the license name.
    fn extract_license_from_classifiers(classifiers: &[String]) -> Option<&str> {
        classifiers
            .iter()
            .find_map(|classifier| classifier.strip_prefix("License :: OSI Approved :: "))
    }
}
