use super::Ecosystem;

/// Version-prefix operators stripped before a version is emitted.
///
/// Ordered so that two-character operators are tried before their
/// single-character prefixes.
const VERSION_PREFIXES: [&str; 9] = ["==", ">=", "<=", "~=", "^", "~", "=", ">", "<"];

/// Purl builder and parser for canonical package identities
///
/// Canonical form is `pkg:<ecosystem>/<path>@<version>`, where the path is
/// the ecosystem-specific canonical name and `@<version>` is omitted when the
/// version is unknown.
pub struct Purl;

impl Purl {
    /// Builds the canonical purl for a package.
    ///
    /// Canonicalization rules per ecosystem:
    /// - npm: a leading `@` of a scoped name is percent-encoded (`%40`)
    /// - pip: the name is lowercased
    /// - maven: `group:artifact` becomes `group/artifact`
    /// - everything else keeps its full path (Go import paths included)
    pub fn build(ecosystem: Ecosystem, name: &str, version: &str) -> String {
        let path = Self::canonical_path(ecosystem, name.trim());
        let version = version.trim();
        if version.is_empty() {
            format!("pkg:{}/{}", ecosystem.as_str(), path)
        } else {
            format!("pkg:{}/{}@{}", ecosystem.as_str(), path, version)
        }
    }

    fn canonical_path(ecosystem: Ecosystem, name: &str) -> String {
        match ecosystem {
            Ecosystem::Npm => match name.strip_prefix('@') {
                Some(rest) => format!("%40{}", rest),
                None => name.to_string(),
            },
            Ecosystem::Pip => name.to_lowercase(),
            Ecosystem::Maven => name.replacen(':', "/", 1),
            _ => name.to_string(),
        }
    }

    /// Parses any purl, standard or canonical, ignoring qualifiers and subpath.
    ///
    /// Returns `None` when the string is not a purl at all.
    pub fn parse(purl: &str) -> Option<ParsedPurl> {
        let rest = purl.trim().strip_prefix("pkg:")?;
        let rest = rest.split(['?', '#']).next().unwrap_or(rest);
        let (purl_type, path_and_version) = rest.split_once('/')?;
        if purl_type.is_empty() || path_and_version.is_empty() {
            return None;
        }

        let last_slash = path_and_version.rfind('/').unwrap_or(0);
        let (path, version) = match path_and_version.rfind('@') {
            Some(at) if at > 0 && at >= last_slash => (
                &path_and_version[..at],
                Some(path_and_version[at + 1..].to_string()),
            ),
            _ => (path_and_version, None),
        };

        Some(ParsedPurl {
            ecosystem: Ecosystem::from_purl_type(purl_type),
            path: path.replace("%40", "@").replace("%2F", "/"),
            version: version.filter(|v| !v.is_empty()),
        })
    }

    /// Rewrites an arbitrary purl into canonical form.
    ///
    /// Tier-1 documents carry upstream purls (`pkg:pypi/Django@v4.2`); the
    /// graph is keyed by the canonical rendition (`pkg:pip/django@4.2`).
    pub fn canonicalize(purl: &str) -> Option<String> {
        let parsed = Self::parse(purl)?;
        let version = parsed
            .version
            .as_deref()
            .map(strip_version_prefix)
            .unwrap_or_default();
        Some(Self::build(parsed.ecosystem, &parsed.name(), &version))
    }
}

/// Components of a parsed purl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPurl {
    pub ecosystem: Ecosystem,
    pub path: String,
    pub version: Option<String>,
}

impl ParsedPurl {
    /// Ecosystem-local display name derived from the purl path.
    pub fn name(&self) -> String {
        match self.ecosystem {
            Ecosystem::Maven => self.path.replacen('/', ":", 1),
            _ => self.path.clone(),
        }
    }
}

/// Strips range operators and a leading `v` from a version string.
///
/// `^1.2.3`, `>=1.2.3`, `~> 1.2`, `v1.2.3` all become the bare version.
/// A leading `v` is only dropped when a digit follows it, so `vendor-1`
/// style tags stay intact.
pub fn strip_version_prefix(version: &str) -> String {
    let mut rest = version.trim();

    loop {
        let before = rest;
        if let Some(stripped) = rest.strip_prefix("~>") {
            rest = stripped.trim_start();
        }
        for prefix in VERSION_PREFIXES {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                rest = stripped.trim_start();
                break;
            }
        }
        if before == rest {
            break;
        }
    }

    if let Some(stripped) = rest.strip_prefix(['v', 'V']) {
        if stripped.starts_with(|c: char| c.is_ascii_digit()) {
            rest = stripped;
        }
    }

    rest.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_plain_package() {
        assert_eq!(
            Purl::build(Ecosystem::Npm, "lodash", "4.17.21"),
            "pkg:npm/lodash@4.17.21"
        );
    }

    #[test]
    fn test_build_scoped_npm_package_encodes_at_sign() {
        assert_eq!(
            Purl::build(Ecosystem::Npm, "@types/node", "20.1.0"),
            "pkg:npm/%40types/node@20.1.0"
        );
    }

    #[test]
    fn test_build_python_lowercases_name() {
        assert_eq!(
            Purl::build(Ecosystem::Pip, "Django", "4.2.1"),
            "pkg:pip/django@4.2.1"
        );
    }

    #[test]
    fn test_build_go_keeps_import_path() {
        assert_eq!(
            Purl::build(Ecosystem::Go, "github.com/spf13/cobra", "1.8.0"),
            "pkg:go/github.com/spf13/cobra@1.8.0"
        );
    }

    #[test]
    fn test_build_without_version_omits_at() {
        assert_eq!(Purl::build(Ecosystem::Gem, "rails", ""), "pkg:gem/rails");
    }

    #[test]
    fn test_build_maven_splits_group() {
        assert_eq!(
            Purl::build(Ecosystem::Maven, "org.slf4j:slf4j-api", "2.0.9"),
            "pkg:maven/org.slf4j/slf4j-api@2.0.9"
        );
    }

    #[test]
    fn test_parse_scoped_npm() {
        let parsed = Purl::parse("pkg:npm/%40babel/core@7.22.0").unwrap();
        assert_eq!(parsed.ecosystem, Ecosystem::Npm);
        assert_eq!(parsed.path, "@babel/core");
        assert_eq!(parsed.version.as_deref(), Some("7.22.0"));
    }

    #[test]
    fn test_parse_unencoded_scope_without_version() {
        let parsed = Purl::parse("pkg:npm/@babel/core").unwrap();
        assert_eq!(parsed.path, "@babel/core");
        assert!(parsed.version.is_none());
    }

    #[test]
    fn test_parse_drops_qualifiers() {
        let parsed = Purl::parse("pkg:pypi/requests@2.31.0?repository_url=x#sub").unwrap();
        assert_eq!(parsed.ecosystem, Ecosystem::Pip);
        assert_eq!(parsed.version.as_deref(), Some("2.31.0"));
    }

    #[test]
    fn test_parse_rejects_non_purl() {
        assert!(Purl::parse("npm:lodash").is_none());
        assert!(Purl::parse("pkg:npm").is_none());
    }

    #[test]
    fn test_canonicalize_standard_purls() {
        assert_eq!(
            Purl::canonicalize("pkg:pypi/Django@4.2.1").as_deref(),
            Some("pkg:pip/django@4.2.1")
        );
        assert_eq!(
            Purl::canonicalize("pkg:golang/github.com/spf13/cobra@v1.8.0").as_deref(),
            Some("pkg:go/github.com/spf13/cobra@1.8.0")
        );
        assert_eq!(
            Purl::canonicalize("pkg:npm/%40types/node@^20.1.0").as_deref(),
            Some("pkg:npm/%40types/node@20.1.0")
        );
    }

    #[test]
    fn test_strip_version_prefix() {
        assert_eq!(strip_version_prefix("^1.2.3"), "1.2.3");
        assert_eq!(strip_version_prefix("~1.2.3"), "1.2.3");
        assert_eq!(strip_version_prefix(">= 1.2"), "1.2");
        assert_eq!(strip_version_prefix("==2.31.0"), "2.31.0");
        assert_eq!(strip_version_prefix("~> 7.0"), "7.0");
        assert_eq!(strip_version_prefix("v1.8.0"), "1.8.0");
        assert_eq!(strip_version_prefix("vendor-1"), "vendor-1");
        assert_eq!(strip_version_prefix(""), "");
    }
}
