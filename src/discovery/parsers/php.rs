use super::pinned_version;
use crate::discovery::domain::{
    strip_version_prefix, DependencyCollector, Ecosystem, ParsedDependency,
};
use crate::shared::Result;
use serde_json::Value;

/// Parses composer.lock (`packages` and `packages-dev`)
pub(super) fn parse_composer_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: Value = serde_json::from_str(content)?;
    let mut collector = DependencyCollector::new();

    for section in ["packages", "packages-dev"] {
        let Some(packages) = parsed.get(section).and_then(|v| v.as_array()) else {
            continue;
        };
        for package in packages {
            let Some(name) = package.get("name").and_then(|v| v.as_str()) else {
                continue;
            };
            let version = package
                .get("version")
                .and_then(|v| v.as_str())
                .map(strip_version_prefix)
                .unwrap_or_default();
            collector.push(name, &version, Ecosystem::Composer, false);
        }
    }

    Ok(collector.into_vec())
}

/// Parses composer.json `require` and `require-dev`, skipping platform
/// requirements (`php`, `ext-*`, `lib-*`).
pub(super) fn parse_composer_json(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: Value = serde_json::from_str(content)?;
    let mut collector = DependencyCollector::new();

    for section in ["require", "require-dev"] {
        let Some(requirements) = parsed.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        for (name, constraint) in requirements {
            if !name.contains('/') {
                continue;
            }
            let constraint = constraint.as_str().unwrap_or_default();
            collector.push(name, &pinned_version(constraint), Ecosystem::Composer, true);
        }
    }

    Ok(collector.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composer_lock() {
        let content = r#"{
  "packages": [{"name": "monolog/monolog", "version": "3.5.0"}],
  "packages-dev": [{"name": "phpunit/phpunit", "version": "v10.5.2"}]
}"#;
        let deps = parse_composer_lock(content).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].purl, "pkg:composer/monolog/monolog@3.5.0");
        assert_eq!(deps[1].version, "10.5.2");
    }

    #[test]
    fn test_composer_json_skips_platform_requirements() {
        let content = r#"{
  "require": {"php": ">=8.1", "ext-json": "*", "guzzlehttp/guzzle": "^7.8"},
  "require-dev": {"phpunit/phpunit": "^10.0"}
}"#;
        let deps = parse_composer_json(content).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "guzzlehttp/guzzle");
        assert_eq!(deps[0].version, "7.8");
        assert!(deps.iter().all(|d| d.is_direct));
    }
}
