use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static PACKAGE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<package\s+([^>]*)/?>").unwrap());
static ID_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\bid\s*=\s*"([^"]+)""#).unwrap());
static VERSION_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bversion\s*=\s*"([^"]+)""#).unwrap());

/// Parses packages.lock.json.
///
/// Entries are grouped per target framework and typed `Direct`,
/// `Transitive` or `Project`; project references are local code.
pub(super) fn parse_packages_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: Value = serde_json::from_str(content)?;
    let mut collector = DependencyCollector::new();

    let Some(frameworks) = parsed.get("dependencies").and_then(|v| v.as_object()) else {
        return Ok(Vec::new());
    };
    for packages in frameworks.values().filter_map(|v| v.as_object()) {
        for (name, entry) in packages {
            let kind = entry.get("type").and_then(|v| v.as_str()).unwrap_or_default();
            if kind.eq_ignore_ascii_case("project") {
                continue;
            }
            let version = entry.get("resolved").and_then(|v| v.as_str()).unwrap_or_default();
            collector.push(name, version, Ecosystem::Nuget, kind.eq_ignore_ascii_case("direct"));
        }
    }

    Ok(collector.into_vec())
}

/// Parses legacy packages.config `<package id=".." version=".."/>` entries
pub(super) fn parse_packages_config(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();

    for element in PACKAGE_ELEMENT.captures_iter(content) {
        let attributes = &element[1];
        let Some(id) = ID_ATTRIBUTE.captures(attributes) else {
            continue;
        };
        let version = VERSION_ATTRIBUTE
            .captures(attributes)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        collector.push(&id[1], &version, Ecosystem::Nuget, true);
    }

    Ok(collector.into_vec())
}
