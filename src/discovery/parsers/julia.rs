use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;

/// Parses Julia Manifest.toml, both the `[[deps.Name]]` layout of manifest
/// format 2.0 and the older top-level `[[Name]]` layout.
///
/// Standard-library entries have no version and are skipped.
pub(super) fn parse_manifest(content: &str) -> Result<Vec<ParsedDependency>> {
    let manifest: toml::Table = toml::from_str(content)?;
    let entries = match manifest.get("deps").and_then(|d| d.as_table()) {
        Some(deps) => deps,
        None => &manifest,
    };

    let mut collector = DependencyCollector::new();
    for (name, versions) in entries {
        for entry in versions.as_array().into_iter().flatten() {
            if let Some(version) = entry.get("version").and_then(|v| v.as_str()) {
                collector.push(name, version, Ecosystem::Julia, false);
            }
        }
    }
    Ok(collector.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_v2() {
        let content = r#"
julia_version = "1.10.0"
manifest_format = "2.0"

[[deps.JSON]]
deps = ["Dates", "Mmap"]
git-tree-sha1 = "31e996f0a15c7b280ba9f76636b3ff9e2ae58c9a"
uuid = "682c06a0-de6a-54ab-a142-c8b1cf79cde6"
version = "0.21.4"

[[deps.Dates]]
uuid = "ade2ca70-3891-5945-98fb-dc099432e06a"
"#;
        let deps = parse_manifest(content).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].purl, "pkg:julia/JSON@0.21.4");
    }

    #[test]
    fn test_manifest_v1() {
        let content = r#"
[[CSV]]
uuid = "336ed68f-0bac-5ca0-87d4-7b16caf5d00b"
version = "0.10.11"
"#;
        let deps = parse_manifest(content).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "CSV");
    }
}
