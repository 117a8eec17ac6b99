use super::pinned_version;
use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

const NODE_MODULES: &str = "node_modules/";

static YARN_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"?((?:@[^@/\s"]+/)?[^@\s",]+)@"#).unwrap());
static YARN_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s+version:?\s+"?([^"\s]+)"?"#).unwrap());

/// Parses package-lock.json / npm-shrinkwrap.json (lockfile v1 through v3)
pub(super) fn parse_package_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: Value = serde_json::from_str(content)?;
    let mut collector = DependencyCollector::new();

    // v2/v3: flat "packages" map keyed by install path
    if let Some(packages) = parsed.get("packages").and_then(|v| v.as_object()) {
        for (key, entry) in packages {
            let Some(position) = key.rfind(NODE_MODULES) else {
                continue;
            };
            if entry.get("link").and_then(|v| v.as_bool()) == Some(true) {
                continue;
            }
            let Some(version) = entry.get("version").and_then(|v| v.as_str()) else {
                continue;
            };
            let name = entry
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or(&key[position + NODE_MODULES.len()..]);
            let is_direct = key.matches(NODE_MODULES).count() == 1;
            collector.push(name, version, Ecosystem::Npm, is_direct);
        }
        return Ok(collector.into_vec());
    }

    // v1: nested "dependencies" tree
    if let Some(dependencies) = parsed.get("dependencies").and_then(|v| v.as_object()) {
        collect_v1_tree(dependencies, true, &mut collector);
    }

    Ok(collector.into_vec())
}

fn collect_v1_tree(
    dependencies: &serde_json::Map<String, Value>,
    top_level: bool,
    collector: &mut DependencyCollector,
) {
    for (name, entry) in dependencies {
        if let Some(version) = entry.get("version").and_then(|v| v.as_str()) {
            collector.push(name, version, Ecosystem::Npm, top_level);
        }
        if let Some(nested) = entry.get("dependencies").and_then(|v| v.as_object()) {
            collect_v1_tree(nested, false, collector);
        }
    }
}

/// Parses yarn.lock, both classic (v1) and berry blocks
pub(super) fn parse_yarn_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if !line.starts_with([' ', '\t']) {
            current = YARN_HEADER
                .captures(line)
                .map(|caps| caps[1].to_string())
                .filter(|name| name != "__metadata");
            continue;
        }

        let Some(name) = current.as_deref() else {
            continue;
        };
        if let Some(caps) = YARN_VERSION.captures(line) {
            let version = &caps[1];
            // berry workspace entries
            if version.contains("use.local") {
                current = None;
                continue;
            }
            collector.push(name, version, Ecosystem::Npm, false);
            current = None;
        }
    }

    Ok(collector.into_vec())
}

/// Parses pnpm-lock.yaml (v5 slash keys, v6 `@` keys, v9 snapshots)
pub(super) fn parse_pnpm_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: serde_yaml_ng::Value = serde_yaml_ng::from_str(content)?;
    let direct = pnpm_direct_names(&parsed);
    let mut collector = DependencyCollector::new();

    for section in ["packages", "snapshots"] {
        let Some(packages) = parsed.get(section).and_then(|v| v.as_mapping()) else {
            continue;
        };
        for key in packages.keys() {
            let Some((name, version)) = key.as_str().and_then(parse_pnpm_package_key) else {
                continue;
            };
            let is_direct = direct.contains(&name);
            collector.push(&name, &version, Ecosystem::Npm, is_direct);
        }
    }

    Ok(collector.into_vec())
}

fn pnpm_direct_names(parsed: &serde_yaml_ng::Value) -> HashSet<String> {
    const SECTIONS: [&str; 3] = ["dependencies", "devDependencies", "optionalDependencies"];

    let mut roots = vec![parsed];
    if let Some(importer) = parsed.get("importers").and_then(|v| v.get(".")) {
        roots.push(importer);
    }

    roots
        .into_iter()
        .flat_map(|root| SECTIONS.into_iter().filter_map(move |s| root.get(s)))
        .filter_map(|section| section.as_mapping())
        .flat_map(|mapping| mapping.keys())
        .filter_map(|key| key.as_str().map(String::from))
        .collect()
}

/// Splits a pnpm package key into name and version.
///
/// Accepts `/lodash/4.17.21`, `/@babel/core/7.22.0_peer@1`,
/// `/lodash@4.17.21`, `@types/node@20.0.0(peer@1)` and `lodash@4.17.21`.
fn parse_pnpm_package_key(key: &str) -> Option<(String, String)> {
    let key = key.strip_prefix('/').unwrap_or(key);
    let key = key.split('(').next().unwrap_or(key);

    if let Some(at) = key.rfind('@').filter(|&at| at > 0) {
        let name = &key[..at];
        let version = &key[at + 1..];
        // v5 peer suffixes (`/name/1.0.0_peer@2`) put an `@` after the version segment
        let last_segment = name.rsplit('/').next().unwrap_or(name);
        if !last_segment.starts_with(|c: char| c.is_ascii_digit()) {
            return Some((name.to_string(), version.to_string()));
        }
    }

    // v5: name/version with optional `_peer` suffix
    let key = key.split('_').next().unwrap_or(key);
    let (name, version) = key.rsplit_once('/')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name.to_string(), version.to_string()))
}

/// Parses package.json declarations
pub(super) fn parse_package_json(content: &str) -> Result<Vec<ParsedDependency>> {
    const SECTIONS: [&str; 4] = [
        "dependencies",
        "devDependencies",
        "optionalDependencies",
        "peerDependencies",
    ];

    let parsed: Value = serde_json::from_str(content)?;
    let mut collector = DependencyCollector::new();

    for section in SECTIONS {
        let Some(dependencies) = parsed.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        for (declared, requirement) in dependencies {
            let requirement = requirement.as_str().unwrap_or_default();
            let (name, requirement) = resolve_alias(declared, requirement);
            collector.push(name, &pinned_version(requirement), Ecosystem::Npm, true);
        }
    }

    Ok(collector.into_vec())
}

/// Follows `npm:real-name@range` aliases to the real package.
fn resolve_alias<'a>(declared: &'a str, requirement: &'a str) -> (&'a str, &'a str) {
    let Some(target) = requirement.strip_prefix("npm:") else {
        return (declared, requirement);
    };
    match target.rfind('@').filter(|&at| at > 0) {
        Some(at) => (&target[..at], &target[at + 1..]),
        None => (target, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(deps: &'a [ParsedDependency], name: &str) -> &'a ParsedDependency {
        deps.iter()
            .find(|d| d.name == name)
            .unwrap_or_else(|| panic!("{} not found", name))
    }

    #[test]
    fn test_package_lock_v3_top_level_is_direct() {
        let content = r#"{
  "name": "app",
  "lockfileVersion": 3,
  "packages": {
    "": { "name": "app", "dependencies": { "lodash": "^4.17.21" } },
    "node_modules/lodash": { "version": "4.17.21" }
  }
}"#;
        let deps = parse_package_lock(content).unwrap();
        assert_eq!(deps.len(), 1);
        let lodash = &deps[0];
        assert_eq!(lodash.name, "lodash");
        assert_eq!(lodash.version, "4.17.21");
        assert_eq!(lodash.ecosystem, Ecosystem::Npm);
        assert_eq!(lodash.purl, "pkg:npm/lodash@4.17.21");
        assert!(lodash.is_direct);
    }

    #[test]
    fn test_package_lock_nested_is_transitive() {
        let content = r#"{
  "lockfileVersion": 2,
  "packages": {
    "node_modules/@babel/core": { "version": "7.22.0" },
    "node_modules/@babel/core/node_modules/semver": { "version": "6.3.1" },
    "node_modules/local-lib": { "resolved": "libs/local", "link": true },
    "libs/local": { "version": "1.0.0" }
  }
}"#;
        let deps = parse_package_lock(content).unwrap();
        assert_eq!(deps.len(), 2);
        assert!(find(&deps, "@babel/core").is_direct);
        assert_eq!(find(&deps, "@babel/core").purl, "pkg:npm/%40babel/core@7.22.0");
        assert!(!find(&deps, "semver").is_direct);
    }

    #[test]
    fn test_package_lock_v1_tree() {
        let content = r#"{
  "lockfileVersion": 1,
  "dependencies": {
    "express": {
      "version": "4.18.2",
      "dependencies": { "debug": { "version": "2.6.9" } }
    }
  }
}"#;
        let deps = parse_package_lock(content).unwrap();
        assert!(find(&deps, "express").is_direct);
        assert!(!find(&deps, "debug").is_direct);
    }

    #[test]
    fn test_yarn_lock_classic() {
        let content = r#"# yarn lockfile v1


"@babel/code-frame@^7.0.0", "@babel/code-frame@^7.22.5":
  version "7.22.5"
  resolved "https://registry.yarnpkg.com/@babel/code-frame/-/code-frame-7.22.5.tgz"
  dependencies:
    "@babel/highlight" "^7.22.5"

lodash@^4.17.20, lodash@^4.17.21:
  version "4.17.21"
"#;
        let deps = parse_yarn_lock(content).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(find(&deps, "@babel/code-frame").version, "7.22.5");
        assert_eq!(find(&deps, "lodash").version, "4.17.21");
        assert!(deps.iter().all(|d| !d.is_direct));
    }

    #[test]
    fn test_yarn_lock_berry() {
        let content = r#"__metadata:
  version: 6
  cacheKey: 8

"app@workspace:.":
  version: 0.0.0-use.local
  resolution: "app@workspace:."

"react@npm:^18.2.0":
  version: 18.2.0
  resolution: "react@npm:18.2.0"
"#;
        let deps = parse_yarn_lock(content).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "react");
        assert_eq!(deps[0].version, "18.2.0");
    }

    #[test]
    fn test_pnpm_package_key_formats() {
        let cases = [
            ("/lodash/4.17.21", "lodash", "4.17.21"),
            ("/@babel/core/7.22.0_supports-color@8.0.0", "@babel/core", "7.22.0"),
            ("/lodash@4.17.21", "lodash", "4.17.21"),
            ("@types/node@20.0.0(typescript@5.0.0)", "@types/node", "20.0.0"),
            ("express@4.18.2", "express", "4.18.2"),
        ];
        for (key, name, version) in cases {
            let (parsed_name, parsed_version) = parse_pnpm_package_key(key).unwrap();
            assert_eq!(parsed_name, name, "key {}", key);
            assert_eq!(parsed_version, version, "key {}", key);
        }
    }

    #[test]
    fn test_pnpm_lock_v9_marks_importer_dependencies_direct() {
        let content = r#"lockfileVersion: '9.0'
importers:
  .:
    dependencies:
      express:
        specifier: ^4.18.2
        version: 4.18.2
packages:
  express@4.18.2:
    resolution: {integrity: sha512-abc}
  debug@2.6.9:
    resolution: {integrity: sha512-def}
snapshots:
  express@4.18.2:
    dependencies:
      debug: 2.6.9
  debug@2.6.9: {}
"#;
        let deps = parse_pnpm_lock(content).unwrap();
        assert_eq!(deps.len(), 2);
        assert!(find(&deps, "express").is_direct);
        assert!(!find(&deps, "debug").is_direct);
    }

    #[test]
    fn test_package_json_sections_and_aliases() {
        let content = r#"{
  "dependencies": {
    "react": "^18.2.0",
    "my-lodash": "npm:lodash@^4.17.21",
    "internal": "workspace:*"
  },
  "devDependencies": { "typescript": "~5.2.2" }
}"#;
        let deps = parse_package_json(content).unwrap();
        assert_eq!(find(&deps, "react").version, "18.2.0");
        assert_eq!(find(&deps, "lodash").version, "4.17.21");
        assert_eq!(find(&deps, "internal").version, "");
        assert_eq!(find(&deps, "typescript").version, "5.2.2");
        assert!(deps.iter().all(|d| d.is_direct));
    }
}
