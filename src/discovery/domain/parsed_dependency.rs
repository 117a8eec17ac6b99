use super::{Ecosystem, Purl};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One dependency emitted by a single parser invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDependency {
    pub name: String,
    /// Empty when the manifest declares no pin
    pub version: String,
    pub ecosystem: Ecosystem,
    pub purl: String,
    /// Parser-level hint only; see `DepthClassifier` for the authoritative answer
    pub is_direct: bool,
}

impl ParsedDependency {
    pub fn new(name: &str, version: &str, ecosystem: Ecosystem, is_direct: bool) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            ecosystem,
            purl: Purl::build(ecosystem, name, version),
            is_direct,
        }
    }

    /// Dedup key; the ecosystem keeps same-named packages of different
    /// registries apart (`npm` redis vs `pip` redis, `docker` vs `system`)
    pub fn key(&self) -> String {
        format!("{}:{}@{}", self.ecosystem, self.name, self.version)
    }
}

/// Output of one registry dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockfileParseResult {
    pub dependencies: Vec<ParsedDependency>,
    /// Literal source filename, kept for provenance (`yarn.lock`, `Dockerfile`)
    pub lockfile_type: String,
    pub ecosystem: Ecosystem,
}

impl LockfileParseResult {
    pub fn empty(lockfile_type: &str, ecosystem: Ecosystem) -> Self {
        Self {
            dependencies: Vec::new(),
            lockfile_type: lockfile_type.to_string(),
            ecosystem,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Accumulates parser output, dropping repeated `ecosystem:name@version` entries
///
/// Tree-shaped formats (nested `node_modules`, yarn blocks listing several
/// specifiers) report the same resolved package many times.
#[derive(Debug, Default)]
pub struct DependencyCollector {
    seen: HashSet<String>,
    dependencies: Vec<ParsedDependency>,
}

impl DependencyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dependency unless its name is empty or the pair was seen before.
    ///
    /// Returns true when the dependency was added.
    pub fn push(&mut self, name: &str, version: &str, ecosystem: Ecosystem, is_direct: bool) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let dependency = ParsedDependency::new(name, version.trim(), ecosystem, is_direct);
        if !self.seen.insert(dependency.key()) {
            return false;
        }
        self.dependencies.push(dependency);
        true
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn into_vec(self) -> Vec<ParsedDependency> {
        self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_dependency_builds_purl() {
        let dep = ParsedDependency::new("@scope/pkg", "1.0.0", Ecosystem::Npm, true);
        assert_eq!(dep.purl, "pkg:npm/%40scope/pkg@1.0.0");
        assert_eq!(dep.key(), "npm:@scope/pkg@1.0.0");
    }

    #[test]
    fn test_collector_deduplicates_by_name_and_version() {
        let mut collector = DependencyCollector::new();
        assert!(collector.push("lodash", "4.17.21", Ecosystem::Npm, true));
        assert!(!collector.push("lodash", "4.17.21", Ecosystem::Npm, false));
        assert!(collector.push("lodash", "4.17.20", Ecosystem::Npm, false));
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_collector_keeps_same_name_across_ecosystems() {
        let mut collector = DependencyCollector::new();
        assert!(collector.push("redis", "", Ecosystem::Npm, true));
        assert!(collector.push("redis", "", Ecosystem::Pip, true));
        assert!(!collector.push("redis", "", Ecosystem::Pip, true));
        let purls: Vec<String> = collector.into_vec().into_iter().map(|d| d.purl).collect();
        assert_eq!(purls, vec!["pkg:npm/redis", "pkg:pip/redis"]);
    }

    #[test]
    fn test_collector_skips_empty_names() {
        let mut collector = DependencyCollector::new();
        assert!(!collector.push("  ", "1.0", Ecosystem::Cargo, false));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_parse_result_serializes_camel_case() {
        let result = LockfileParseResult::empty("yarn.lock", Ecosystem::Npm);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["lockfileType"], "yarn.lock");
        assert_eq!(json["ecosystem"], "npm");
    }
}
