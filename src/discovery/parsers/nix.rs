use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use serde_json::Value;
use std::collections::HashSet;

/// Parses flake.lock.
///
/// Inputs are named `owner/repo` when locked to a forge, otherwise by
/// their node key; the locked revision (or ref) serves as the version.
/// Nodes listed in the root's `inputs` are direct.
pub(super) fn parse_flake_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: Value = serde_json::from_str(content)?;
    let Some(nodes) = parsed.get("nodes").and_then(|n| n.as_object()) else {
        return Ok(Vec::new());
    };
    let root_key = parsed.get("root").and_then(|r| r.as_str()).unwrap_or("root");

    let direct: HashSet<&str> = nodes
        .get(root_key)
        .and_then(|root| root.get("inputs"))
        .and_then(|inputs| inputs.as_object())
        .into_iter()
        .flat_map(|inputs| inputs.values())
        .filter_map(|v| v.as_str())
        .collect();

    let mut collector = DependencyCollector::new();
    for (key, node) in nodes {
        if key == root_key {
            continue;
        }
        let Some(locked) = node.get("locked") else {
            continue;
        };
        let field = |name: &str| locked.get(name).and_then(|v| v.as_str());
        let name = match (field("owner"), field("repo")) {
            (Some(owner), Some(repo)) => format!("{}/{}", owner, repo),
            _ => key.clone(),
        };
        let version = field("rev").or_else(|| field("ref")).unwrap_or_default();
        collector.push(&name, version, Ecosystem::Nix, direct.contains(key.as_str()));
    }

    Ok(collector.into_vec())
}
