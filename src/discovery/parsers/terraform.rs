use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use regex::Regex;
use std::sync::LazyLock;

static PROVIDER_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*provider\s+"([^"]+)"\s*\{"#).unwrap());
static VERSION_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*version\s*=\s*"([^"]+)""#).unwrap());

const DEFAULT_REGISTRY: &str = "registry.terraform.io/";

/// Parses .terraform.lock.hcl provider blocks.
///
/// Every locked provider is required by some configuration the project
/// owns, so all entries are direct.
pub(super) fn parse_terraform_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        if let Some(caps) = PROVIDER_BLOCK.captures(line) {
            let source = &caps[1];
            current = Some(source.strip_prefix(DEFAULT_REGISTRY).unwrap_or(source).to_string());
            continue;
        }
        if line.trim() == "}" {
            if let Some(provider) = current.take() {
                collector.push(&provider, "", Ecosystem::Terraform, true);
            }
            continue;
        }
        let Some(provider) = current.as_deref() else {
            continue;
        };
        if let Some(caps) = VERSION_ATTRIBUTE.captures(line) {
            collector.push(provider, &caps[1], Ecosystem::Terraform, true);
            current = None;
        }
    }

    Ok(collector.into_vec())
}
