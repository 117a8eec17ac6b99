use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use regex::Regex;
use std::sync::LazyLock;

/// `"jason": {:hex, :jason, "1.4.1", ...}`
static HEX_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*"([^"]+)":\s*\{:hex,\s*:"?([A-Za-z0-9_]+)"?,\s*"([^"]+)""#).unwrap()
});
/// `"dep": {:git, "https://...", "<sha>", ...}`
static GIT_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*"([^"]+)":\s*\{:git,"#).unwrap());

/// Parses mix.lock. Hex packages carry their version; git dependencies
/// are reported without one.
pub(super) fn parse_mix_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();

    for caps in HEX_ENTRY.captures_iter(content) {
        collector.push(&caps[2], &caps[3], Ecosystem::Hex, false);
    }
    for caps in GIT_ENTRY.captures_iter(content) {
        collector.push(&caps[1], "", Ecosystem::Hex, false);
    }

    Ok(collector.into_vec())
}
