use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use regex::Regex;
use std::sync::LazyLock;

/// `any.aeson ==2.1.2.1`; flag and `installed` constraints do not match
static FREEZE_CONSTRAINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"any\.([A-Za-z0-9][A-Za-z0-9-]*)\s*==\s*([0-9][0-9.]*)").unwrap());

/// Parses cabal.project.freeze `constraints:` pins
pub(super) fn parse_cabal_freeze(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();
    for caps in FREEZE_CONSTRAINT.captures_iter(content) {
        collector.push(&caps[1], &caps[2], Ecosystem::Hackage, false);
    }
    Ok(collector.into_vec())
}
