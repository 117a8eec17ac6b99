use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use std::collections::HashSet;

/// Parses Gemfile.lock.
///
/// Resolved gems are the four-space-indented lines under each `specs:`
/// block; the `DEPENDENCIES` section names the ones the Gemfile declares.
pub(super) fn parse_gemfile_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut direct: HashSet<&str> = HashSet::new();
    let mut specs: Vec<(&str, &str)> = Vec::new();
    let mut section = "";

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with(' ') {
            section = line.trim();
            continue;
        }

        match section {
            "GEM" | "GIT" | "PATH" => {
                let indent = line.len() - line.trim_start().len();
                if indent != 4 {
                    continue;
                }
                if let Some((name, version)) = split_spec(line.trim()) {
                    specs.push((name, version));
                }
            }
            "DEPENDENCIES" => {
                let name = line
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .trim_end_matches('!');
                direct.insert(name);
            }
            _ => {}
        }
    }

    let mut collector = DependencyCollector::new();
    for (name, version) in specs {
        // platform-specific builds carry a `-<platform>` suffix
        let version = version.split('-').next().unwrap_or(version);
        collector.push(name, version, Ecosystem::Gem, direct.contains(name));
    }
    Ok(collector.into_vec())
}

/// `nokogiri (1.15.4-x86_64-linux)` → (`nokogiri`, `1.15.4-x86_64-linux`)
fn split_spec(spec: &str) -> Option<(&str, &str)> {
    let (name, rest) = spec.split_once(" (")?;
    let version = rest.strip_suffix(')')?;
    Some((name, version))
}
