use crate::discovery::domain::{
    strip_version_prefix, DependencyCollector, Ecosystem, ParsedDependency,
};
use crate::shared::Result;

/// Parses go.sum.
///
/// Each module appears once for its zip hash and once for `/go.mod`; both
/// collapse onto one entry. go.sum lists the full module graph without
/// distinguishing direct requirements, so every entry is transitive.
pub(super) fn parse_go_sum(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();

    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let (Some(module), Some(version)) = (fields.next(), fields.next()) else {
            continue;
        };
        let version = version.trim_end_matches("/go.mod");
        collector.push(module, &strip_version_prefix(version), Ecosystem::Go, false);
    }

    Ok(collector.into_vec())
}

/// Parses go.mod `require` directives, single-line and block form.
///
/// Requirements without an `// indirect` marker are direct.
pub(super) fn parse_go_mod(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();
    let mut in_require_block = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if in_require_block {
            if trimmed.starts_with(')') {
                in_require_block = false;
                continue;
            }
            push_requirement(trimmed, &mut collector);
            continue;
        }

        let Some(rest) = trimmed.strip_prefix("require") else {
            continue;
        };
        let rest = rest.trim_start();
        if rest.starts_with('(') {
            in_require_block = true;
        } else if !rest.is_empty() {
            push_requirement(rest, &mut collector);
        }
    }

    Ok(collector.into_vec())
}

fn push_requirement(line: &str, collector: &mut DependencyCollector) {
    if line.is_empty() || line.starts_with("//") {
        return;
    }
    let (requirement, comment) = match line.split_once("//") {
        Some((requirement, comment)) => (requirement, comment),
        None => (line, ""),
    };
    let mut fields = requirement.split_whitespace();
    let (Some(module), Some(version)) = (fields.next(), fields.next()) else {
        return;
    };
    let is_direct = !comment.trim_start().starts_with("indirect");
    collector.push(module, &strip_version_prefix(version), Ecosystem::Go, is_direct);
}
