use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static SHELL_OPERATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&&|\|\||;|\|").unwrap());

/// Package managers whose install verbs name system packages
const INSTALLERS: [(&str, &str); 6] = [
    ("apt-get", "install"),
    ("apt", "install"),
    ("apk", "add"),
    ("yum", "install"),
    ("dnf", "install"),
    ("microdnf", "install"),
];

/// Parses a Dockerfile into two ecosystems: base images from `FROM`
/// (`docker`) and OS packages installed in `RUN` (`system`).
///
/// Images referring to an earlier build stage, `scratch`, or a build
/// argument are not third-party images and are skipped.
pub(super) fn parse_dockerfile(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();
    let mut stages: HashSet<String> = HashSet::new();

    for instruction in instructions(content) {
        let (keyword, arguments) = instruction
            .split_once(char::is_whitespace)
            .unwrap_or((instruction.as_str(), ""));

        if keyword.eq_ignore_ascii_case("FROM") {
            let tokens: Vec<&str> = arguments
                .split_whitespace()
                .filter(|t| !t.starts_with("--"))
                .collect();
            let Some(image) = tokens.first() else {
                continue;
            };
            let third_party = !image.eq_ignore_ascii_case("scratch")
                && !image.contains('$')
                && !stages.contains(&image.to_lowercase());
            if let [_, as_keyword, alias, ..] = tokens.as_slice() {
                if as_keyword.eq_ignore_ascii_case("AS") {
                    stages.insert(alias.to_lowercase());
                }
            }
            if third_party {
                let (name, version) = split_image(image);
                collector.push(name, version, Ecosystem::Docker, true);
            }
        } else if keyword.eq_ignore_ascii_case("RUN") {
            for (name, version) in installed_packages(&shell_command(arguments)) {
                collector.push(&name, &version, Ecosystem::System, true);
            }
        }
    }

    Ok(collector.into_vec())
}

/// Joins `\` continuations and drops comments, yielding one string per
/// instruction.
fn instructions(content: &str) -> Vec<String> {
    let mut instructions = Vec::new();
    let mut pending = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') || (trimmed.is_empty() && pending.is_empty()) {
            continue;
        }
        match trimmed.strip_suffix('\\') {
            Some(continued) => {
                pending.push_str(continued);
                pending.push(' ');
            }
            None => {
                pending.push_str(trimmed);
                instructions.push(std::mem::take(&mut pending));
            }
        }
    }
    if !pending.trim().is_empty() {
        instructions.push(pending);
    }
    instructions
}

/// Exec-form `RUN ["sh", "-c", "..."]` is flattened back into a command line.
fn shell_command(arguments: &str) -> String {
    let trimmed = arguments.trim();
    if trimmed.starts_with('[') {
        if let Ok(parts) = serde_json::from_str::<Vec<String>>(trimmed) {
            return parts.join(" ");
        }
    }
    trimmed.to_string()
}

/// `node:20-alpine` → (`node`, `20-alpine`); `registry:5000/app` →
/// (`registry:5000/app`, `latest`); digests are kept as the version.
fn split_image(image: &str) -> (&str, &str) {
    if let Some((name, digest)) = image.split_once('@') {
        return (name, digest);
    }
    let last_slash = image.rfind('/').unwrap_or(0);
    match image.rfind(':') {
        Some(colon) if colon > last_slash => (&image[..colon], &image[colon + 1..]),
        _ => (image, "latest"),
    }
}

/// Install flags whose value is the next token (`apk add --virtual .build-deps`)
const VALUE_FLAGS: [&str; 6] = ["--virtual", "-t", "--target-release", "-o", "--option", "--repository"];

/// Collects the packages named by install commands in a shell line.
///
/// Each segment between control operators is inspected on its own; flags,
/// flag values and interpolated arguments are skipped, and `name=version`
/// pins keep their version.
fn installed_packages(command: &str) -> Vec<(String, String)> {
    let mut packages = Vec::new();

    for segment in SHELL_OPERATOR.split(command) {
        let tokens: Vec<&str> = segment.split_whitespace().collect();
        let Some(verb_index) = install_verb_position(&tokens) else {
            continue;
        };
        let mut arguments = tokens[verb_index + 1..].iter();
        while let Some(token) = arguments.next() {
            if VALUE_FLAGS.contains(token) {
                arguments.next();
                continue;
            }
            if token.starts_with('-')
                || token.starts_with('.')
                || token.contains("::")
                || token.contains('$')
                || token.contains('/')
            {
                continue;
            }
            let (name, version) = token.split_once('=').unwrap_or((*token, ""));
            if !name.is_empty() {
                packages.push((name.to_string(), version.to_string()));
            }
        }
    }

    packages
}

fn install_verb_position(tokens: &[&str]) -> Option<usize> {
    let manager_index = tokens
        .iter()
        .position(|t| INSTALLERS.iter().any(|(manager, _)| t == manager))?;
    let manager = tokens[manager_index];
    let (_, verb) = INSTALLERS.iter().find(|(m, _)| *m == manager)?;
    tokens[manager_index + 1..]
        .iter()
        .position(|t| t == verb)
        .map(|offset| manager_index + 1 + offset)
}
