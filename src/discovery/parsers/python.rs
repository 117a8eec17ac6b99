use super::pinned_version;
use crate::discovery::domain::{
    strip_version_prefix, DependencyCollector, Ecosystem, ParsedDependency,
};
use crate::shared::Result;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::LazyLock;

/// PEP 508 requirement: name, optional extras, optional first specifier
static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*(?:(===|==|~=|>=|<=|!=|>|<)\s*([^\s,;#]+))?")
        .unwrap()
});

#[derive(Debug, Deserialize)]
struct PackageLock {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    source: Option<UvSource>,
    #[serde(default)]
    dependencies: Vec<UvDependency>,
    #[serde(default, rename = "dev-dependencies")]
    dev_dependencies: Option<toml::Table>,
    #[serde(default, rename = "optional-dependencies")]
    optional_dependencies: Option<toml::Table>,
}

#[derive(Debug, Default, Deserialize)]
struct UvSource {
    #[serde(default)]
    editable: Option<String>,
    #[serde(default, rename = "virtual")]
    virtual_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UvDependency {
    name: String,
}

/// Parses poetry.lock
pub(super) fn parse_poetry_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let lockfile: PackageLock = toml::from_str(content)?;
    let mut collector = DependencyCollector::new();
    for package in &lockfile.package {
        collector.push(&package.name, &package.version, Ecosystem::Pip, false);
    }
    Ok(collector.into_vec())
}

/// Parses uv.lock; the project's own entry supplies the direct set
pub(super) fn parse_uv_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let lockfile: PackageLock = toml::from_str(content)?;

    let is_project = |package: &LockedPackage| {
        package
            .source
            .as_ref()
            .is_some_and(|s| s.editable.as_deref() == Some(".") || s.virtual_path.as_deref() == Some("."))
    };

    let mut direct: HashSet<String> = HashSet::new();
    for project in lockfile.package.iter().filter(|p| is_project(*p)) {
        direct.extend(project.dependencies.iter().map(|d| d.name.clone()));
        for groups in [&project.dev_dependencies, &project.optional_dependencies]
            .into_iter()
            .flatten()
        {
            direct.extend(
                groups
                    .values()
                    .filter_map(|group| group.as_array())
                    .flatten()
                    .filter_map(|dep| dep.get("name").and_then(|n| n.as_str()))
                    .map(String::from),
            );
        }
    }

    let mut collector = DependencyCollector::new();
    for package in lockfile.package.iter().filter(|p| !is_project(*p)) {
        let is_direct = direct.contains(&package.name);
        collector.push(&package.name, &package.version, Ecosystem::Pip, is_direct);
    }
    Ok(collector.into_vec())
}

/// Parses Pipfile.lock (`default` and `develop` sections)
pub(super) fn parse_pipfile_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: serde_json::Value = serde_json::from_str(content)?;
    let mut collector = DependencyCollector::new();

    for section in ["default", "develop"] {
        let Some(packages) = parsed.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        for (name, entry) in packages {
            let version = entry
                .get("version")
                .and_then(|v| v.as_str())
                .map(strip_version_prefix)
                .unwrap_or_default();
            collector.push(name, &version, Ecosystem::Pip, false);
        }
    }

    Ok(collector.into_vec())
}

/// Parses requirements.txt, honoring comments, options and line continuations
pub(super) fn parse_requirements(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();

    for line in logical_lines(content) {
        let line = line.split(" #").next().unwrap_or(line.as_str()).trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        if line.contains("://") && !line.contains(" @ ") {
            continue;
        }
        if let Some((name, version)) = parse_requirement(line) {
            collector.push(&name, &version, Ecosystem::Pip, true);
        }
    }

    Ok(collector.into_vec())
}

fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    for raw in content.lines() {
        match raw.trim_end().strip_suffix('\\') {
            Some(continued) => {
                pending.push_str(continued);
                pending.push(' ');
            }
            None => {
                pending.push_str(raw);
                lines.push(std::mem::take(&mut pending));
            }
        }
    }
    if !pending.is_empty() {
        lines.push(pending);
    }
    lines
}

/// Extracts name and version from one PEP 508 requirement string.
///
/// Only lower-bounded specifiers yield a version; `<2` or `!=1.0` do not
/// identify a release.
fn parse_requirement(requirement: &str) -> Option<(String, String)> {
    let caps = REQUIREMENT.captures(requirement.trim())?;
    let name = caps.get(1)?.as_str().to_string();
    let version = match (caps.get(2).map(|m| m.as_str()), caps.get(3)) {
        (Some("==" | "===" | "~=" | ">="), Some(version)) => version.as_str().to_string(),
        _ => String::new(),
    };
    Some((name, version))
}

/// Parses pyproject.toml: PEP 621, PEP 735 groups and Poetry tables
pub(super) fn parse_pyproject(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: toml::Value = toml::from_str(content)?;
    let mut collector = DependencyCollector::new();

    let mut requirement_lists: Vec<&toml::Value> = Vec::new();
    if let Some(project) = parsed.get("project") {
        requirement_lists.extend(project.get("dependencies"));
        if let Some(optional) = project.get("optional-dependencies").and_then(|v| v.as_table()) {
            requirement_lists.extend(optional.values());
        }
    }
    if let Some(groups) = parsed.get("dependency-groups").and_then(|v| v.as_table()) {
        requirement_lists.extend(groups.values());
    }

    for requirement in requirement_lists
        .into_iter()
        .filter_map(|list| list.as_array())
        .flatten()
        .filter_map(|item| item.as_str())
    {
        if let Some((name, version)) = parse_requirement(requirement) {
            collector.push(&name, &version, Ecosystem::Pip, true);
        }
    }

    if let Some(poetry) = parsed.get("tool").and_then(|t| t.get("poetry")) {
        let mut tables: Vec<&toml::Value> = Vec::new();
        tables.extend(poetry.get("dependencies"));
        tables.extend(poetry.get("dev-dependencies"));
        if let Some(groups) = poetry.get("group").and_then(|g| g.as_table()) {
            tables.extend(groups.values().filter_map(|g| g.get("dependencies")));
        }

        for (name, spec) in tables
            .into_iter()
            .filter_map(|t| t.as_table())
            .flatten()
        {
            if name.eq_ignore_ascii_case("python") {
                continue;
            }
            let requirement = match spec {
                toml::Value::String(s) => s.as_str(),
                other => other.get("version").and_then(|v| v.as_str()).unwrap_or_default(),
            };
            collector.push(name, &pinned_version(requirement), Ecosystem::Pip, true);
        }
    }

    Ok(collector.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poetry_lock() {
        let content = r#"
[[package]]
name = "requests"
version = "2.31.0"
description = "Python HTTP for Humans."

[[package]]
name = "urllib3"
version = "2.0.7"
"#;
        let deps = parse_poetry_lock(content).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].purl, "pkg:pip/requests@2.31.0");
        assert!(!deps[0].is_direct);
    }

    #[test]
    fn test_uv_lock_uses_project_dependencies_as_direct() {
        let content = r#"
version = 1

[[package]]
name = "my-app"
version = "0.1.0"
source = { editable = "." }
dependencies = [{ name = "requests" }]

[package.dev-dependencies]
dev = [{ name = "pytest" }]

[[package]]
name = "requests"
version = "2.31.0"
source = { registry = "https://pypi.org/simple" }
dependencies = [{ name = "certifi" }]

[[package]]
name = "certifi"
version = "2024.8.30"
source = { registry = "https://pypi.org/simple" }

[[package]]
name = "pytest"
version = "8.0.0"
source = { registry = "https://pypi.org/simple" }
"#;
        let deps = parse_uv_lock(content).unwrap();
        assert_eq!(deps.len(), 3);
        let direct: Vec<&str> = deps.iter().filter(|d| d.is_direct).map(|d| d.name.as_str()).collect();
        assert_eq!(direct, vec!["requests", "pytest"]);
        assert!(deps.iter().all(|d| d.name != "my-app"));
    }

    #[test]
    fn test_pipfile_lock() {
        let content = r#"{
  "_meta": {"hash": {"sha256": "x"}},
  "default": {"requests": {"version": "==2.31.0"}},
  "develop": {"pytest": {"version": "==8.0.0"}, "editable-thing": {"path": "."}}
}"#;
        let deps = parse_pipfile_lock(content).unwrap();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].version, "2.31.0");
        assert!(deps.iter().any(|d| d.name == "editable-thing" && d.version.is_empty()));
    }

    #[test]
    fn test_requirements_txt() {
        let content = "\
# production
Django==4.2.1
requests[security] >= 2.31.0 ; python_version > \"3.8\"
numpy<2
-r dev-requirements.txt
--index-url https://example.com/simple
git+https://github.com/psf/black.git
flask \\
    ==3.0.0
mypkg @ https://example.com/mypkg-1.0.tar.gz
";
        let deps = parse_requirements(content).unwrap();
        let pairs: Vec<(&str, &str)> = deps.iter().map(|d| (d.name.as_str(), d.version.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("Django", "4.2.1"),
                ("requests", "2.31.0"),
                ("numpy", ""),
                ("flask", "3.0.0"),
                ("mypkg", ""),
            ]
        );
        assert_eq!(deps[0].purl, "pkg:pip/django@4.2.1");
        assert!(deps.iter().all(|d| d.is_direct));
    }

    #[test]
    fn test_pyproject_pep621_and_poetry() {
        let content = r#"
[project]
name = "app"
dependencies = ["httpx>=0.27", "rich"]

[project.optional-dependencies]
test = ["pytest==8.0.0"]

[tool.poetry.dependencies]
python = "^3.11"
fastapi = "^0.110.0"
sqlalchemy = { version = "~2.0", extras = ["asyncio"] }

[tool.poetry.group.dev.dependencies]
ruff = "0.3.0"
"#;
        let deps = parse_pyproject(content).unwrap();
        let pairs: Vec<(&str, &str)> = deps.iter().map(|d| (d.name.as_str(), d.version.as_str())).collect();
        assert!(pairs.contains(&("httpx", "0.27")));
        assert!(pairs.contains(&("rich", "")));
        assert!(pairs.contains(&("pytest", "8.0.0")));
        assert!(pairs.contains(&("fastapi", "0.110.0")));
        assert!(pairs.contains(&("sqlalchemy", "2.0")));
        assert!(pairs.contains(&("ruff", "0.3.0")));
        assert!(!pairs.iter().any(|(name, _)| *name == "python"));
    }
}
