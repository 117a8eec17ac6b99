use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static POM_PROPERTIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<properties>(.*?)</properties>").unwrap());
static POM_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z0-9_.-]+)>\s*([^<]*?)\s*</[A-Za-z0-9_.-]+>").unwrap());
static POM_DEPENDENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<dependency>(.*?)</dependency>").unwrap());
static POM_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<groupId>\s*([^<]+?)\s*</groupId>").unwrap());
static POM_ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<artifactId>\s*([^<]+?)\s*</artifactId>").unwrap());
static POM_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<version>\s*([^<]+?)\s*</version>").unwrap());
static POM_PROPERTY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{([^}]+)\}$").unwrap());

static GRADLE_STRING_NOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^\s*(?:implementation|api|compile|compileOnly|runtimeOnly|testImplementation|testRuntimeOnly|testCompileOnly|annotationProcessor|kapt|ksp|classpath)\s*\(?\s*["']([^"':\s]+):([^"':\s]+)(?::([^"'\s]+))?["']"#,
    )
    .unwrap()
});
static GRADLE_MAP_NOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"group\s*[:=]\s*["']([^"']+)["']\s*,\s*name\s*[:=]\s*["']([^"']+)["'](?:\s*,\s*version\s*[:=]\s*["']([^"']+)["'])?"#,
    )
    .unwrap()
});

/// Parses gradle.lockfile (`group:artifact:version=configurations`)
pub(super) fn parse_gradle_lockfile(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with("empty=") {
            continue;
        }
        let coordinates = line.split('=').next().unwrap_or(line);
        let mut parts = coordinates.splitn(3, ':');
        let (Some(group), Some(artifact), Some(version)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        collector.push(&format!("{}:{}", group, artifact), version, Ecosystem::Maven, false);
    }

    Ok(collector.into_vec())
}

/// Parses pom.xml `<dependency>` blocks, resolving `${property}` versions
/// from the `<properties>` section.
pub(super) fn parse_pom(content: &str) -> Result<Vec<ParsedDependency>> {
    let properties: HashMap<&str, &str> = POM_PROPERTIES
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|block| {
            POM_PROPERTY
                .captures_iter(block.as_str())
                .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
                .collect()
        })
        .unwrap_or_default();

    let mut collector = DependencyCollector::new();
    for block in POM_DEPENDENCY.captures_iter(content) {
        let block = &block[1];
        let (Some(group), Some(artifact)) = (
            POM_GROUP.captures(block).map(|c| c[1].to_string()),
            POM_ARTIFACT.captures(block).map(|c| c[1].to_string()),
        ) else {
            continue;
        };
        let version = POM_VERSION
            .captures(block)
            .map(|c| resolve_property(&c[1], &properties))
            .unwrap_or_default();
        collector.push(&format!("{}:{}", group, artifact), &version, Ecosystem::Maven, true);
    }

    Ok(collector.into_vec())
}

fn resolve_property(version: &str, properties: &HashMap<&str, &str>) -> String {
    match POM_PROPERTY_REF.captures(version) {
        Some(caps) => properties
            .get(&caps[1])
            .filter(|value| !value.contains("${"))
            .map(|value| value.to_string())
            .unwrap_or_default(),
        None => version.to_string(),
    }
}

/// Parses build.gradle / build.gradle.kts dependency declarations in
/// string (`"g:a:v"`) and map (`group: 'g', name: 'a'`) notation.
pub(super) fn parse_gradle_build(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut collector = DependencyCollector::new();

    for caps in GRADLE_STRING_NOTATION
        .captures_iter(content)
        .chain(GRADLE_MAP_NOTATION.captures_iter(content))
    {
        let name = format!("{}:{}", &caps[1], &caps[2]);
        let version = caps
            .get(3)
            .map(|m| m.as_str())
            .filter(|v| !v.contains('$'))
            .unwrap_or_default();
        collector.push(&name, version, Ecosystem::Maven, true);
    }

    Ok(collector.into_vec())
}
