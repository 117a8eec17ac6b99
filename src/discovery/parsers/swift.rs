use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use serde_json::Value;
use std::collections::HashSet;

/// Parses Package.resolved, format v1 (`object.pins`) and v2/v3 (`pins`).
///
/// Branch and revision pins have no version.
pub(super) fn parse_package_resolved(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: Value = serde_json::from_str(content)?;
    let pins = parsed
        .get("pins")
        .or_else(|| parsed.get("object").and_then(|o| o.get("pins")))
        .and_then(|v| v.as_array());

    let mut collector = DependencyCollector::new();
    for pin in pins.into_iter().flatten() {
        let name = pin
            .get("location")
            .or_else(|| pin.get("repositoryURL"))
            .and_then(|v| v.as_str())
            .and_then(repository_path)
            .or_else(|| {
                pin.get("identity")
                    .or_else(|| pin.get("package"))
                    .and_then(|v| v.as_str())
                    .map(String::from)
            });
        let Some(name) = name else {
            continue;
        };
        let version = pin
            .get("state")
            .and_then(|s| s.get("version"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        collector.push(&name, version, Ecosystem::Swift, false);
    }

    Ok(collector.into_vec())
}

/// `https://github.com/apple/swift-nio.git` → `github.com/apple/swift-nio`
fn repository_path(url: &str) -> Option<String> {
    let path = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url)
        .trim_end_matches('/')
        .trim_end_matches(".git");
    let path = path.rsplit_once('@').map(|(_, host)| host).unwrap_or(path);
    (!path.is_empty()).then(|| path.replacen(':', "/", 1))
}

/// Parses CocoaPods Podfile.lock.
///
/// Top-level `PODS` entries are resolved pods (subspecs fold onto their
/// root pod); `DEPENDENCIES` names the ones the Podfile declares.
pub(super) fn parse_podfile_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let mut section = "";
    let mut pods: Vec<(&str, &str)> = Vec::new();
    let mut direct: HashSet<&str> = HashSet::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with(' ') {
            section = line.trim().trim_end_matches(':');
            continue;
        }
        let Some(entry) = line.strip_prefix("  - ") else {
            continue;
        };
        let entry = entry.trim().trim_matches('"').trim_end_matches(':');
        let (name, version) = match entry.split_once(" (") {
            Some((name, rest)) => (name, rest.trim_end_matches(')')),
            None => (entry, ""),
        };
        let root = name.split('/').next().unwrap_or(name);

        match section {
            "PODS" => pods.push((root, version)),
            "DEPENDENCIES" => {
                direct.insert(root);
            }
            _ => {}
        }
    }

    let mut collector = DependencyCollector::new();
    for (name, version) in pods {
        collector.push(name, version, Ecosystem::Swift, direct.contains(name));
    }
    Ok(collector.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_resolved_v2() {
        let content = r#"{
  "pins": [
    {
      "identity": "swift-nio",
      "kind": "remoteSourceControl",
      "location": "https://github.com/apple/swift-nio.git",
      "state": {"revision": "abc", "version": "2.62.0"}
    },
    {
      "identity": "swift-algorithms",
      "location": "https://github.com/apple/swift-algorithms",
      "state": {"branch": "main", "revision": "def"}
    }
  ],
  "version": 2
}"#;
        let deps = parse_package_resolved(content).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].purl, "pkg:swift/github.com/apple/swift-nio@2.62.0");
        assert_eq!(deps[1].version, "");
    }

    #[test]
    fn test_package_resolved_v1() {
        let content = r#"{
  "object": {
    "pins": [
      {"package": "Alamofire", "repositoryURL": "https://github.com/Alamofire/Alamofire.git",
       "state": {"branch": null, "revision": "x", "version": "5.8.1"}}
    ]
  },
  "version": 1
}"#;
        let deps = parse_package_resolved(content).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "github.com/Alamofire/Alamofire");
        assert_eq!(deps[0].version, "5.8.1");
    }

    #[test]
    fn test_podfile_lock() {
        let content = "\
PODS:
  - Alamofire (5.8.1)
  - Firebase/Core (10.18.0):
    - FirebaseAnalytics (= 10.18.0)
  - FirebaseAnalytics (10.18.0)

DEPENDENCIES:
  - Alamofire (~> 5.8)
  - Firebase/Core

SPEC CHECKSUMS:
  Alamofire: abc
";
        let deps = parse_podfile_lock(content).unwrap();
        assert_eq!(deps.len(), 3);
        assert!(deps[0].is_direct);
        assert_eq!(deps[1].name, "Firebase");
        assert!(deps[1].is_direct);
        assert!(!deps[2].is_direct);
    }
}
