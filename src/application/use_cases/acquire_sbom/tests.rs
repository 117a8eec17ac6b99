use super::*;
use crate::discovery::domain::{Confidence, DocumentPackage, Relationship, RELATIONSHIP_DESCRIBES};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

// Mock implementations for testing
#[derive(Default)]
struct MockHostingProvider {
    sbom: Option<DependencyDocument>,
    api_fails: bool,
    listing_fails: bool,
    files: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl MockHostingProvider {
    fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostingProvider for MockHostingProvider {
    async fn repository_info(&self, _repo: &RepositoryRef) -> crate::shared::Result<RepositoryInfo> {
        if self.api_fails {
            anyhow::bail!("rate limited");
        }
        Ok(RepositoryInfo {
            default_branch: "main".to_string(),
            languages: Vec::new(),
        })
    }

    async fn get_sbom(&self, _repo: &RepositoryRef) -> crate::shared::Result<Option<DependencyDocument>> {
        if self.api_fails {
            anyhow::bail!("rate limited");
        }
        Ok(self.sbom.clone())
    }

    async fn get_file_content(
        &self,
        _repo: &RepositoryRef,
        _branch: &str,
        path: &str,
    ) -> crate::shared::Result<Option<String>> {
        self.fetched.lock().unwrap().push(path.to_string());
        Ok(self.files.get(path).cloned())
    }

    async fn list_repo_files(
        &self,
        _repo: &RepositoryRef,
        _branch: &str,
        max_files: usize,
    ) -> crate::shared::Result<Vec<String>> {
        if self.listing_fails {
            anyhow::bail!("tree listing unavailable");
        }
        let mut paths: Vec<String> = self.files.keys().cloned().collect();
        paths.sort();
        paths.truncate(max_files);
        Ok(paths)
    }
}

struct MockProgressReporter;

impl ProgressReporter for MockProgressReporter {
    fn report(&self, _message: &str) {}
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
    fn report_error(&self, _message: &str) {}
    fn report_completion(&self, _message: &str) {}
}

const PACKAGE_LOCK: &str = r#"{
  "lockfileVersion": 3,
  "packages": {
    "": {"dependencies": {"express": "^4.18.2"}},
    "node_modules/express": {"version": "4.18.2"},
    "node_modules/express/node_modules/debug": {"version": "2.6.9"}
  }
}"#;

const PACKAGE_JSON: &str = r#"{"dependencies": {"express": "^4.0.0", "left-pad": "1.3.0"}}"#;

fn use_case(
    provider: MockHostingProvider,
    settings: AcquisitionSettings,
) -> (
    AcquireSbomUseCase<MockHostingProvider, MockProgressReporter>,
    Arc<MockHostingProvider>,
) {
    let provider = Arc::new(provider);
    let use_case =
        AcquireSbomUseCase::new(Arc::clone(&provider), Arc::new(MockProgressReporter), settings);
    (use_case, provider)
}

fn request() -> SyncRequest {
    SyncRequest::new("acme/app", RepositoryRef::new("acme", "app"))
}

fn provider_sbom() -> DependencyDocument {
    DependencyDocument {
        packages: vec![
            DocumentPackage {
                spdx_id: "SPDXRef-root".to_string(),
                name: "acme/app".to_string(),
                ..Default::default()
            },
            DocumentPackage {
                spdx_id: "SPDXRef-npm-lodash".to_string(),
                name: "npm:lodash".to_string(),
                version_info: Some("4.17.21".to_string()),
                ..Default::default()
            },
        ],
        relationships: Some(vec![Relationship::new(
            "SPDXRef-DOCUMENT",
            RELATIONSHIP_DESCRIBES,
            "SPDXRef-root",
        )]),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_provider_sbom_wins() {
    let provider = MockHostingProvider {
        sbom: Some(provider_sbom()),
        ..Default::default()
    }
    .with_file("package-lock.json", PACKAGE_LOCK);
    let (use_case, provider) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    assert_eq!(outcome.source(), Some(&SbomSource::Api));
    assert!(provider.fetched().is_empty());
}

#[tokio::test]
async fn test_root_only_sbom_falls_through_to_lockfile() {
    let mut sbom = provider_sbom();
    sbom.packages.truncate(1);
    let provider = MockHostingProvider {
        sbom: Some(sbom),
        ..Default::default()
    }
    .with_file("package-lock.json", PACKAGE_LOCK);
    let (use_case, _) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    assert_eq!(
        outcome.source(),
        Some(&SbomSource::Lockfile("package-lock.json".to_string()))
    );
}

#[tokio::test]
async fn test_lockfile_preferred_over_manifest() {
    let provider = MockHostingProvider::default()
        .with_file("package.json", PACKAGE_JSON)
        .with_file("package-lock.json", PACKAGE_LOCK);
    let (use_case, provider) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    assert_eq!(
        outcome.source(),
        Some(&SbomSource::Lockfile("package-lock.json".to_string()))
    );
    let document = outcome.document().unwrap();
    assert_eq!(document.packages.len(), 2);
    assert!(document.relationships.is_none());
    assert_eq!(provider.fetched(), vec!["package-lock.json".to_string()]);
}

#[tokio::test]
async fn test_empty_lockfile_falls_back_to_next_candidate() {
    let provider = MockHostingProvider::default()
        .with_file("package-lock.json", "{ not json")
        .with_file("package.json", PACKAGE_JSON);
    let (use_case, _) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    assert_eq!(
        outcome.source(),
        Some(&SbomSource::Lockfile("package.json".to_string()))
    );
}

#[tokio::test]
async fn test_nested_lockfiles_are_ignored() {
    let provider = MockHostingProvider::default()
        .with_file("services/api/package-lock.json", PACKAGE_LOCK)
        .with_file("app.py", "import requests\nimport os\n");
    let (use_case, _) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    assert_eq!(
        outcome.source(),
        Some(&SbomSource::ImportScan(vec!["python".to_string()]))
    );
    let document = outcome.document().unwrap();
    assert_eq!(document.confidence, Some(Confidence::High));
    assert_eq!(document.packages.len(), 1);
    assert_eq!(document.packages[0].canonical_purl(), "pkg:pip/requests");
}

#[tokio::test]
async fn test_api_failure_falls_through_to_import_scan() {
    let provider = MockHostingProvider {
        api_fails: true,
        ..Default::default()
    }
    .with_file("main.go", "package main\n\nimport \"github.com/spf13/cobra\"\n");
    let mut request = request();
    request.branch = Some("develop".to_string());
    let (use_case, _) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request).await;

    assert_eq!(
        outcome.source(),
        Some(&SbomSource::ImportScan(vec!["go".to_string()]))
    );
}

#[tokio::test]
async fn test_missing_sbom_and_lockfile_tags_both_languages() {
    let provider = MockHostingProvider::default()
        .with_file("README.md", "# app\n")
        .with_file("web/index.js", "const express = require('express');\n")
        .with_file("worker.py", "import celery\n");
    let (use_case, _) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    let source = outcome.source().unwrap();
    assert_eq!(source.to_string(), "import-scan:javascript+python");
    let document = outcome.document().unwrap();
    assert_eq!(document.confidence, Some(Confidence::High));
    assert_eq!(document.packages.len(), 2);
}

#[tokio::test]
async fn test_api_failure_without_branch_is_no_data() {
    let provider = MockHostingProvider {
        api_fails: true,
        ..Default::default()
    }
    .with_file("package-lock.json", PACKAGE_LOCK);
    let (use_case, provider) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    assert_eq!(outcome, AcquisitionOutcome::NoData);
    assert!(provider.fetched().is_empty());
}

#[tokio::test]
async fn test_listing_failure_tries_registered_filenames() {
    let provider = MockHostingProvider {
        listing_fails: true,
        ..Default::default()
    }
    .with_file(
        "Cargo.lock",
        "[[package]]\nname = \"serde\"\nversion = \"1.0.195\"\nsource = \"registry+https://github.com/rust-lang/crates.io-index\"\n",
    );
    let (use_case, provider) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    assert_eq!(
        outcome.source(),
        Some(&SbomSource::Lockfile("Cargo.lock".to_string()))
    );
    let fetched = provider.fetched();
    assert_eq!(fetched.first().map(String::as_str), Some("package-lock.json"));
    assert_eq!(fetched.last().map(String::as_str), Some("Cargo.lock"));
}

#[tokio::test]
async fn test_nothing_found_is_no_data() {
    let provider = MockHostingProvider::default()
        .with_file("README.md", "# app")
        .with_file("src/util.py", "def helper():\n    return 1\n");
    let (use_case, _) = use_case(provider, AcquisitionSettings::default());

    let outcome = use_case.execute(&request()).await;

    assert_eq!(outcome, AcquisitionOutcome::NoData);
}

#[tokio::test]
async fn test_disabled_tiers_are_skipped() {
    let provider = MockHostingProvider {
        sbom: Some(provider_sbom()),
        ..Default::default()
    }
    .with_file("package-lock.json", PACKAGE_LOCK);
    let settings = AcquisitionSettings {
        tiers: vec![AcquisitionTier::Lockfile],
        ..Default::default()
    };
    let (use_case, _) = use_case(provider, settings);

    let outcome = use_case.execute(&request()).await;

    assert_eq!(
        outcome.source(),
        Some(&SbomSource::Lockfile("package-lock.json".to_string()))
    );
}
