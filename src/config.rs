//! Configuration file support for sbom-depgraph.
//!
//! Provides YAML-based configuration through `sbom-depgraph.config.yml` files,
//! including data structures, file loading, validation, and conversion into
//! the settings the use cases and adapters take.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::adapters::outbound::network::HttpSettings;
use crate::application::dto::{
    AcquisitionSettings, AcquisitionTier, EnrichmentSettings, OutputFormat,
};
use crate::shared::error::DepGraphError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "sbom-depgraph.config.yml";

/// Ecosystems that have a registry client and accept a `base_url` override
pub const CONFIGURABLE_REGISTRIES: [&str; 4] = ["npm", "pip", "cargo", "gem"];

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub fail_on_gaps: Option<usize>,
    pub enrichment: Option<EnrichmentConfig>,
    pub acquisition: Option<AcquisitionConfig>,
    #[serde(default)]
    pub registries: HashMap<String, EndpointConfig>,
    pub github: Option<EndpointConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EnrichmentConfig {
    pub batch_size: Option<usize>,
    pub batch_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AcquisitionConfig {
    pub max_repo_files: Option<usize>,
    pub tiers: Option<Vec<AcquisitionTier>>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// API root override for a registry or the hosting provider
#[derive(Debug, Deserialize, Default)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
}

impl ConfigFile {
    /// Output format, if the file sets one; validated on load
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format.as_deref().and_then(|f| f.parse().ok())
    }

    pub fn enrichment_settings(&self) -> EnrichmentSettings {
        let defaults = EnrichmentSettings::default();
        let Some(enrichment) = &self.enrichment else {
            return defaults;
        };
        EnrichmentSettings {
            batch_size: enrichment.batch_size.unwrap_or(defaults.batch_size),
            batch_delay: enrichment
                .batch_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.batch_delay),
            request_timeout: enrichment
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn acquisition_settings(&self) -> AcquisitionSettings {
        let defaults = AcquisitionSettings::default();
        let Some(acquisition) = &self.acquisition else {
            return defaults;
        };
        AcquisitionSettings {
            max_repo_files: acquisition.max_repo_files.unwrap_or(defaults.max_repo_files),
            tiers: acquisition.tiers.clone().unwrap_or(defaults.tiers),
        }
    }

    /// HTTP settings shared by every registry client and the provider
    pub fn http_settings(&self) -> HttpSettings {
        let defaults = HttpSettings::default();
        let enrichment = self.enrichment.as_ref();
        HttpSettings {
            timeout: enrichment
                .and_then(|e| e.request_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: enrichment
                .and_then(|e| e.max_retries)
                .unwrap_or(defaults.max_retries),
        }
    }

    pub fn registry_base_url(&self, ecosystem: &str) -> Option<&str> {
        self.registries
            .get(ecosystem)
            .and_then(|endpoint| endpoint.base_url.as_deref())
    }

    pub fn github_base_url(&self) -> Option<&str> {
        self.github
            .as_ref()
            .and_then(|endpoint| endpoint.base_url.as_deref())
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| DepGraphError::ConfigError {
        path: path.to_path_buf(),
        details: format!("Failed to read config file: {}", e),
        hint: "Check that the file exists and is readable.".to_string(),
    })?;

    let config: ConfigFile =
        serde_yaml_ng::from_str(&content).map_err(|e| DepGraphError::ConfigError {
            path: path.to_path_buf(),
            details: format!("Failed to parse config file: {}", e),
            hint: "Ensure the file contains valid YAML syntax.".to_string(),
        })?;

    validate_config(&config, path)?;
    warn_unknown_fields(&config);

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile, path: &Path) -> Result<()> {
    let invalid = |details: String, hint: &str| -> anyhow::Error {
        DepGraphError::ConfigError {
            path: path.to_path_buf(),
            details,
            hint: hint.to_string(),
        }
        .into()
    };

    if let Some(format) = config.format.as_deref() {
        if format.parse::<OutputFormat>().is_err() {
            return Err(invalid(
                format!("format '{}' is not supported", format),
                "Use 'json' or 'summary'.",
            ));
        }
    }

    if let Some(enrichment) = &config.enrichment {
        if enrichment.batch_size == Some(0) {
            return Err(invalid(
                "enrichment.batch_size must be at least 1".to_string(),
                "The default batch size is 10.",
            ));
        }
        if enrichment.request_timeout_secs == Some(0) {
            return Err(invalid(
                "enrichment.request_timeout_secs must be at least 1".to_string(),
                "The default per-request timeout is 10 seconds.",
            ));
        }
    }

    if let Some(acquisition) = &config.acquisition {
        if acquisition.max_repo_files == Some(0) {
            return Err(invalid(
                "acquisition.max_repo_files must be at least 1".to_string(),
                "The default listing cap is 5000 files.",
            ));
        }
        if acquisition.tiers.as_ref().is_some_and(Vec::is_empty) {
            return Err(invalid(
                "acquisition.tiers must enable at least one tier".to_string(),
                "Valid tiers are 'api', 'lockfile' and 'import-scan'.",
            ));
        }
    }

    for (ecosystem, endpoint) in &config.registries {
        if !CONFIGURABLE_REGISTRIES.contains(&ecosystem.as_str()) {
            return Err(invalid(
                format!("registries.{} has no registry client", ecosystem),
                "Registry overrides are supported for npm, pip, cargo and gem.",
            ));
        }
        validate_base_url(endpoint, &format!("registries.{}.base_url", ecosystem))
            .map_err(|details| invalid(details, "Base URLs must start with http:// or https://."))?;
    }

    if let Some(github) = &config.github {
        validate_base_url(github, "github.base_url")
            .map_err(|details| invalid(details, "Base URLs must start with http:// or https://."))?;
    }

    Ok(())
}

fn validate_base_url(endpoint: &EndpointConfig, field: &str) -> std::result::Result<(), String> {
    match endpoint.base_url.as_deref() {
        Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => {
            Err(format!("{} '{}' is not an HTTP URL", field, url))
        }
        _ => Ok(()),
    }
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let nested = config
        .enrichment
        .iter()
        .flat_map(|e| e.unknown_fields.keys().map(|k| format!("enrichment.{}", k)))
        .chain(
            config
                .acquisition
                .iter()
                .flat_map(|a| a.unknown_fields.keys().map(|k| format!("acquisition.{}", k))),
        );

    for key in config.unknown_fields.keys().cloned().chain(nested) {
        tracing::warn!(field = %key, "Unknown config field will be ignored");
    }
}
