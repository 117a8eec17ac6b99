use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 200;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_REPO_FILES: usize = 5000;

/// One acquisition strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcquisitionTier {
    Api,
    Lockfile,
    ImportScan,
}

impl AcquisitionTier {
    pub const ALL: [AcquisitionTier; 3] = [
        AcquisitionTier::Api,
        AcquisitionTier::Lockfile,
        AcquisitionTier::ImportScan,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionSettings {
    /// Cap on the repository listing used by the lockfile and import tiers
    pub max_repo_files: usize,
    /// Enabled tiers; always attempted in the fixed api → lockfile → import-scan order
    pub tiers: Vec<AcquisitionTier>,
}

impl AcquisitionSettings {
    pub fn is_enabled(&self, tier: AcquisitionTier) -> bool {
        self.tiers.contains(&tier)
    }
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            max_repo_files: DEFAULT_MAX_REPO_FILES,
            tiers: AcquisitionTier::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentSettings {
    /// Concurrent registry lookups per batch
    pub batch_size: usize,
    /// Pause between batches
    pub batch_delay: Duration,
    /// Upper bound on one lookup, retries included
    pub request_timeout: Duration,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}
