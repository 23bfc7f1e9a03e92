//! Simulator configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config. When
//! `CLOUDMOCK_CONFIG` names a file, [`SimulatorConfig::load`] reads it from there.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::lifecycle::regions::{regions_in, PARTITIONS};
use crate::model::ds::DirectoryQuotas;
use crate::model::firehose::FirehoseQuotas;
use crate::model::route53resolver::ResolverQuotas;

pub const CONFIG_ENV: &str = "CLOUDMOCK_CONFIG";

pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown partition: {0}")]
    UnknownPartition(String),

    #[error("At least one account id must be configured")]
    NoAccounts,

    #[error("Channel capacity must be greater than zero")]
    ZeroCapacity,
}

/// Per-region service quotas, applied to every region alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub directory: DirectoryQuotas,
    pub resolver: ResolverQuotas,
    pub firehose: FirehoseQuotas,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// The first entry is the default account.
    pub account_ids: Vec<String>,
    pub partitions: Vec<String>,
    pub channel_capacity: usize,
    pub quotas: QuotaConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            account_ids: vec![DEFAULT_ACCOUNT_ID.to_string()],
            partitions: PARTITIONS.iter().map(|p| p.to_string()).collect(),
            channel_capacity: 32,
            quotas: QuotaConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Reads the file named by `CLOUDMOCK_CONFIG`, or returns the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), accounts = config.account_ids.len(), "Loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account_ids.is_empty() {
            return Err(ConfigError::NoAccounts);
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if let Some(unknown) = self.partitions.iter().find(|p| regions_in(p).is_none()) {
            return Err(ConfigError::UnknownPartition(unknown.clone()));
        }
        Ok(())
    }

    pub fn default_account(&self) -> &str {
        self.account_ids.first().map_or(DEFAULT_ACCOUNT_ID, String::as_str)
    }
}
