//! Configuration for fanout, read from `~/.fanout/config.toml`.
//!
//! ```toml
//! [runner]
//! policy = "chunkwise"
//! chunk_size = 50
//!
//! [logging]
//! filter = "fanout_core=debug"
//! ```
//!
//! Run settings resolve in layers: command-line flags, then `FANOUT_POLICY` /
//! `FANOUT_CHUNK_SIZE`, then the file, then built-in defaults.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use fanout_types::{ChunkSize, RunPolicy};

pub const POLICY_ENV: &str = "FANOUT_POLICY";
pub const CHUNK_SIZE_ENV: &str = "FANOUT_CHUNK_SIZE";
pub const DEFAULT_CHUNK_SIZE: i64 = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FanoutConfig {
    pub runner: Option<RunnerConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RunnerConfig {
    pub policy: Option<RunPolicy>,
    /// `<= 0` disables partitioning.
    pub chunk_size: Option<i64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when no filter is set in the environment.
    pub filter: Option<String>,
}

impl FanoutConfig {
    /// Load the user config. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<&str> {
        self.logging.as_ref()?.filter.as_deref()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fanout").join("config.toml"))
}

/// Policy and chunk size a run should use when the caller sets neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub policy: RunPolicy,
    pub chunk_size: ChunkSize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            policy: RunPolicy::default(),
            chunk_size: ChunkSize::new(DEFAULT_CHUNK_SIZE),
        }
    }
}

impl RunSettings {
    /// Resolve from the process environment over `config`.
    #[must_use]
    pub fn resolve(config: Option<&FanoutConfig>) -> Self {
        Self::resolve_with(config, |key| env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    ///
    /// Unparseable environment values are logged and skipped.
    pub fn resolve_with(
        config: Option<&FanoutConfig>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut settings = Self::default();

        if let Some(runner) = config.and_then(|c| c.runner.as_ref()) {
            if let Some(policy) = runner.policy {
                settings.policy = policy;
            }
            if let Some(size) = runner.chunk_size {
                settings.chunk_size = ChunkSize::new(size);
            }
        }

        if let Some(raw) = lookup(POLICY_ENV) {
            match RunPolicy::parse(&raw) {
                Some(policy) => settings.policy = policy,
                None => tracing::warn!(var = POLICY_ENV, value = %raw, "Ignoring unknown run policy"),
            }
        }
        if let Some(raw) = lookup(CHUNK_SIZE_ENV) {
            match raw.trim().parse::<i64>() {
                Ok(size) => settings.chunk_size = ChunkSize::new(size),
                Err(err) => {
                    tracing::warn!(var = CHUNK_SIZE_ENV, value = %raw, %err, "Ignoring invalid chunk size");
                }
            }
        }

        settings
    }
}
