use crate::defaults;
use crate::error::{PolyvoxError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub gcp: GcpConfig,
    pub pipeline: PipelineConfig,
}

/// Google Cloud project and endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GcpConfig {
    pub project: String,
    pub bucket: String,
    pub location: String,
    pub model: String,
    /// Opaque bearer token for the REST APIs. Usually supplied via the
    /// GOOGLE_ACCESS_TOKEN environment variable rather than the file.
    pub access_token: Option<String>,
}

/// Pipeline staging and deadline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub workspace: PathBuf,
    pub recognize_timeout_secs: u64,
    pub synthesize_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            bucket: String::new(),
            location: defaults::DEFAULT_LOCATION.to_string(),
            model: defaults::DEFAULT_GENERATION_MODEL.to_string(),
            access_token: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("."),
            recognize_timeout_secs: defaults::RECOGNIZE_TIMEOUT_SECS,
            synthesize_timeout_secs: defaults::SYNTHESIZE_TIMEOUT_SECS,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
        }
    }
}

impl PipelineConfig {
    pub fn recognize_timeout(&self) -> Duration {
        Duration::from_secs(self.recognize_timeout_secs)
    }

    pub fn synthesize_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesize_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - POLYVOX_PROJECT → gcp.project
    /// - POLYVOX_BUCKET → gcp.bucket
    /// - POLYVOX_WORKSPACE → pipeline.workspace
    /// - GOOGLE_ACCESS_TOKEN → gcp.access_token
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(project) = std::env::var("POLYVOX_PROJECT")
            && !project.is_empty()
        {
            self.gcp.project = project;
        }

        if let Ok(bucket) = std::env::var("POLYVOX_BUCKET")
            && !bucket.is_empty()
        {
            self.gcp.bucket = bucket;
        }

        if let Ok(workspace) = std::env::var("POLYVOX_WORKSPACE")
            && !workspace.is_empty()
        {
            self.pipeline.workspace = PathBuf::from(workspace);
        }

        if let Ok(token) = std::env::var(defaults::TOKEN_ENV)
            && !token.is_empty()
        {
            self.gcp.access_token = Some(token);
        }

        self
    }

    /// Verify the fields required to talk to the cloud services are present.
    ///
    /// Called before constructing API clients, so that `--check` and the
    /// no-flags invocation work without any credentials.
    pub fn require_cloud(&self) -> Result<()> {
        if self.gcp.bucket.is_empty() {
            return Err(PolyvoxError::ConfigInvalidValue {
                key: "gcp.bucket".to_string(),
                message: "must not be empty (set POLYVOX_BUCKET)".to_string(),
            });
        }
        if self.gcp.project.is_empty() {
            return Err(PolyvoxError::ConfigInvalidValue {
                key: "gcp.project".to_string(),
                message: "must not be empty (set POLYVOX_PROJECT)".to_string(),
            });
        }
        if self.gcp.access_token.as_deref().unwrap_or("").is_empty() {
            return Err(PolyvoxError::ConfigInvalidValue {
                key: "gcp.access_token".to_string(),
                message: format!("must be set (usually via {})", defaults::TOKEN_ENV),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/polyvox/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("polyvox")
            .join("config.toml")
    }
}
