//! Configuration loading
//!
//! Resolution priority:
//! 1. Command-line argument / environment variable (applied by the binary
//!    through [`ConfigOverrides`])
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! A missing config file is not fatal: the service logs a warning and
//! starts on defaults. A config file that exists but does not parse is an
//! error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Rule set applied to claim creation and claim decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimPolicy {
    /// Accept every claim and every decision (re-decisions re-apply the
    /// item effect)
    #[default]
    Permissive,
    /// Refuse claims on unavailable items, decisions on already-decided
    /// claims, approvals of already-claimed items, and unknown statuses
    Strict,
}

/// Detector process configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Disable to skip detection entirely (items get no detected objects)
    pub enabled: bool,
    /// Program followed by its leading arguments; the image path is
    /// appended as the last argument
    pub command: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: vec!["python3".to_string(), "yolo_detector.py".to_string()],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Service configuration as read from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Interface to bind
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Directory holding uploaded item photos
    pub uploads_dir: PathBuf,
    /// Per-subscriber event buffer size
    pub event_capacity: usize,
    pub claim_policy: ClaimPolicy,
    pub detector: DetectorConfig,
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            uploads_dir: PathBuf::from("uploads"),
            event_capacity: 100,
            claim_policy: ClaimPolicy::default(),
            detector: DetectorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
        })
    }

    /// Parse and validate config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("Parse failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(Error::Config(
                "event_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from the explicit path if given, else from the platform default
    /// location, else fall back to defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => {
                warn!("Config file {} not found, using defaults", p.display());
                None
            }
            None => default_config_path(),
        };

        match path {
            Some(p) => {
                info!("Loading config from {}", p.display());
                Self::load(&p)
            }
            None => {
                if explicit.is_none() {
                    info!("No config file found, using defaults");
                }
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line / environment overrides on top of file values
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(dir) = overrides.uploads_dir {
            self.uploads_dir = dir;
        }
        self
    }

    /// `host:port` string for binding the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Highest-priority values, typically from clap with `env` fallbacks
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub uploads_dir: Option<PathBuf>,
}

/// Default configuration file path for the platform, if one exists
///
/// Checks `<config_dir>/lostfound/config.toml` (e.g.
/// `~/.config/lostfound/config.toml` on Linux), then
/// `/etc/lostfound/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("lostfound").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/lostfound/config.toml");
    if cfg!(unix) && system_config.exists() {
        return Some(system_config);
    }

    None
}
