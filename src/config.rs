//! Runtime configuration for the terminal binary.
//!
//! Stored as TOML. The file is looked up at, in order:
//!
//! 1. `$BLOCKFALL_CONFIG`
//! 2. `<config dir>/blockfall/config.toml` (via `dirs`)
//! 3. `config/blockfall.toml` relative to the working directory
//!
//! A missing file is created with the defaults.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::TICK_MS;

/// Environment variable overriding the config file path
pub const CONFIG_ENV_VAR: &str = "BLOCKFALL_CONFIG";

const FALLBACK_CONFIG_PATH: &str = "config/blockfall.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host frame cadence; each frame advances the session by this many ms
    pub frame_ms: u32,
    /// Fixed seed for reproducible games; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Draw the landing preview under the active piece
    pub show_ghost: bool,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_ms: TICK_MS,
            seed: None,
            show_ghost: true,
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `env_logger` filter, e.g. `info` or `blockfall_core=debug`
    pub level: String,
    /// Log destination; the terminal itself is owned by the renderer
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("blockfall.log"),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid config file: {e}"),
            ConfigError::Serialize(e) => write!(f, "could not serialize config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}

impl Config {
    /// Load from the default location, creating it if missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    /// Load from `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// A zero frame would stall the clock.
    fn sanitized(mut self) -> Self {
        if self.frame_ms == 0 {
            self.frame_ms = TICK_MS;
        }
        self
    }
}

/// Path the binary reads its config from
pub fn config_path() -> PathBuf {
    resolve_path(std::env::var_os(CONFIG_ENV_VAR), dirs::config_dir())
}

fn resolve_path(env_override: Option<OsString>, config_dir: Option<PathBuf>) -> PathBuf {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    match config_dir {
        Some(dir) => dir.join("blockfall").join("config.toml"),
        None => PathBuf::from(FALLBACK_CONFIG_PATH),
    }
}
