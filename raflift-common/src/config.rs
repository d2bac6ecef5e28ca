//! Configuration loading and resolution
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or broken TOML file never stops startup. It is logged and the
//! remaining tiers are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "RAFLIFT_DATABASE";

/// Environment variable overriding the listen address
pub const ENV_BIND: &str = "RAFLIFT_BIND";

/// Default listen address for raflift-an
pub const DEFAULT_BIND: &str = "127.0.0.1:5728";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// SQLite database file
    pub database: Option<PathBuf>,
    /// Listen address, e.g. "127.0.0.1:5728"
    pub bind: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging section of `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Compiled-in fallbacks for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database: PathBuf,
    pub bind: SocketAddr,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join("raflift"))
            .unwrap_or_else(|| PathBuf::from("./raflift_data"));

        Self {
            database: data_dir.join("raflift.db"),
            // Constant literal, parse cannot fail
            bind: DEFAULT_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 5728))),
            log_level: default_log_level(),
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database: PathBuf,
    pub bind: SocketAddr,
    pub log_level: String,
}

/// Resolves [`ServiceConfig`] from CLI, environment, TOML and defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_database: Option<PathBuf>,
    cli_bind: Option<String>,
    config_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, path: Option<PathBuf>) -> Self {
        self.cli_database = path;
        self
    }

    pub fn with_bind(mut self, bind: Option<String>) -> Self {
        self.cli_bind = bind;
        self
    }

    /// Use an explicit TOML file instead of the platform default location
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn resolve(&self) -> Result<ServiceConfig> {
        let defaults = CompiledDefaults::for_current_platform();
        let toml_config = self.load_toml();

        let database = if let Some(path) = &self.cli_database {
            path.clone()
        } else if let Ok(path) = std::env::var(ENV_DATABASE) {
            PathBuf::from(path)
        } else if let Some(path) = &toml_config.database {
            path.clone()
        } else {
            defaults.database
        };

        let bind = if let Some(bind) = &self.cli_bind {
            parse_bind(bind, "command line")?
        } else if let Ok(bind) = std::env::var(ENV_BIND) {
            parse_bind(&bind, ENV_BIND)?
        } else if let Some(bind) = &toml_config.bind {
            parse_bind(bind, "config file")?
        } else {
            defaults.bind
        };

        Ok(ServiceConfig {
            database,
            bind,
            log_level: toml_config.logging.level,
        })
    }

    fn load_toml(&self) -> TomlConfig {
        let path = match self.config_path.clone().or_else(default_config_path) {
            Some(path) => path,
            None => return TomlConfig::default(),
        };

        if !path.exists() {
            if self.config_path.is_some() {
                warn!("Config file not found: {} (using defaults)", path.display());
            }
            return TomlConfig::default();
        }

        match read_toml_config(&path) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("{} (using defaults)", e);
                TomlConfig::default()
            }
        }
    }
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// `<config_dir>/raflift/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("raflift").join("config.toml"))
}

fn parse_bind(value: &str, source: &str) -> Result<SocketAddr> {
    value
        .parse()
        .map_err(|e| Error::Config(format!("Invalid bind address '{}' from {}: {}", value, source, e)))
}
