//! Configuration loading and root folder resolution
//!
//! Bootstrap only: where the database lives, where to listen, how loud to
//! log. Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `MESALPHA_ROOT_FOLDER`, then `MESALPHA_ROOT` environment variables
//! 3. `root_folder` key of the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or broken config file never stops startup.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the dashboard database inside the root folder
pub const DATABASE_FILE_NAME: &str = "mesalpha.db";

const ENV_ROOT_FOLDER: &str = "MESALPHA_ROOT_FOLDER";
const ENV_ROOT: &str = "MESALPHA_ROOT";
const CONFIG_DIR_NAME: &str = "mesalpha";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database file, overrides `<root_folder>/mesalpha.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5730
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            database_path: None,
            bind_address: default_bind_address(),
            port: default_port(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file, failing on I/O or syntax errors
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load a config file if one is given and readable, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring unreadable config file: {}", e);
                Self::default()
            }
        }
    }

    /// Database file: explicit override, then config value, then root folder default
    pub fn database_path(&self, cli_arg: Option<&Path>, root_folder: &Path) -> PathBuf {
        cli_arg
            .map(Path::to_path_buf)
            .or_else(|| self.database_path.clone())
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME))
    }
}

/// OS-dependent root folder used when nothing else names one
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join(CONFIG_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\mesalpha"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join(CONFIG_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/mesalpha"))
    } else {
        dirs::data_local_dir()
            .map(|d| d.join(CONFIG_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("./mesalpha_data"))
    }
}

/// Resolves the root folder for one module
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    config_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            config_root: None,
        }
    }

    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    pub fn with_config(mut self, config: &TomlConfig) -> Self {
        self.config_root = config.root_folder.clone();
        self
    }

    /// Per-module config file: `<config_dir>/mesalpha/<module>.toml`
    pub fn config_file_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| {
            d.join(CONFIG_DIR_NAME)
                .join(format!("{}.toml", self.module_name))
        })
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        for var in [ENV_ROOT_FOLDER, ENV_ROOT] {
            if let Ok(path) = std::env::var(var) {
                if !path.is_empty() {
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(path) = &self.config_root {
            return path.clone();
        }

        default_root_folder()
    }
}

/// Prepares the resolved root folder
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root folder if missing; safe to call repeatedly
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }
}
