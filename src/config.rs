//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/medequip-portal/config.toml`).
//! Every section and field has a default, so an empty file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Permission;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Default config path: `<config_dir>/medequip-portal/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medequip-portal")
        .join("config.toml")
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub import: ImportConfig,
    pub library: LibraryConfig,
    pub assets: AssetsConfig,
    pub accounts: AccountsConfig,
    pub repairs: RepairsConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            shutdown_timeout: 10,
        }
    }
}

/// Locations of the three flat files plus the repair log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub settings_file: String,
    pub users_file: String,
    pub equipment_file: String,
    pub repairs_file: String,
}

impl StorageConfig {
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(&self.settings_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    pub fn equipment_path(&self) -> PathBuf {
        self.data_dir.join(&self.equipment_file)
    }

    pub fn repairs_path(&self) -> PathBuf {
        self.data_dir.join(&self.repairs_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            settings_file: "config.json".to_string(),
            users_file: "users.json".to_string(),
            equipment_file: "equipment.csv".to_string(),
            repairs_file: "repairs.json".to_string(),
        }
    }
}

/// Import sources are `<source_dir>/<file_prefix><n>.<extension>`, n = 1..=max_sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub source_dir: PathBuf,
    pub file_prefix: String,
    pub extension: String,
    pub max_sources: u32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data/imports"),
            file_prefix: "import_".to_string(),
            extension: "csv".to_string(),
            max_sources: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub public_dir: PathBuf,
    pub core_dir: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("work_files/public"),
            core_dir: PathBuf::from("work_files/core"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Fixed year equipment age is measured against (not wall-clock).
    pub reference_year: i32,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            reference_year: 2025,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Permissions granted to accounts created through the admin panel.
    pub default_permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairsConfig {
    pub departments: Vec<String>,
}

impl Default for RepairsConfig {
    fn default() -> Self {
        Self {
            departments: vec![
                "ICU".to_string(),
                "Operating Room".to_string(),
                "Radiology".to_string(),
                "Internal Medicine".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub token_secret: String,
    pub session_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            token_secret: "change-me-medequip-portal".to_string(),
            session_hours: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
