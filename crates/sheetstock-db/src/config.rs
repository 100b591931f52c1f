//! # Configuration
//!
//! Settings for the `sheetstock` tool and any application embedding the
//! database layer.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment Variables (highest priority)                           │
//! │     SHEETSTOCK_DB_PATH, SHEETSTOCK_FALLBACK_LENGTH,                    │
//! │     SHEETSTOCK_MAX_UNIQUE_ATTEMPTS                                      │
//! │                                                                         │
//! │  2. Config File (sheetstock.toml)                                      │
//! │     Linux:   ~/.config/sheetstock/sheetstock.toml                      │
//! │     macOS:   ~/Library/Application Support/com.sheetstock.inventory/   │
//! │     Windows: %APPDATA%\sheetstock\inventory\config\                    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sheetstock_core::BarcodeRules;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

const CONFIG_FILE: &str = "sheetstock.toml";
const DATABASE_FILE: &str = "sheetstock.db";

/// Database location and pool size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file. Unset means the platform data directory.
    pub path: Option<PathBuf>,

    /// Default: 5
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: 5,
        }
    }
}

/// Complete configuration.
///
/// ## Example TOML
/// ```toml
/// [database]
/// path = "/srv/shop/sheetstock.db"
/// max_connections = 5
///
/// [barcode]
/// legacy_prefix = "EP-"
/// max_legacy_len = 16
/// fallback_length = 8
/// max_unique_attempts = 10000
/// fraction_tolerance = 0.002
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub barcode: BarcodeRules,
}

impl AppConfig {
    /// Loads configuration from defaults, then the file, then the environment.
    ///
    /// A missing file is not an error. An unreadable or invalid one is.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> DbResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DbError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        self.barcode.validate()?;

        if self.database.max_connections == 0 {
            return Err(DbError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// The configured database file, or `sheetstock.db` in the platform
    /// data directory.
    pub fn database_path(&self) -> DbResult<PathBuf> {
        self.database
            .path
            .clone()
            .or_else(Self::default_database_path)
            .ok_or_else(|| DbError::Config("No database path available".into()))
    }

    /// Pool settings for [`crate::Database::new`].
    pub fn db_config(&self) -> DbResult<DbConfig> {
        let path = self.database_path()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(DbConfig::new(path).max_connections(self.database.max_connections))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SHEETSTOCK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(length) = lookup("SHEETSTOCK_FALLBACK_LENGTH") {
            match length.parse::<usize>() {
                Ok(n) => self.barcode.fallback_length = n,
                Err(_) => warn!(value = %length, "Ignoring invalid SHEETSTOCK_FALLBACK_LENGTH"),
            }
        }

        if let Some(attempts) = lookup("SHEETSTOCK_MAX_UNIQUE_ATTEMPTS") {
            match attempts.parse::<usize>() {
                Ok(n) => self.barcode.max_unique_attempts = n,
                Err(_) => warn!(value = %attempts, "Ignoring invalid SHEETSTOCK_MAX_UNIQUE_ATTEMPTS"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "sheetstock", "inventory")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    fn default_database_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join(DATABASE_FILE))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.barcode, BarcodeRules::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.barcode.fallback_length = 4;
        assert!(config.validate().is_err());

        config.barcode.fallback_length = 8;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [barcode]
            fallback_length = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.barcode.fallback_length, 10);
        assert_eq!(config.barcode.legacy_prefix, "EP-");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SHEETSTOCK_DB_PATH", "/tmp/shop.db"),
            ("SHEETSTOCK_FALLBACK_LENGTH", "12"),
            ("SHEETSTOCK_MAX_UNIQUE_ATTEMPTS", "many"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.barcode.fallback_length, 12);
        // Unparseable values are ignored
        assert_eq!(config.barcode.max_unique_attempts, BarcodeRules::default().max_unique_attempts);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.database.path = Some(dir.path().join("stock.db"));
        config.barcode.max_legacy_len = 20;
        config.save(Some(path.clone())).unwrap();

        let loaded = AppConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.barcode.max_legacy_len, 20);
        assert_eq!(loaded.database_path().unwrap(), dir.path().join("stock.db"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[barcode]\nfallback_length = 2\n").unwrap();

        assert!(AppConfig::load(Some(path.clone())).is_err());
        assert_eq!(AppConfig::load_or_default(Some(path)), AppConfig::default());
    }
}
