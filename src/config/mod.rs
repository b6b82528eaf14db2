//! Persistent user preferences.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    currency::DEFAULT_CURRENCY_SYMBOL,
    domain::AccountColor,
    errors::LedgerError,
    storage::json_backend::{tmp_path, write_atomic},
};

pub const DEFAULT_LOG_FILTER: &str = "salary_ledger=info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory holding the collection blobs. Defaults to `<app dir>/data`.
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory backup files are written to. Defaults to `<app dir>/backups`.
    pub backup_dir: Option<PathBuf>,
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub default_color: AccountColor,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            backup_dir: None,
            log_filter: Self::default_log_filter(),
            currency_symbol: Self::default_currency_symbol(),
            default_color: AccountColor::default(),
        }
    }
}

impl Config {
    pub fn default_log_filter() -> String {
        DEFAULT_LOG_FILTER.into()
    }

    pub fn default_currency_symbol() -> String {
        DEFAULT_CURRENCY_SYMBOL.into()
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(base))
    }

    pub fn resolve_backup_dir(&self, base: &Path) -> PathBuf {
        self.backup_dir
            .clone()
            .unwrap_or_else(|| PathResolver::backup_dir_in(base))
    }
}

/// Loads and saves [`Config`] as a JSON file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the default application directory.
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::resolve_base(None))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        let path = PathResolver::config_file_in(&base);
        Ok(Self { base, path })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.currency_symbol, "€");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            backup_dir: Some(dir.path().join("exports")),
            currency_symbol: "$".into(),
            default_color: AccountColor::Cyan,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"currency_symbol":"CHF"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency_symbol, "CHF");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(
            config.resolve_data_dir(dir.path()),
            dir.path().join("data")
        );
    }
}
