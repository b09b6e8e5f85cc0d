//! Configuration management
//!
//! Everything comes from the environment:
//! - `BANK_DATA_FILE`: optional JSON file the bank is loaded from and saved to
//! - `BANKLINE_DIR`: application directory holding the event log
//!   (default `~/.bankline`)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the persistence target
pub const DATA_FILE_ENV: &str = "BANK_DATA_FILE";

/// Environment variable overriding the application directory
pub const APP_DIR_ENV: &str = "BANKLINE_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// None keeps the bank in memory only
    pub data_file: Option<PathBuf>,
    pub app_dir: PathBuf,
}

impl Config {
    /// Load config from the environment
    pub fn load() -> Result<Self> {
        let app_dir = match std::env::var_os(APP_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .context("Could not find home directory")?
                .join(".bankline"),
        };

        let data_file = std::env::var_os(DATA_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self { data_file, app_dir })
    }

    /// Build a config without consulting the environment
    pub fn new(app_dir: &Path, data_file: Option<&Path>) -> Self {
        Self {
            data_file: data_file.map(Path::to_path_buf),
            app_dir: app_dir.to_path_buf(),
        }
    }

    /// Override the persistence target (e.g. from a command-line flag)
    pub fn with_data_file(mut self, data_file: Option<PathBuf>) -> Self {
        if data_file.is_some() {
            self.data_file = data_file;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_data_file_overrides_only_when_set() {
        let config = Config::new(Path::new("/tmp/app"), Some(Path::new("/tmp/a.json")));

        let kept = config.clone().with_data_file(None);
        assert_eq!(kept.data_file, Some(PathBuf::from("/tmp/a.json")));

        let replaced = config.with_data_file(Some(PathBuf::from("/tmp/b.json")));
        assert_eq!(replaced.data_file, Some(PathBuf::from("/tmp/b.json")));
        assert_eq!(replaced.app_dir, PathBuf::from("/tmp/app"));
    }
}
