// src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::ConfigError;
use crate::store::LoadOptions;

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV: &str = "NJMARKETS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the market table.
    pub source: PathBuf,
    /// Field delimiter of the market table.
    pub delimiter: char,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("Farmers Markets NJ.csv"),
            delimiter: ',',
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Read a YAML file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Config = serde_yaml::from_reader(file).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.load_options()?;
        debug!(path = %path.display(), ?cfg, "loaded config");
        Ok(cfg)
    }

    /// Resolve the config: an explicit path wins, then `NJMARKETS_CONFIG`,
    /// then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(p) => Self::from_file(p),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(p) => Self::from_file(Path::new(&p)),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn load_options(&self) -> Result<LoadOptions, ConfigError> {
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::Delimiter(self.delimiter));
        }
        Ok(LoadOptions {
            delimiter: self.delimiter as u8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "source: data/markets.csv").unwrap();
        let cfg = Config::from_file(tmp.path()).unwrap();
        assert_eq!(cfg.source, PathBuf::from("data/markets.csv"));
        assert_eq!(cfg.delimiter, ',');
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn test_delimiter_option() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "delimiter: \";\"\nlog_filter: debug").unwrap();
        let cfg = Config::from_file(tmp.path()).unwrap();
        assert_eq!(cfg.load_options().unwrap().delimiter, b';');
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "delimiter: \"\u{2013}\"").unwrap();
        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::Delimiter(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "source: [unterminated").unwrap();
        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
