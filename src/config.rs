//! Run configuration. Every field is optional in the YAML file; missing
//! fields take the built-in defaults.
//!
//! ```yaml
//! input_path: static_data.json
//! output_dir: reports
//! formula:
//!   max_stamina: 100.0
//!   hero_level: 60.0
//! stat_divisors:
//!   hp: 26002616.5
//!   atk_def: 390039247.5
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{ChampionSettings, StatDivisors};
use crate::data::DEFAULT_STATIC_DATA_PATH;
use crate::formula::FormulaConstants;

pub const DEFAULT_CONFIG_PATH: &str = "raidstat.yaml";
pub const CONFIG_PATH_ENV: &str = "RAIDSTAT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub formula: FormulaConstants,
    pub stat_divisors: StatDivisors,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_STATIC_DATA_PATH),
            output_dir: PathBuf::from("."),
            formula: FormulaConstants::default(),
            stat_divisors: StatDivisors::default(),
        }
    }
}

impl ReportConfig {
    pub fn champion_settings(&self) -> ChampionSettings {
        ChampionSettings {
            divisors: self.stat_divisors,
            constants: self.formula,
        }
    }
}

pub fn load_config_file(path: impl AsRef<Path>) -> Result<ReportConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_config(raw: &str) -> Result<ReportConfig, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(ReportConfig::default());
    }
    serde_yaml::from_str(raw)
}

/// `$RAIDSTAT_CONFIG` if set (the file must exist), else `raidstat.yaml` in
/// the working directory if present, else defaults.
pub fn load_config() -> Result<ReportConfig, ConfigError> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        tracing::debug!("loading config from ${CONFIG_PATH_ENV}={path}");
        return load_config_file(path);
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.is_file() {
        tracing::debug!("loading config from {}", default_path.display());
        return load_config_file(default_path);
    }
    Ok(ReportConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = parse_config("output_dir: out\nformula:\n  hero_level: 50\n").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.input_path, PathBuf::from("static_data.json"));
        assert_eq!(config.formula.hero_level, 50.0);
        assert_eq!(config.formula.max_stamina, 100.0);
        assert_eq!(config.stat_divisors, StatDivisors::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), ReportConfig::default());
    }

    #[test]
    fn unknown_shape_is_an_error() {
        assert!(parse_config("formula: [1, 2]").is_err());
    }

    #[test]
    fn settings_follow_config() {
        let mut config = ReportConfig::default();
        config.stat_divisors.hp = 1.0;
        let settings = config.champion_settings();
        assert_eq!(settings.divisors.hp, 1.0);
        assert_eq!(settings.constants, FormulaConstants::default());
    }
}
