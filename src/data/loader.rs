//! Load the static-data dump. A document that does not parse is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::model::StaticData;

pub const DEFAULT_STATIC_DATA_PATH: &str = "static_data.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read static data '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse static data '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_static_data(path: impl AsRef<Path>) -> Result<StaticData, LoadError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data = parse_static_data(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        stages = data.stage_data.stages.len(),
        heroes = data.hero_data.hero_types.len(),
        skills = data.skill_data.skill_types.len(),
        "loaded static data from {}",
        path.display()
    );
    Ok(data)
}

pub fn parse_static_data(raw: &str) -> Result<StaticData, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_parses() {
        let raw = r#"{
            "StageData": { "Stages": [] },
            "HeroData": { "HeroTypes": [] },
            "SkillData": { "SkillTypes": [] },
            "StaticDataLocalization": { "k": "v" }
        }"#;
        let data = parse_static_data(raw).unwrap();
        assert_eq!(data.localized("k"), Some("v"));
        assert!(data.stage_data.stages.is_empty());
    }

    #[test]
    fn missing_section_is_an_error() {
        let raw = r#"{ "StageData": { "Stages": [] } }"#;
        let err = parse_static_data(raw).unwrap_err();
        assert!(err.to_string().contains("HeroData"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_static_data("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("definitely/not/here.json"));
    }
}
