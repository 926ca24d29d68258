//! Report generation: run the analyses and write every output table.
//!
//! All analysis finishes before anything is written, so a fatal error leaves
//! no partial output behind.

mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::analysis::{analyze_campaign, analyze_champions, AnalysisError, CampaignRow, ChampionReport};
use crate::config::ReportConfig;
use crate::data::{load_static_data, LoadError};

pub use writer::{dedup_rows, write_json, write_table, CsvTable, ReportError};

pub const CAMPAIGN_FILE: &str = "raid_campaign_farming_data.csv";
pub const CHAMPION_FILE: &str = "champ_basic_info.csv";
pub const SKILL_FILE: &str = "champ_moves_basic.csv";
pub const EFFECT_FILE: &str = "champ_move_details.csv";
pub const FORMULA_FAILURE_FILE: &str = "formula_parse_failures.csv";
pub const MANIFEST_FILE: &str = "report_manifest.json";

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSelection {
    All,
    Campaign,
    Champions,
}

impl ReportSelection {
    fn campaign(self) -> bool {
        matches!(self, Self::All | Self::Campaign)
    }

    fn champions(self) -> bool {
        matches!(self, Self::All | Self::Champions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSummary {
    pub file: String,
    pub rows: usize,
}

/// Written next to the tables; records what a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportManifest {
    pub generated_at: String,
    pub input_path: String,
    pub outputs: Vec<OutputSummary>,
    pub formula_failures: usize,
}

pub fn generate_reports(
    config: &ReportConfig,
    selection: ReportSelection,
) -> Result<ReportManifest, RunError> {
    let data = load_static_data(&config.input_path)?;

    let campaign: Option<Vec<CampaignRow>> = if selection.campaign() {
        Some(analyze_campaign(&data.stage_data.stages)?)
    } else {
        None
    };
    let champions: Option<ChampionReport> = if selection.champions() {
        Some(analyze_champions(&data, &config.champion_settings())?)
    } else {
        None
    };

    let out_dir = config.output_dir.as_path();
    fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut outputs = Vec::new();
    let mut formula_failures = 0;
    if let Some(rows) = &campaign {
        outputs.push(write_output(out_dir, CAMPAIGN_FILE, rows)?);
    }
    if let Some(report) = &champions {
        outputs.push(write_output(out_dir, CHAMPION_FILE, &report.champions)?);
        outputs.push(write_output(out_dir, SKILL_FILE, &report.skills)?);
        outputs.push(write_output(out_dir, EFFECT_FILE, &report.effects)?);
        outputs.push(write_output(out_dir, FORMULA_FAILURE_FILE, &report.formula_failures)?);
        formula_failures = report.formula_failures.len();
        if formula_failures > 0 {
            tracing::warn!(
                formula_failures,
                "some multiplier formulas could not be evaluated; see {}",
                FORMULA_FAILURE_FILE
            );
        }
    }

    let manifest = ReportManifest {
        generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        input_path: config.input_path.display().to_string(),
        outputs,
        formula_failures,
    };
    write_json(&out_dir.join(MANIFEST_FILE), &manifest)?;
    Ok(manifest)
}

fn write_output<T: CsvTable>(
    out_dir: &Path,
    file: &str,
    rows: &[T],
) -> Result<OutputSummary, ReportError> {
    let path: PathBuf = out_dir.join(file);
    let written = write_table(&path, rows)?;
    tracing::info!(rows = written, "wrote {}", path.display());
    Ok(OutputSummary {
        file: file.to_string(),
        rows: written,
    })
}
