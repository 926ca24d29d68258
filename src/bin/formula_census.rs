//! List every distinct skill-effect formula in a static-data dump, how often it
//! occurs, and whether it evaluates. Output is CSV on stdout.
//! Formula constants and the default input path come from the run config.
//! Run: cargo run --bin formula_census -- [static_data.json]

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use raidstat::config::load_config;
use raidstat::data::load_static_data;
use raidstat::formula::{resolve_unscaled, StatValues};

/// Stand-in stats; any positive value exposes the same parse failures.
const SAMPLE_STATS: StatValues = StatValues {
    hp: 20_000.0,
    atk: 1_000.0,
    def: 1_000.0,
};

#[derive(Serialize)]
struct CensusRow<'a> {
    formula: &'a str,
    count: usize,
    evaluates: bool,
    sample_value: Option<f64>,
    error: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or(config.input_path);
    let data = load_static_data(&path)?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for skill in &data.skill_data.skill_types {
        for effect in &skill.effects {
            if let Some(formula) = effect.formula() {
                *counts.entry(formula).or_default() += 1;
            }
        }
    }

    let mut failing = 0;
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for (&formula, &count) in &counts {
        let row = match resolve_unscaled(formula, SAMPLE_STATS, config.formula) {
            Ok(resolution) => CensusRow {
                formula,
                count,
                evaluates: true,
                sample_value: Some(resolution.display_value()),
                error: String::new(),
            },
            Err(failure) => {
                failing += 1;
                CensusRow {
                    formula,
                    count,
                    evaluates: false,
                    sample_value: None,
                    error: failure.source.to_string(),
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    eprintln!(
        "{} distinct formulas in {}, {} do not evaluate",
        counts.len(),
        path.display(),
        failing
    );
    Ok(())
}
