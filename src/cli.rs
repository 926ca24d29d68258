use std::path::PathBuf;

use crate::config::{load_config, ReportConfig};
use crate::formula::{resolve_unscaled, StatValues};
use crate::report::{generate_reports, ReportSelection};

const USAGE: &str = "usage: raidstat [run|campaign|champions] [input.json] [out_dir]\n       raidstat formula <expr> [HP] [ATK] [DEF]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    Campaign,
    Champions,
    Formula,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        None | Some("run") => Some(Command::Run),
        Some("campaign") => Some(Command::Campaign),
        Some("champions") => Some(Command::Champions),
        Some("formula") => Some(Command::Formula),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Run) => handle_reports(args, ReportSelection::All),
        Some(Command::Campaign) => handle_reports(args, ReportSelection::Campaign),
        Some(Command::Champions) => handle_reports(args, ReportSelection::Champions),
        Some(Command::Formula) => handle_formula(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_reports(args: &[String], selection: ReportSelection) -> i32 {
    let mut config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };
    apply_path_overrides(&mut config, args);

    match generate_reports(&config, selection) {
        Ok(manifest) => {
            for output in &manifest.outputs {
                println!("{}\t{}", output.file, output.rows);
            }
            if manifest.formula_failures > 0 {
                println!("formula failures: {}", manifest.formula_failures);
            }
            0
        }
        Err(err) => {
            eprintln!("report run failed: {err}");
            1
        }
    }
}

/// Positional `[input.json] [out_dir]` after the command name.
fn apply_path_overrides(config: &mut ReportConfig, args: &[String]) {
    if let Some(input) = args.get(2) {
        config.input_path = PathBuf::from(input);
    }
    if let Some(out_dir) = args.get(3) {
        config.output_dir = PathBuf::from(out_dir);
    }
}

fn handle_formula(args: &[String]) -> i32 {
    let Some(expression) = args.get(2) else {
        eprintln!("usage: raidstat formula <expr> [HP] [ATK] [DEF]");
        return 2;
    };
    let stats = StatValues {
        hp: parse_f64_arg(args.get(3), "HP", 0.0),
        atk: parse_f64_arg(args.get(4), "ATK", 0.0),
        def: parse_f64_arg(args.get(5), "DEF", 0.0),
    };
    let constants = match load_config() {
        Ok(config) => config.formula,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    match resolve_unscaled(expression, stats, constants) {
        Ok(resolution) => {
            println!("expression: {}", resolution.expression);
            println!("value: {}", resolution.display_value());
            0
        }
        Err(failure) => {
            eprintln!("{failure}");
            1
        }
    }
}

fn parse_f64_arg(raw: Option<&String>, name: &str, default: f64) -> f64 {
    raw.and_then(|value| value.parse::<f64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
