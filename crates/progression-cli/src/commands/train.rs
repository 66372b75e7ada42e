//! Train command: fit one model kind and write `model.pkl` + `metrics.json`.

use crate::error::Result;
use clap::Parser;
use colored::Colorize;
use progression::training::{train, TrainOutcome};
use std::path::PathBuf;

/// Train a diabetes progression regressor and save its artifacts
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "progression-train")]
#[command(author, version, about, long_about = None)]
pub struct TrainArgs {
    /// Directory that receives model.pkl and metrics.json
    #[arg(long = "out_dir", visible_alias = "out-dir", default_value = "models")]
    pub out_dir: PathBuf,

    /// Model kind: linear, ridge or rf
    #[arg(long, default_value = "linear")]
    pub kind: String,
}

/// Run the train command.
///
/// Prints the artifact directory followed by the metrics document.
pub fn run(args: &TrainArgs) -> Result<TrainOutcome> {
    println!(
        "{} {}",
        "Training".cyan().bold(),
        format!("kind={} out_dir={}", args.kind, args.out_dir.display()).dimmed()
    );

    let outcome = train(&args.out_dir, &args.kind)?;

    println!(
        "{} {}",
        "Saved model and metrics to:".green(),
        outcome.paths.dir.display()
    );
    println!("{}", outcome.metrics.to_json_pretty()?);
    Ok(outcome)
}
