//! progression-train - fit a regressor on the diabetes dataset
//!
//! Usage:
//!   progression-train                            # linear model into ./models
//!   progression-train --kind rf --out_dir out    # random forest into ./out

use clap::Parser;
use progression_cli::commands::train::{self, TrainArgs};
use progression_cli::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = TrainArgs::parse();
    logging::init();

    match train::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
