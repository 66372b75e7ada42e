//! progression-serve - HTTP prediction server
//!
//! Usage:
//!   progression-serve                              # ./models on 127.0.0.1:8000
//!   MODEL_DIR=/srv/model progression-serve -p 9000

use clap::Parser;
use progression_cli::commands::serve::{self, ServeArgs, ServerConfig};
use progression_cli::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = ServerConfig::from(ServeArgs::parse());
    logging::init();

    match serve::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
