//! # offerdesk
//!
//! Entry point. Argument parsing, logging and dispatch live in `lib.rs`
//! so they can be tested.

use std::process::ExitCode;

use clap::Parser;
use offerdesk_cli::{init_tracing, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "command failed");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
