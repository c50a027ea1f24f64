//! # offerdesk-cli
//!
//! Command line front-end for offerdesk-core.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Parse Arguments (clap)                                              │
//! │                                                                         │
//! │  2. Initialize Logging                                                  │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,offerdesk=debug, overridden with RUST_LOG           │
//! │                                                                         │
//! │  3. Load AppConfig (env > offerdesk.toml > defaults)                    │
//! │                                                                         │
//! │  4. Dispatch Subcommand ──► commands::* ──► stdout                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Subcommands
//! - `totals <draft.json> [--edits edits.json] [--json]`
//! - `finalize <draft.json> [--edits edits.json]`
//! - `new --number 2024-0008 [--customer NAME]`
//! - `next-number --year 2024 [--counter N] [existing...]`

pub mod commands;
pub mod config;
pub mod error;

use std::path::PathBuf;

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use error::CliResult;

#[derive(Debug, Parser)]
#[command(name = "offerdesk")]
#[command(about = "Price offer totals and records")]
#[command(
    after_help = "Environment:\n  RUST_LOG            Log filter (default info,offerdesk=debug)\n  OFFERDESK_*         Config overrides, e.g. OFFERDESK_TAX_MODE=inclusive"
)]
pub struct Cli {
    /// Config file; defaults to offerdesk.toml in the platform config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print totals of a draft, optionally after replaying edits.
    Totals {
        draft: PathBuf,
        #[arg(long)]
        edits: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Save a draft as an offer record (JSON on stdout).
    Finalize {
        draft: PathBuf,
        #[arg(long)]
        edits: Option<PathBuf>,
    },
    /// Print an empty draft document dated today.
    New {
        #[arg(long)]
        number: String,
        #[arg(long)]
        customer: Option<String>,
    },
    /// Print the next YYYY-NNNN offer number.
    NextNumber {
        /// Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
        /// Last number handed out this year, if tracked.
        #[arg(long)]
        counter: Option<u32>,
        /// Offer numbers already in use.
        existing: Vec<String>,
    },
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=offerdesk_core=trace` - Trace for the core crate only
/// - Default: `info,offerdesk=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,offerdesk=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one parsed invocation and returns what to print.
pub fn run(cli: Cli) -> CliResult<String> {
    let config = AppConfig::load(cli.config.as_deref())?;
    info!(company = %config.company.name, "Configuration loaded");

    match cli.command {
        Commands::Totals { draft, edits, json } => {
            commands::totals(&draft, edits.as_deref(), json, &config)
        }
        Commands::Finalize { draft, edits } => {
            commands::finalize(&draft, edits.as_deref(), &config)
        }
        Commands::New { number, customer } => {
            commands::new_draft(&number, customer.as_deref(), Utc::now(), &config)
        }
        Commands::NextNumber {
            year,
            counter,
            existing,
        } => {
            let year = year.unwrap_or_else(|| Utc::now().year());
            Ok(commands::next_number(year, counter, &existing))
        }
    }
}
