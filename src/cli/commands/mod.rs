//! Command implementations for the NDBC normalizer CLI
//!
//! Each command is implemented in its own module:
//! - `fetch`: network fetch with source fallback
//! - `parse`: offline parsing of a saved feed

pub mod fetch;
pub mod parse;
pub mod shared;

use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Dispatches to the subcommand handler after logging is initialized.
/// Returns an error both for failures and for stations without usable data,
/// so the binary exits non-zero in either case.
pub async fn run(args: Args) -> anyhow::Result<()> {
    shared::setup_logging(&args)?;

    match args.get_command() {
        Some(Commands::Fetch(fetch_args)) => fetch::run_fetch(&args, fetch_args).await,
        Some(Commands::Parse(parse_args)) => parse::run_parse(parse_args),
        None => Ok(()),
    }
}
