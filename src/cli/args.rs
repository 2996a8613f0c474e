//! Command-line argument definitions for the NDBC normalizer
//!
//! This module defines the CLI interface using the clap derive API. Global
//! flags (verbosity, config file) apply to every subcommand.

use crate::app::models::{ParserPipeline, SourceFormat};
use crate::config::parse_sources;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the NDBC buoy feed normalizer
///
/// Fetches NOAA NDBC station feeds and turns them into one stable JSON
/// record, or parses a saved feed offline.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ndbc-normalizer",
    version,
    about = "Normalize NOAA NDBC buoy feeds into a stable JSON record",
    long_about = "Fetches a station's .ocean, .spec, realtime2 .txt and RSS feeds in priority \
                  order and normalizes the first one with usable data (sea-surface temperature, \
                  wave height, air temperature, wind) into a single JSON record. The parse \
                  subcommand runs the same parsers over a feed saved to disk."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// `<config dir>/ndbc-normalizer/config.toml`.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Fetch and normalize the latest observation for a station
    Fetch(FetchArgs),
    /// Parse a saved feed file without touching the network
    Parse(ParseArgs),
}

/// Arguments for the fetch command
#[derive(Debug, Clone, Parser)]
pub struct FetchArgs {
    /// NDBC station identifier, e.g. 44013
    #[arg(value_name = "STATION")]
    pub station: String,

    /// Compose SST and wave height from different sources when needed
    #[arg(long = "prefer-both")]
    pub prefer_both: bool,

    /// Echo raw upstream bodies when no source yields data
    #[arg(long = "debug")]
    pub debug: bool,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Source priority order
    #[arg(
        long = "sources",
        value_name = "LIST",
        help = "Comma-separated source order (ocean,spec,realtime2,rss)"
    )]
    pub sources: Option<SourceList>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Saved feed file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Feed format the file was downloaded as
    #[arg(long = "format-hint", value_name = "FORMAT", value_parser = parse_format_hint)]
    pub format_hint: SourceFormat,

    /// Force a parser pipeline instead of the one the format implies
    #[arg(long = "pipeline", value_enum)]
    pub pipeline: Option<PipelineChoice>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,
}

/// Output formats for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON body
    Json,
    /// Indented JSON body
    Pretty,
    /// Human-readable summary
    Summary,
}

/// Parser pipeline selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PipelineChoice {
    Column,
    KeyValue,
}

impl From<PipelineChoice> for ParserPipeline {
    fn from(choice: PipelineChoice) -> Self {
        match choice {
            PipelineChoice::Column => ParserPipeline::ColumnTable,
            PipelineChoice::KeyValue => ParserPipeline::KeyValue,
        }
    }
}

/// Wrapper for parsing comma-separated source lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceList {
    pub sources: Vec<SourceFormat>,
}

impl FromStr for SourceList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let sources = parse_sources(s)?;
        if sources.is_empty() {
            return Err(Error::configuration("Source list cannot be empty"));
        }
        Ok(Self { sources })
    }
}

fn parse_format_hint(value: &str) -> Result<SourceFormat> {
    value.parse()
}

impl Args {
    /// Get the command to execute, defaulting to help when none was given
    pub fn get_command(&self) -> Option<&Commands> {
        self.command.as_ref()
    }

    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
