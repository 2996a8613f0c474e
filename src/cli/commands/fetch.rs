//! Fetch command: resolve one station over the network

use anyhow::bail;
use std::time::Instant;
use tracing::info;

use super::shared::{apply_fetch_overrides, load_configuration, print_json, print_record_summary};
use crate::app::services::fallback_orchestrator::{
    AttemptOutcome, FallbackOrchestrator, HttpFetcher, Resolution, StationResponse,
};
use crate::cli::args::{Args, FetchArgs, OutputFormat};
use colored::*;

/// Run the fetch command
pub async fn run_fetch(args: &Args, fetch_args: &FetchArgs) -> anyhow::Result<()> {
    let config = apply_fetch_overrides(load_configuration(args)?, fetch_args)?;
    info!(
        "Fetching station {} from {} sources (prefer both: {})",
        fetch_args.station,
        config.sources.len(),
        config.prefer_both
    );

    let fetcher = HttpFetcher::from_config(&config)?;
    let orchestrator = FallbackOrchestrator::new(fetcher, config);

    let start = Instant::now();
    let resolution = orchestrator.resolve(&fetch_args.station).await;
    let response = StationResponse::from_resolution(&fetch_args.station, &resolution);

    match fetch_args.output_format {
        OutputFormat::Summary => print_summary(&resolution, start),
        format => print_json(&response.body, format)?,
    }

    if !response.is_success() {
        bail!(
            "station {} answered with status {}",
            fetch_args.station.trim(),
            response.status
        );
    }
    Ok(())
}

fn print_summary(resolution: &Resolution, start: Instant) {
    match &resolution.result {
        Ok(report) => {
            print_record_summary(
                &format!("Station {}", report.station),
                &report.source,
                &report.record,
                start.elapsed(),
            );
            for attempt in &report.attempts {
                let outcome = match &attempt.outcome {
                    AttemptOutcome::Parsed => "parsed".green(),
                    AttemptOutcome::NoData => "no data".yellow(),
                    AttemptOutcome::TransportFailed { message } => message.as_str().red(),
                };
                println!("   {} {} ({} tries)", attempt.format.tag().bold(), outcome, attempt.tries);
            }
        }
        Err(error) => println!("{} {}", "✗".red(), error),
    }
}
