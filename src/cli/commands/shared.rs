//! Shared components for CLI commands
//!
//! Logging setup, configuration loading and the human-readable record
//! summary used by both subcommands.

use crate::Result;
use crate::app::models::NormalizedRecord;
use crate::cli::args::{Args, FetchArgs, OutputFormat};
use crate::config::Config;
use colored::*;
use indicatif::HumanDuration;
use std::time::Duration;
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ndbc_normalizer={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (file -> env)
pub fn load_configuration(args: &Args) -> Result<Config> {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file given, using default location and environment"),
    }

    let config = Config::load(args.config_file.as_deref())?;
    config.validate()?;
    Ok(config)
}

/// Apply fetch flags on top of the loaded configuration
pub fn apply_fetch_overrides(mut config: Config, args: &FetchArgs) -> Result<Config> {
    if let Some(timeout) = args.timeout_secs {
        config = config.with_timeout_secs(timeout);
    }
    if let Some(list) = &args.sources {
        config = config.with_sources(list.sources.clone());
    }
    if args.debug {
        config = config.with_debug();
    }
    if args.prefer_both {
        config = config.with_prefer_both();
    }

    config.validate()?;
    Ok(config)
}

/// Print a body as JSON in the requested layout
pub fn print_json<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    };
    println!("{}", text);
    Ok(())
}

/// Print a record as an aligned, colored summary
pub fn print_record_summary(title: &str, source: &str, record: &NormalizedRecord, elapsed: Duration) {
    println!("\n{} {}", title.bold(), format!("({})", source).dimmed());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let observed = record
        .timestamp()
        .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string());
    summary_line("Observed", observed);
    summary_line("Sea surface", pair(record.sst_c, "°C", record.water_f, "°F"));
    summary_line("Wave height", pair(record.wave_m, "m", record.wave_ft, "ft"));
    summary_line("Air", pair(record.air_c, "°C", record.air_f, "°F"));

    let wind = record.wind_kts.map(|kts| {
        let mut text = format!("{} kts", kts);
        if let Some(mph) = record.wind_mph {
            text.push_str(&format!(" / {} mph", mph));
        }
        if let Some(mps) = record.wind_mps {
            text.push_str(&format!(" / {} m/s", mps));
        }
        text
    });
    summary_line("Wind", wind);

    let direction = record.wind_dir_deg.map(|deg| match &record.wind_dir_compass {
        Some(compass) => format!("{}° {}", deg, compass),
        None => format!("{}°", deg),
    });
    summary_line("Wind from", direction);

    println!("   • Took: {}", HumanDuration(elapsed));
    println!();
}

fn pair(primary: Option<f64>, unit: &str, secondary: Option<f64>, secondary_unit: &str) -> Option<String> {
    primary.map(|value| match secondary {
        Some(other) => format!("{}{} ({}{})", value, unit, other, secondary_unit),
        None => format!("{}{}", value, unit),
    })
}

fn summary_line(label: &str, value: Option<String>) {
    match value {
        Some(value) => println!("   • {:<12} {}", format!("{}:", label), value.green()),
        None => println!("   • {:<12} {}", format!("{}:", label), "n/a".dimmed()),
    }
}
