use clap::Parser;
use ndbc_normalizer::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // No subcommand: show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::Error::from(ndbc_normalizer::Error::processing_interrupted("Interrupted by user")))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("NDBC Normalizer - NOAA buoy feeds as one stable JSON record");
    println!("============================================================");
    println!();
    println!("USAGE:");
    println!("    ndbc-normalizer <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    fetch       Fetch and normalize the latest observation for a station");
    println!("    parse       Parse a saved .ocean/.spec/.txt/.rss file offline");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    ndbc-normalizer fetch 44013");
    println!("    ndbc-normalizer fetch 46042 --prefer-both --format summary");
    println!("    ndbc-normalizer parse 44013.spec --format-hint spec");
    println!();
    println!("For detailed help on any command, use:");
    println!("    ndbc-normalizer <COMMAND> --help");
}
