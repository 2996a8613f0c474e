//! Fallback orchestrator for station requests
//!
//! The parsers never do I/O. This module sits one level above them: it
//! validates the station, fetches each configured feed through a
//! [`SourceFetcher`], hands the body to the matching parser and falls back to
//! the next source on a transport failure or an absent result. It owns
//! timeouts and retries, and distinguishes "nothing usable in any answer"
//! from "every request failed".
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ndbc_normalizer::Config;
//! use ndbc_normalizer::app::services::fallback_orchestrator::{FallbackOrchestrator, HttpFetcher};
//!
//! # async fn example() -> ndbc_normalizer::Result<()> {
//! let config = Config::default();
//! let orchestrator = FallbackOrchestrator::new(HttpFetcher::from_config(&config)?, config);
//!
//! let response = orchestrator.respond("44013").await;
//! println!("{} {}", response.status, response.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod fetcher;
pub mod http;
pub mod orchestrator;
pub mod response;

#[cfg(test)]
pub mod tests;

pub use fetcher::SourceFetcher;
pub use http::HttpFetcher;
pub use orchestrator::{
    AttemptOutcome, FallbackOrchestrator, Resolution, SourceAttempt, StationReport,
    compose_records, validate_station,
};
pub use response::{RawEcho, ResponseBody, StationResponse};
