//! NDBC Normalizer Library
//!
//! A Rust library for turning NOAA National Data Buoy Center (NDBC) realtime
//! feeds into a single, stable observation record.
//!
//! This library provides tools for:
//! - Parsing whitespace-delimited realtime2 tables (`.ocean`, `.spec`, `.txt`)
//!   with header alias resolution and range-based column disambiguation
//! - Extracting labeled quantities from `.spec` text and RSS/HTML descriptions
//! - Normalizing units (Celsius/Fahrenheit, meters/feet, m/s/knots/mph) and
//!   deriving 16-point compass directions
//! - Fetching station feeds in priority order with fallback on missing data
//!
//! The two parsing entry points are pure functions over an in-memory buffer:
//!
//! ```rust
//! use ndbc_normalizer::{SourceFormat, parse_column_table, parse_key_value};
//!
//! let table = "#YY MM DD hh mm WVHT WTMP\n24 06 15 12 00 1.2 18.5\n";
//! let record = parse_column_table(table, SourceFormat::Realtime2).unwrap();
//! assert_eq!(record.sst_c, Some(18.5));
//!
//! let text = "Water Temperature: 61 F";
//! let record = parse_key_value(text).unwrap();
//! assert_eq!(record.water_c, Some(16.1));
//! ```

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod clock;
        pub mod column_table_parser;
        pub mod fallback_orchestrator;
        pub mod key_value_parser;
        pub mod units;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Measurements, NormalizedRecord, RawDocument, SemanticField, SourceFormat};
pub use app::services::clock::{Clock, FixedClock, SystemClock};
pub use app::services::column_table_parser::{ColumnTableParser, parse_column_table};
pub use app::services::key_value_parser::{KeyValueParser, parse_key_value};
pub use config::Config;

/// Result type alias for the NDBC normalizer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for fetching and normalizing NDBC feeds
///
/// Parsers never return these: a document without usable data is reported as
/// `None`. Errors only describe transport, configuration and caller problems.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Station identifier rejected before any fetch
    #[error("Invalid station identifier '{station}': {reason}")]
    InvalidStation { station: String, reason: String },

    /// Upstream request failed (network error, timeout, non-success status)
    #[error("Transport error fetching {url}: {message}")]
    Transport { url: String, message: String },

    /// Every source answered but none contained usable data
    #[error("No usable data for station {station} (tried {attempted} sources)")]
    NoUsableData { station: String, attempted: usize },

    /// Every source failed at the transport level
    #[error("All sources failed for station {station} (tried {attempted} sources)")]
    AllSourcesFailed { station: String, attempted: usize },

    /// Unknown feed format tag
    #[error("Unknown source format: {tag}")]
    UnknownFormat { tag: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid station error
    pub fn invalid_station(station: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStation {
            station: station.into(),
            reason: reason.into(),
        }
    }

    /// Create a transport error for a given upstream URL
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a "no usable data" exhaustion error
    pub fn no_usable_data(station: impl Into<String>, attempted: usize) -> Self {
        Self::NoUsableData {
            station: station.into(),
            attempted,
        }
    }

    /// Create an "all sources failed" exhaustion error
    pub fn all_sources_failed(station: impl Into<String>, attempted: usize) -> Self {
        Self::AllSourcesFailed {
            station: station.into(),
            attempted,
        }
    }

    /// Create an unknown format error
    pub fn unknown_format(tag: impl Into<String>) -> Self {
        Self::UnknownFormat { tag: tag.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// True when the error means every source was tried without success
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::NoUsableData { .. } | Self::AllSourcesFailed { .. }
        )
    }

    /// HTTP status a transport shell should answer with for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidStation { .. } | Self::UnknownFormat { .. } => 400,
            Self::NoUsableData { .. } | Self::AllSourcesFailed { .. } => 502,
            _ => 500,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid configuration file: {}", error),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        let url = error
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else {
            error.to_string()
        };
        Self::Transport { url, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(Error::invalid_station("", "empty").http_status(), 400);
        assert_eq!(Error::no_usable_data("44013", 4).http_status(), 502);
        assert_eq!(Error::all_sources_failed("44013", 4).http_status(), 502);
        assert_eq!(Error::configuration("bad").http_status(), 500);
    }

    #[test]
    fn test_exhaustion_variants_are_distinct() {
        let no_data = Error::no_usable_data("44013", 2);
        let failed = Error::all_sources_failed("44013", 2);

        assert!(no_data.is_exhaustion());
        assert!(failed.is_exhaustion());
        assert_ne!(no_data.to_string(), failed.to_string());
        assert!(!Error::transport("http://x", "boom").is_exhaustion());
    }
}
