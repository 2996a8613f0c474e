//! Column-table parser for NDBC realtime2 feeds
//!
//! This module reads whitespace-delimited tables (`.ocean`, `.spec`, `.txt`)
//! whose column set and ordering vary between stations and over time. Columns
//! are found by header alias; when a primary field has no named column it is
//! resolved by plausible-range disambiguation over the row's tokens.
//!
//! ## Architecture
//!
//! - [`parser`] - Line splitting, row scanning and record assembly
//! - [`header`] - Header row detection
//! - [`column_mapping`] - Alias resolution and placeholder indices
//! - [`field_parsers`] - Token parsing, row timestamps and range claims
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use ndbc_normalizer::{ColumnTableParser, FixedClock, SourceFormat};
//! use chrono::{TimeZone, Utc};
//!
//! let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
//! let parser = ColumnTableParser::new(&clock);
//!
//! let table = "#YY MM DD hh mm WDIR WSPD WVHT ATMP WTMP\n\
//!              24 06 15 12 00 220 7.2 1.2 20.1 18.5\n";
//! let result = parser.parse_detailed(table, SourceFormat::Realtime2);
//!
//! let record = result.record.unwrap();
//! assert_eq!(record.wave_m, Some(1.2));
//! assert_eq!(record.wind_dir_compass.as_deref(), Some("SW"));
//! assert_eq!(result.stats.fields_resolved, 5);
//! ```

pub mod column_mapping;
pub mod field_parsers;
pub mod header;
pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::ColumnMapping;
pub use header::HeaderRow;
pub use parser::{ColumnTableParser, TableExtraction, extract_measurements};
pub use stats::{ParseResult, ParseStats};

use crate::app::models::{NormalizedRecord, SourceFormat};
use crate::app::services::clock::SystemClock;

/// Parse a table using the system clock for timestamp fallback
pub fn parse_column_table(raw: &str, format: SourceFormat) -> Option<NormalizedRecord> {
    ColumnTableParser::new(&SystemClock).parse(raw, format)
}
