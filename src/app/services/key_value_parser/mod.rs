//! Key-value and free-text parser
//!
//! This module reads labeled quantities ("Water Temperature: 61 F",
//! "Wind: SW (220°) 9.9 knots") out of `.spec` summaries and RSS/HTML
//! observation descriptions, converting units as it goes. Fields that no
//! label provides are filled from a column-table pass over the same
//! (markup-stripped) text.
//!
//! - [`markup`] - Description extraction, entity decoding, tag stripping
//! - [`patterns`] - Case-insensitive labeled-quantity patterns
//! - [`parser`] - Extraction, tabular fill-in and record assembly

pub mod markup;
pub mod parser;
pub mod patterns;

#[cfg(test)]
pub mod tests;

pub use parser::{KeyValueParser, KeyValueResult, KeyValueStats, TimestampSource};

use crate::app::models::NormalizedRecord;
use crate::app::services::clock::SystemClock;

/// Parse labeled text using the system clock for timestamp fallback
pub fn parse_key_value(raw: &str) -> Option<NormalizedRecord> {
    KeyValueParser::new(&SystemClock).parse(raw)
}
