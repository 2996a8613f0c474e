//! Core table parser implementation
//!
//! This module handles line splitting, header/data separation, the
//! newest-to-oldest row scan and the final record assembly.

use std::collections::HashSet;
use tracing::{debug, trace};

use super::column_mapping::{ColumnMapping, IndexSource};
use super::field_parsers::{TokenValue, claim_by_range, parse_token, row_date_width, row_timestamp};
use super::header::HeaderRow;
use super::stats::{ParseResult, ParseStats};
use crate::app::models::{Measurements, NormalizedRecord, SemanticField, SourceFormat};
use crate::app::services::clock::Clock;
use crate::app::services::units::normalize;
use crate::constants::COMMENT_MARKER;
use chrono::{DateTime, Utc};

/// Measurements pulled from a table before normalization
#[derive(Debug, Clone, Default)]
pub struct TableExtraction {
    pub measurements: Measurements,

    /// Time of the newest contributing row with a valid date
    pub timestamp: Option<DateTime<Utc>>,

    pub stats: ParseStats,
}

/// Parser for whitespace-delimited NDBC tables (`.ocean`, `.spec`, `.txt`)
///
/// Holds nothing but the clock used when no row carries a usable date, so a
/// single parser can be shared freely.
pub struct ColumnTableParser<'a> {
    clock: &'a dyn Clock,
}

impl<'a> ColumnTableParser<'a> {
    /// Create a new parser with an injected clock
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock }
    }

    /// Parse a table into a normalized record, or `None` when neither SST nor
    /// wave height resolved
    pub fn parse(&self, raw: &str, format: SourceFormat) -> Option<NormalizedRecord> {
        self.parse_detailed(raw, format).record
    }

    /// Parse a table and return statistics alongside the record
    pub fn parse_detailed(&self, raw: &str, format: SourceFormat) -> ParseResult {
        let extraction = extract_measurements(raw, format);

        // wind or air alone is not a usable observation
        let record = if extraction.measurements.has_primary() {
            let timestamp = extraction.timestamp.unwrap_or_else(|| self.clock.now());
            Some(normalize(&extraction.measurements, timestamp))
        } else {
            None
        };

        debug!(
            "Parsed {} table: {} of {} rows scanned, {} fields resolved, record {}",
            format,
            extraction.stats.rows_scanned,
            extraction.stats.data_rows,
            extraction.stats.fields_resolved,
            if record.is_some() { "emitted" } else { "absent" }
        );

        ParseResult {
            record,
            stats: extraction.stats,
        }
    }
}

/// Split a document into its header (if any) and candidate data rows
///
/// Blank lines are dropped and carriage returns stripped. Data rows are the
/// non-comment lines containing a digit, oldest first.
pub fn split_sections(raw: &str) -> (Option<HeaderRow>, Vec<&str>) {
    let lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();

    let header = HeaderRow::detect(&lines);
    let header_line = header.as_ref().map(|h| h.line_index);

    let data_rows = lines
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != header_line)
        .map(|(_, line)| line.trim())
        .filter(|line| !line.starts_with(COMMENT_MARKER))
        .filter(|line| line.chars().any(|c| c.is_ascii_digit()))
        .collect();

    (header, data_rows)
}

/// Read target fields from the newest rows of a table
pub fn extract_measurements(raw: &str, format: SourceFormat) -> TableExtraction {
    let mut extraction = TableExtraction::default();
    let (header, rows) = split_sections(raw);

    extraction.stats.header_found = header.is_some();
    extraction.stats.data_rows = rows.len();
    if rows.is_empty() {
        return extraction;
    }

    let mapping = ColumnMapping::resolve(header.as_ref(), format.target_fields());
    let (total, from_header, placeholders) = mapping.stats();
    debug!(
        "Column mapping: {} fields, {} from header, {} placeholders at index {}",
        total, from_header, placeholders, mapping.date_columns
    );

    let header_date_columns = header.as_ref().map(|_| mapping.date_columns);
    let header_owned = mapping.header_owned_columns();
    let measurements = &mut extraction.measurements;

    for row in rows.iter().rev() {
        if mapping.fields().all(|field| measurements.has(field)) {
            break;
        }
        extraction.stats.rows_scanned += 1;

        let tokens: Vec<&str> = row.split_whitespace().collect();
        let date_width = row_date_width(header_date_columns, &tokens);
        let mut claimed: HashSet<usize> = header_owned.clone();
        let mut pending_scan: Vec<SemanticField> = Vec::new();
        let mut contributed = false;

        for resolution in &mapping.resolutions {
            let field = resolution.field;
            if measurements.has(field) {
                continue;
            }

            match resolution.source {
                IndexSource::Header { alias } => match tokens.get(resolution.index).map(|t| parse_token(t)) {
                    Some(TokenValue::Value(value)) => {
                        trace!("{} = {} from column {}", field, value, alias);
                        measurements.set(field, value);
                        contributed = true;
                    }
                    Some(TokenValue::Missing) => extraction.stats.missing_tokens += 1,
                    Some(TokenValue::Invalid) => extraction.stats.invalid_tokens += 1,
                    None => trace!("Row too short for column {}", alias),
                },
                IndexSource::Default => {
                    if mapping.is_ambiguous(field) || resolution.index < date_width {
                        pending_scan.push(field);
                        continue;
                    }

                    let token = tokens.get(resolution.index).map(|t| parse_token(t));
                    let in_range = |value: f64| {
                        field
                            .plausible_range()
                            .is_some_and(|range| range.contains(value))
                    };

                    match token {
                        Some(TokenValue::Value(value))
                            if in_range(value) && !claimed.contains(&resolution.index) =>
                        {
                            trace!("{} = {} from placeholder column {}", field, value, resolution.index);
                            claimed.insert(resolution.index);
                            measurements.set(field, value);
                            contributed = true;
                        }
                        Some(TokenValue::Missing) => {
                            extraction.stats.missing_tokens += 1;
                            pending_scan.push(field);
                        }
                        Some(TokenValue::Invalid) => {
                            extraction.stats.invalid_tokens += 1;
                            pending_scan.push(field);
                        }
                        _ => pending_scan.push(field),
                    }
                }
            }
        }

        if !pending_scan.is_empty() {
            for claim in claim_by_range(&tokens, date_width, &pending_scan, &mut claimed) {
                trace!(
                    "{} = {} claimed by range from column {}",
                    claim.field, claim.value, claim.index
                );
                measurements.set(claim.field, claim.value);
                extraction.stats.heuristic_claims += 1;
                contributed = true;
            }
        }

        if contributed && extraction.timestamp.is_none() {
            extraction.timestamp = row_timestamp(&tokens);
        }
    }

    extraction.stats.fields_resolved = mapping.fields().filter(|f| measurements.has(*f)).count();
    extraction
}
