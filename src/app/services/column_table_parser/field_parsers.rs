//! Token-level parsing for table rows
//!
//! This module turns individual row tokens into values, assembles row
//! timestamps from the leading date columns, and implements the range-based
//! disambiguation used when a column could not be identified by name.

use crate::app::models::{SemanticField, ValueRange};
use crate::constants::{MISSING_VALUE, TIMESTAMP_MIN_TOKENS, TWO_DIGIT_YEAR_BASE};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use tracing::trace;

/// Outcome of reading one token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenValue {
    /// The `MM` sentinel
    Missing,
    /// Not a finite number
    Invalid,
    Value(f64),
}

/// Parse a single row token
pub fn parse_token(token: &str) -> TokenValue {
    let trimmed = token.trim();
    if trimmed.is_empty() || trimmed == MISSING_VALUE {
        return TokenValue::Missing;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => TokenValue::Value(value),
        _ => {
            trace!("Rejected non-numeric token '{}'", trimmed);
            TokenValue::Invalid
        }
    }
}

/// Compose a UTC timestamp from the first five tokens of a row
///
/// Tokens are year, month, day, hour, minute; two-digit years land in the
/// 2000s. Returns `None` for short rows or any unparsable component.
pub fn row_timestamp(tokens: &[&str]) -> Option<DateTime<Utc>> {
    if tokens.len() < TIMESTAMP_MIN_TOKENS {
        return None;
    }

    let mut year: i32 = tokens[0].parse().ok()?;
    if (0..100).contains(&year) {
        year += TWO_DIGIT_YEAR_BASE;
    }
    let month: u32 = tokens[1].parse().ok()?;
    let day: u32 = tokens[2].parse().ok()?;
    let hour: u32 = tokens[3].parse().ok()?;
    let minute: u32 = tokens[4].parse().ok()?;

    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
}

/// Width of a row's leading date prefix
///
/// With a header this is the header's date column count. Without one, a row
/// whose first five tokens form a valid date is taken to start with them.
pub fn row_date_width(header_date_columns: Option<usize>, tokens: &[&str]) -> usize {
    match header_date_columns {
        Some(count) => count,
        None if row_timestamp(tokens).is_some() => TIMESTAMP_MIN_TOKENS,
        None => 0,
    }
}

// =============================================================================
// Range Disambiguation
// =============================================================================

/// Assign values to a field when they fall inside its plausible range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRule {
    pub field: SemanticField,
    pub range: ValueRange,
}

/// Ordered candidate rules; earlier rules win ties (SST before wave height)
pub fn disambiguation_rules() -> Vec<RangeRule> {
    [SemanticField::Sst, SemanticField::WaveHeight]
        .into_iter()
        .filter_map(|field| {
            field
                .plausible_range()
                .map(|range| RangeRule { field, range })
        })
        .collect()
}

/// A value claimed for a field during disambiguation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeClaim {
    pub field: SemanticField,
    pub index: usize,
    pub value: f64,
}

/// Offer every unclaimed non-date token of a row to the rule list
///
/// Tokens are visited left to right; each numeric token goes to the first
/// rule whose field is still pending and whose range contains it. Claimed
/// indices are recorded in `claimed` so later lookups skip them.
pub fn claim_by_range(
    tokens: &[&str],
    date_width: usize,
    pending: &[SemanticField],
    claimed: &mut HashSet<usize>,
) -> Vec<RangeClaim> {
    let rules: Vec<RangeRule> = disambiguation_rules()
        .into_iter()
        .filter(|rule| pending.contains(&rule.field))
        .collect();
    let mut open: Vec<SemanticField> = rules.iter().map(|rule| rule.field).collect();
    let mut claims = Vec::new();

    for (index, token) in tokens.iter().enumerate().skip(date_width) {
        if open.is_empty() {
            break;
        }
        if claimed.contains(&index) {
            continue;
        }
        let TokenValue::Value(value) = parse_token(token) else {
            continue;
        };

        let matching = rules
            .iter()
            .find(|rule| open.contains(&rule.field) && rule.range.contains(value));

        if let Some(rule) = matching {
            claimed.insert(index);
            open.retain(|field| *field != rule.field);
            claims.push(RangeClaim {
                field: rule.field,
                index,
                value,
            });
        }
    }

    claims
}
