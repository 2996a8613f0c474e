//! Parsing statistics and result structures for table parsing
//!
//! This module provides types for tracking how a table was read and for
//! returning the parsed record together with those statistics.

use crate::app::models::NormalizedRecord;
use serde::Serialize;

/// Parsing result with the record (if any) and basic statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Normalized record, absent when no primary field resolved
    pub record: Option<NormalizedRecord>,

    /// Basic parsing statistics
    pub stats: ParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Whether a header row was detected
    pub header_found: bool,

    /// Candidate data rows in the document
    pub data_rows: usize,

    /// Rows visited before all fields resolved
    pub rows_scanned: usize,

    /// `MM` tokens encountered in target columns
    pub missing_tokens: usize,

    /// Non-numeric tokens encountered in target columns
    pub invalid_tokens: usize,

    /// Values assigned through range disambiguation
    pub heuristic_claims: usize,

    /// Fields resolved
    pub fields_resolved: usize,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of data rows that had to be visited, as a percentage
    pub fn scan_depth(&self) -> f64 {
        if self.data_rows == 0 {
            0.0
        } else {
            (self.rows_scanned as f64 / self.data_rows as f64) * 100.0
        }
    }
}
