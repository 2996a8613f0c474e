//! Header row detection for whitespace-delimited NDBC tables
//!
//! Realtime2 tables usually open with one or two `#`-prefixed header lines
//! (column names, then units). Some mirrors drop the comment marker and some
//! documents have no header at all, so the header is simply the first early
//! line that contains a letter.

use crate::constants::{COMMENT_MARKER, HEADER_SCAN_LINES, is_date_column};

/// Column names of a table, uppercased, comment marker stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    /// Uppercased column tokens in source order
    pub tokens: Vec<String>,

    /// Index of the header line among the non-blank lines
    pub line_index: usize,
}

impl HeaderRow {
    /// Find the header among the first lines of a table
    ///
    /// Returns `None` when none of the first lines contains a letter.
    pub fn detect(lines: &[&str]) -> Option<Self> {
        lines
            .iter()
            .take(HEADER_SCAN_LINES)
            .enumerate()
            .find(|(_, line)| line.chars().any(|c| c.is_ascii_alphabetic()))
            .map(|(line_index, line)| Self::from_line(line, line_index))
    }

    /// Build a header from one line, stripping any leading comment markers
    pub fn from_line(line: &str, line_index: usize) -> Self {
        let stripped = line.trim().trim_start_matches(COMMENT_MARKER).trim_start();
        let tokens = stripped
            .split_whitespace()
            .map(|token| token.to_ascii_uppercase())
            .collect();

        Self { tokens, line_index }
    }

    /// Position of the first token equal to `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tokens.iter().position(|token| token == name)
    }

    /// Number of contiguous date/time columns at the start of the header
    pub fn date_column_count(&self) -> usize {
        self.tokens
            .iter()
            .take_while(|token| is_date_column(token))
            .count()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
