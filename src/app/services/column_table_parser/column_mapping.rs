//! Column resolution for semantic fields
//!
//! Each target field is looked up in the header by its aliases (first alias
//! in preference order wins). Primary fields without a header match fall back
//! to a placeholder index at the end of the leading date columns; secondary
//! fields are only read when the header names them.

use super::header::HeaderRow;
use crate::app::models::SemanticField;
use std::collections::HashSet;

/// How a field's column index was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// Matched a header alias
    Header { alias: &'static str },
    /// Placeholder: first column after the date prefix
    Default,
}

/// The column a field will be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnResolution {
    pub field: SemanticField,
    pub index: usize,
    pub source: IndexSource,
}

impl ColumnResolution {
    pub fn is_from_header(&self) -> bool {
        matches!(self.source, IndexSource::Header { .. })
    }
}

/// Column mapping for one table, in field priority order
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// One entry per resolvable target field
    pub resolutions: Vec<ColumnResolution>,

    /// Leading date columns named by the header (0 when header-less)
    pub date_columns: usize,
}

impl ColumnMapping {
    /// Resolve target fields against an optional header
    pub fn resolve(header: Option<&HeaderRow>, targets: &[SemanticField]) -> Self {
        let date_columns = header.map(HeaderRow::date_column_count).unwrap_or(0);
        let mut resolutions = Vec::new();

        // keep SST ahead of wave height regardless of the caller's order
        let mut ordered: Vec<SemanticField> = targets.to_vec();
        ordered.sort();
        ordered.dedup();

        for field in ordered {
            let header_match = header.and_then(|h| {
                field
                    .aliases()
                    .iter()
                    .find_map(|alias| h.position(alias).map(|index| (*alias, index)))
            });

            match header_match {
                Some((alias, index)) => resolutions.push(ColumnResolution {
                    field,
                    index,
                    source: IndexSource::Header { alias },
                }),
                None if field.is_primary() => resolutions.push(ColumnResolution {
                    field,
                    index: date_columns,
                    source: IndexSource::Default,
                }),
                None => {}
            }
        }

        Self {
            resolutions,
            date_columns,
        }
    }

    /// Resolution for a field, if it is targeted at all
    pub fn get(&self, field: SemanticField) -> Option<&ColumnResolution> {
        self.resolutions.iter().find(|r| r.field == field)
    }

    /// Get the column index for a field
    pub fn get_index(&self, field: SemanticField) -> Option<usize> {
        self.get(field).map(|r| r.index)
    }

    /// Fields this mapping will try to resolve
    pub fn fields(&self) -> impl Iterator<Item = SemanticField> + '_ {
        self.resolutions.iter().map(|r| r.field)
    }

    /// A placeholder index that collides with another field's column cannot
    /// be trusted and must go through range disambiguation
    pub fn is_ambiguous(&self, field: SemanticField) -> bool {
        let Some(resolution) = self.get(field) else {
            return false;
        };
        if resolution.is_from_header() {
            return false;
        }
        self.resolutions
            .iter()
            .any(|other| other.field != field && other.index == resolution.index)
    }

    /// Columns named by the header for some field; never offered to another
    pub fn header_owned_columns(&self) -> HashSet<usize> {
        self.resolutions
            .iter()
            .filter(|r| r.is_from_header())
            .map(|r| r.index)
            .collect()
    }

    /// Get statistics about the mapping: (fields, from header, placeholders)
    pub fn stats(&self) -> (usize, usize, usize) {
        let from_header = self
            .resolutions
            .iter()
            .filter(|r| r.is_from_header())
            .count();
        (
            self.resolutions.len(),
            from_header,
            self.resolutions.len() - from_header,
        )
    }
}
