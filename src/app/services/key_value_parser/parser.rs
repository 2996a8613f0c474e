//! Labeled-quantity extraction with a tabular fallback pass

use serde::Serialize;
use tracing::{debug, trace};

use super::markup::{has_markup, pub_date, strip_markup};
use super::patterns;
use crate::app::models::{Measurements, NormalizedRecord, SemanticField, SourceFormat};
use crate::app::services::clock::Clock;
use crate::app::services::column_table_parser::{ParseStats, extract_measurements};
use crate::app::services::units::normalize;

/// Where a key-value record's timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// `date:` label in the text
    Label,
    /// RSS `<pubDate>`
    PubDate,
    /// Leading date columns of a table row
    TableRow,
    /// Nothing usable; the clock was read
    #[default]
    Clock,
}

/// Statistics describing how a key-value document was read
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyValueStats {
    /// Markup was found and stripped
    pub markup_stripped: bool,

    /// Fields resolved from labeled text
    pub labeled_fields: Vec<SemanticField>,

    /// Fields filled in by the tabular pass
    pub tabular_fields: Vec<SemanticField>,

    /// Statistics of the tabular pass, when it ran
    pub tabular: Option<ParseStats>,

    pub timestamp_source: TimestampSource,
}

/// Key-value parsing result with the record (if any) and statistics
#[derive(Debug, Clone)]
pub struct KeyValueResult {
    pub record: Option<NormalizedRecord>,
    pub stats: KeyValueStats,
}

/// Parser for labeled text: `.spec` summaries, RSS and HTML descriptions
pub struct KeyValueParser<'a> {
    clock: &'a dyn Clock,
    tabular_hint: SourceFormat,
}

impl<'a> KeyValueParser<'a> {
    /// Create a new parser with an injected clock
    ///
    /// The tabular pass defaults to spectral-summary layout.
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self {
            clock,
            tabular_hint: SourceFormat::Spec,
        }
    }

    /// Set the table layout assumed by the tabular pass
    pub fn with_tabular_hint(mut self, hint: SourceFormat) -> Self {
        self.tabular_hint = hint;
        self
    }

    /// Parse labeled text into a normalized record, or `None` when nothing resolved
    pub fn parse(&self, raw: &str) -> Option<NormalizedRecord> {
        self.parse_detailed(raw).record
    }

    /// Parse labeled text and return statistics alongside the record
    pub fn parse_detailed(&self, raw: &str) -> KeyValueResult {
        let mut stats = KeyValueStats::default();
        if raw.trim().is_empty() {
            return KeyValueResult {
                record: None,
                stats,
            };
        }

        stats.markup_stripped = has_markup(raw);
        let text = if stats.markup_stripped {
            strip_markup(raw)
        } else {
            raw.to_string()
        };

        let mut measurements = extract_labeled(&text);
        stats.labeled_fields = resolved_fields(&measurements);

        let mut timestamp = patterns::explicit_date(&text).map(|ts| (ts, TimestampSource::Label));
        if timestamp.is_none() {
            timestamp = pub_date(raw).map(|ts| (ts, TimestampSource::PubDate));
        }

        // the range rules of the table pass guard header-less text
        let incomplete = SemanticField::ALL.iter().any(|f| !measurements.has(*f));
        if incomplete {
            let table = extract_measurements(&text, self.tabular_hint);
            measurements.fill_missing_from(&table.measurements);

            stats.tabular_fields = resolved_fields(&measurements)
                .into_iter()
                .filter(|f| !stats.labeled_fields.contains(f))
                .collect();
            if timestamp.is_none() {
                timestamp = table.timestamp.map(|ts| (ts, TimestampSource::TableRow));
            }
            stats.tabular = Some(table.stats);
        }

        let (timestamp, source) = timestamp.unwrap_or_else(|| (self.clock.now(), TimestampSource::Clock));
        stats.timestamp_source = source;

        let record = if measurements.is_empty() {
            None
        } else {
            Some(normalize(&measurements, timestamp))
        };

        debug!(
            "Parsed key-value text: {} labeled, {} tabular, timestamp from {:?}, record {}",
            stats.labeled_fields.len(),
            stats.tabular_fields.len(),
            stats.timestamp_source,
            if record.is_some() { "emitted" } else { "absent" }
        );

        KeyValueResult { record, stats }
    }
}

/// Resolve every labeled quantity in plain text
pub fn extract_labeled(text: &str) -> Measurements {
    let measurements = Measurements {
        water_c: patterns::water_temperature(text),
        wave_m: patterns::wave_height(text),
        air_c: patterns::air_temperature(text),
        wind_speed: patterns::wind_speed(text),
        wind_dir_deg: patterns::wind_direction(text),
    };
    trace!("Labeled extraction: {:?}", measurements);
    measurements
}

fn resolved_fields(measurements: &Measurements) -> Vec<SemanticField> {
    SemanticField::ALL
        .into_iter()
        .filter(|field| measurements.has(*field))
        .collect()
}
