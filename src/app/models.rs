//! Data models for NDBC feed normalization
//!
//! This module contains the core data structures shared by both parsing
//! pipelines: the upstream feed formats, the semantic fields the parsers look
//! for, the partial measurement set they produce, and the normalized record
//! that is the engine's only output.

use crate::constants::{self, aliases};
use crate::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Source Formats
// =============================================================================

/// Upstream feed formats published by NDBC for a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// `{station}.ocean` oceanographic table
    Ocean,
    /// `{station}.spec` spectral wave summary
    Spec,
    /// `{station}.txt` standard meteorological table
    Realtime2,
    /// `{station}.rss` latest observation feed
    Rss,
}

/// Which parser pipeline handles a format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserPipeline {
    ColumnTable,
    KeyValue,
}

impl SourceFormat {
    /// All formats in default priority order
    pub const ALL: [SourceFormat; 4] = [
        SourceFormat::Ocean,
        SourceFormat::Spec,
        SourceFormat::Realtime2,
        SourceFormat::Rss,
    ];

    /// File extension used in the upstream URL
    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::Ocean => "ocean",
            SourceFormat::Spec => "spec",
            SourceFormat::Realtime2 => "txt",
            SourceFormat::Rss => "rss",
        }
    }

    /// Short tag used in configuration, logs and responses
    pub fn tag(self) -> &'static str {
        match self {
            SourceFormat::Ocean => "ocean",
            SourceFormat::Spec => "spec",
            SourceFormat::Realtime2 => "realtime2",
            SourceFormat::Rss => "rss",
        }
    }

    /// Parser pipeline that understands this format
    pub fn pipeline(self) -> ParserPipeline {
        match self {
            SourceFormat::Ocean | SourceFormat::Realtime2 => ParserPipeline::ColumnTable,
            SourceFormat::Spec | SourceFormat::Rss => ParserPipeline::KeyValue,
        }
    }

    /// Semantic fields a tabular layout of this format is searched for
    ///
    /// Spectral summaries never carry water temperature, so only wave height
    /// is targeted there; searching for SST would let the range heuristic pick
    /// up swell columns.
    pub fn target_fields(self) -> &'static [SemanticField] {
        match self {
            SourceFormat::Ocean => &[SemanticField::Sst, SemanticField::WaveHeight],
            SourceFormat::Spec => &[SemanticField::WaveHeight],
            SourceFormat::Realtime2 | SourceFormat::Rss => &SemanticField::ALL,
        }
    }
}

impl FromStr for SourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ocean" => Ok(SourceFormat::Ocean),
            "spec" => Ok(SourceFormat::Spec),
            "realtime2" | "txt" => Ok(SourceFormat::Realtime2),
            "rss" => Ok(SourceFormat::Rss),
            other => Err(Error::unknown_format(other)),
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Raw upstream text paired with the format it was fetched as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub format: SourceFormat,
    pub body: String,
}

impl RawDocument {
    pub fn new(format: SourceFormat, body: impl Into<String>) -> Self {
        Self {
            format,
            body: body.into(),
        }
    }

    /// True when the document has no visible content
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

// =============================================================================
// Semantic Fields
// =============================================================================

/// Canonical quantities the parsers try to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticField {
    /// Sea-surface (water) temperature, Celsius
    Sst,
    /// Significant wave height, meters
    WaveHeight,
    /// Wind speed, meters per second in tables
    WindSpeed,
    /// Wind bearing, degrees true
    WindDir,
    /// Air temperature, Celsius
    AirTemp,
}

impl SemanticField {
    /// All fields; primary fields first, SST before wave height
    pub const ALL: [SemanticField; 5] = [
        SemanticField::Sst,
        SemanticField::WaveHeight,
        SemanticField::WindSpeed,
        SemanticField::WindDir,
        SemanticField::AirTemp,
    ];

    /// Header aliases in order of preference
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            SemanticField::Sst => aliases::SST,
            SemanticField::WaveHeight => aliases::WAVE_HEIGHT,
            SemanticField::WindSpeed => aliases::WIND_SPEED,
            SemanticField::WindDir => aliases::WIND_DIR,
            SemanticField::AirTemp => aliases::AIR_TEMP,
        }
    }

    /// Plausible value range used when the column is only guessed
    pub fn plausible_range(self) -> Option<ValueRange> {
        match self {
            SemanticField::Sst => Some(ValueRange::exclusive(
                constants::SST_RANGE_C.0,
                constants::SST_RANGE_C.1,
            )),
            SemanticField::WaveHeight => Some(ValueRange::half_open(
                constants::WAVE_RANGE_M.0,
                constants::WAVE_RANGE_M.1,
            )),
            _ => None,
        }
    }

    /// Primary fields get a placeholder column when the header lacks them
    pub fn is_primary(self) -> bool {
        matches!(self, SemanticField::Sst | SemanticField::WaveHeight)
    }

    pub fn name(self) -> &'static str {
        match self {
            SemanticField::Sst => "SST",
            SemanticField::WaveHeight => "WAVE_HEIGHT",
            SemanticField::WindSpeed => "WIND_SPEED",
            SemanticField::WindDir => "WIND_DIR",
            SemanticField::AirTemp => "AIR_TEMP",
        }
    }
}

impl std::fmt::Display for SemanticField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Numeric bounds with configurable lower inclusivity; the upper bound is
/// always exclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub min_inclusive: bool,
}

impl ValueRange {
    /// `(min, max)`
    pub fn exclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_inclusive: false,
        }
    }

    /// `[min, max)`
    pub fn half_open(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_inclusive: true,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value >= self.max {
            return false;
        }
        if self.min_inclusive {
            value >= self.min
        } else {
            value > self.min
        }
    }
}

// =============================================================================
// Partial Measurements
// =============================================================================

/// Unit a wind speed was reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    MetersPerSecond,
    Knots,
    MilesPerHour,
}

impl SpeedUnit {
    /// Parse a unit token as written in NDBC text
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "m/s" | "mps" | "ms" => Some(SpeedUnit::MetersPerSecond),
            "kt" | "kts" | "kn" | "knot" | "knots" => Some(SpeedUnit::Knots),
            "mph" => Some(SpeedUnit::MilesPerHour),
            _ => None,
        }
    }
}

/// A wind speed in the unit it was reported in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSpeed {
    pub value: f64,
    pub unit: SpeedUnit,
}

/// Raw numeric quantities resolved from one document, before unit normalization
///
/// Temperatures are Celsius, wave height is meters and bearings are degrees;
/// wind speed keeps its source unit so every derived speed comes from one
/// conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    pub water_c: Option<f64>,
    pub wave_m: Option<f64>,
    pub air_c: Option<f64>,
    pub wind_speed: Option<WindSpeed>,
    pub wind_dir_deg: Option<f64>,
}

impl Measurements {
    /// Value of a field in its canonical table unit
    pub fn get(&self, field: SemanticField) -> Option<f64> {
        match field {
            SemanticField::Sst => self.water_c,
            SemanticField::WaveHeight => self.wave_m,
            SemanticField::AirTemp => self.air_c,
            SemanticField::WindDir => self.wind_dir_deg,
            SemanticField::WindSpeed => self.wind_speed.map(|w| w.value),
        }
    }

    /// Store a tabular value for a field; table wind speeds are m/s
    pub fn set(&mut self, field: SemanticField, value: f64) {
        match field {
            SemanticField::Sst => self.water_c = Some(value),
            SemanticField::WaveHeight => self.wave_m = Some(value),
            SemanticField::AirTemp => self.air_c = Some(value),
            SemanticField::WindDir => self.wind_dir_deg = Some(value),
            SemanticField::WindSpeed => {
                self.wind_speed = Some(WindSpeed {
                    value,
                    unit: SpeedUnit::MetersPerSecond,
                })
            }
        }
    }

    pub fn has(&self, field: SemanticField) -> bool {
        self.get(field).is_some()
    }

    /// True when SST or wave height was resolved
    pub fn has_primary(&self) -> bool {
        self.water_c.is_some() || self.wave_m.is_some()
    }

    /// True when nothing at all was resolved
    pub fn is_empty(&self) -> bool {
        SemanticField::ALL.iter().all(|field| !self.has(*field))
    }

    /// Fill fields that are still absent from another measurement set
    pub fn fill_missing_from(&mut self, other: &Measurements) {
        self.water_c = self.water_c.or(other.water_c);
        self.wave_m = self.wave_m.or(other.wave_m);
        self.air_c = self.air_c.or(other.air_c);
        self.wind_speed = self.wind_speed.or(other.wind_speed);
        self.wind_dir_deg = self.wind_dir_deg.or(other.wind_dir_deg);
    }
}

// =============================================================================
// Normalized Output
// =============================================================================

/// The engine's sole output type
///
/// Every measurement is optional and omitted from JSON when unresolved; a
/// missing value is never written as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Sea-surface temperature, Celsius
    #[serde(rename = "sstC", default, skip_serializing_if = "Option::is_none")]
    pub sst_c: Option<f64>,

    /// Significant wave height, meters
    #[serde(rename = "waveM", default, skip_serializing_if = "Option::is_none")]
    pub wave_m: Option<f64>,

    /// Observation time, epoch milliseconds (UTC)
    pub ts: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_c: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_f: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_c: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_f: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_ft: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_mps: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_mph: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_kts: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_dir_deg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_dir_compass: Option<String>,
}

impl NormalizedRecord {
    /// Observation time as a UTC datetime
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.ts).single()
    }

    /// True when SST or wave height is present
    pub fn has_primary(&self) -> bool {
        self.sst_c.is_some() || self.wave_m.is_some()
    }

    /// Copy each absent quantity from another record
    ///
    /// Quantities move as a unit with their derived fields (e.g. `wave_m`
    /// with `wave_ft`) so one record never mixes two sources' conversions.
    pub fn fill_missing_from(&mut self, other: &NormalizedRecord) {
        if self.sst_c.is_none() && other.sst_c.is_some() {
            self.sst_c = other.sst_c;
            self.water_c = other.water_c;
            self.water_f = other.water_f;
        }
        if self.wave_m.is_none() && other.wave_m.is_some() {
            self.wave_m = other.wave_m;
            self.wave_ft = other.wave_ft;
        }
        if self.air_c.is_none() && other.air_c.is_some() {
            self.air_c = other.air_c;
            self.air_f = other.air_f;
        }
        if self.wind_mps.is_none() && other.wind_mps.is_some() {
            self.wind_mps = other.wind_mps;
            self.wind_mph = other.wind_mph;
            self.wind_kts = other.wind_kts;
        }
        if self.wind_dir_deg.is_none() && other.wind_dir_deg.is_some() {
            self.wind_dir_deg = other.wind_dir_deg;
            self.wind_dir_compass = other.wind_dir_compass.clone();
        }
    }
}
