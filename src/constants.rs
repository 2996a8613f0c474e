//! Application constants for the NDBC normalizer
//!
//! This module contains upstream endpoints, header aliases, plausible value
//! ranges, unit conversion factors and default settings used throughout the
//! normalizer.

// =============================================================================
// Upstream Endpoints
// =============================================================================

/// Base URL for realtime2 table feeds (`{station}.ocean`, `.spec`, `.txt`)
pub const DEFAULT_REALTIME2_BASE_URL: &str = "https://www.ndbc.noaa.gov/data/realtime2";

/// Base URL for latest-observation RSS feeds (`{station}.rss`)
pub const DEFAULT_LATEST_OBS_BASE_URL: &str = "https://www.ndbc.noaa.gov/data/latest_obs";

/// User agent sent with every upstream request
pub const DEFAULT_USER_AGENT: &str = concat!("ndbc-normalizer/", env!("CARGO_PKG_VERSION"));

/// Default source priority order
pub const DEFAULT_SOURCE_ORDER: &[&str] = &["ocean", "spec", "realtime2", "rss"];

// =============================================================================
// Transport Defaults
// =============================================================================

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Retries per source after a transport failure
pub const DEFAULT_RETRIES: u32 = 0;

/// Delay before the first retry, doubled on each further attempt
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Upper bound on the configured timeout
pub const MAX_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Table Layout
// =============================================================================

/// NOAA missing-value sentinel
pub const MISSING_VALUE: &str = "MM";

/// Comment marker prefixing header lines
pub const COMMENT_MARKER: char = '#';

/// Number of leading lines searched for a header row
pub const HEADER_SCAN_LINES: usize = 10;

/// Minimum tokens a row needs before its leading date columns are read
pub const TIMESTAMP_MIN_TOKENS: usize = 5;

/// Two-digit years are offset into this century
pub const TWO_DIGIT_YEAR_BASE: i32 = 2000;

/// Header tokens that name a date or time column
pub const DATE_COLUMN_TOKENS: &[&str] = &[
    "#YY", "YYYY", "YY", "YR", "MM", "MO", "DD", "DY", "HH", "HR", "MN", "TIME", "DATE",
];

/// Header aliases per semantic field, in order of preference
pub mod aliases {
    pub const SST: &[&str] = &[
        "WTMP",
        "WTMP_C",
        "SST",
        "OTMP",
        "WATERTEMP",
        "WATER_TEMPERATURE",
    ];

    pub const WAVE_HEIGHT: &[&str] = &[
        "WVHT",
        "HTSGW",
        "SIG_WVHT",
        "SIGNIFICANT_WAVE_HEIGHT",
        "WVHT(M)",
    ];

    pub const WIND_SPEED: &[&str] = &["WSPD", "WIND_SPD", "WIND"];

    pub const WIND_DIR: &[&str] = &["WDIR", "WIND_DIR"];

    pub const AIR_TEMP: &[&str] = &["ATMP", "ATMP(C)", "AIR_TEMPERATURE"];
}

// =============================================================================
// Plausible Value Ranges
// =============================================================================

/// Sea-surface temperature bounds in Celsius (exclusive on both ends)
pub const SST_RANGE_C: (f64, f64) = (-10.0, 40.0);

/// Wave height bounds in meters (inclusive lower, exclusive upper)
pub const WAVE_RANGE_M: (f64, f64) = (0.0, 50.0);

// =============================================================================
// Unit Conversion Factors
// =============================================================================

/// Feet per meter
pub const FEET_PER_METER: f64 = 3.28084;

/// Meters per foot
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Miles per hour per knot
pub const MPH_PER_KNOT: f64 = 1.15078;

/// Miles per hour per meter/second
pub const MPH_PER_MPS: f64 = 2.23694;

/// Knots per meter/second
pub const KNOTS_PER_MPS: f64 = 1.94384;

/// Degrees per compass point
pub const DEGREES_PER_COMPASS_POINT: f64 = 22.5;

/// 16-point compass rose, clockwise from north
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

// =============================================================================
// Configuration
// =============================================================================

/// Directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "ndbc-normalizer";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "NDBC_";

/// Check whether a header token names a date/time column
pub fn is_date_column(token: &str) -> bool {
    let upper = token.to_ascii_uppercase();
    DATE_COLUMN_TOKENS.contains(&upper.as_str())
}
