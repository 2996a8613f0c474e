//! Test utilities for column-table parser testing
//!
//! This module provides sample tables in the layouts NDBC publishes and a
//! fixed clock shared by the test modules.

use chrono::{DateTime, TimeZone, Utc};

use crate::app::services::clock::FixedClock;


/// Instant the fixed test clock is frozen at
pub fn fallback_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
}

/// Helper to create the clock used across parser tests
pub fn test_clock() -> FixedClock {
    FixedClock::new(fallback_instant())
}

/// Standard meteorological (`.txt`) table with two data rows, newest last
pub fn create_realtime2_table() -> String {
    r#"#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
2024 06 15 11 50 210  6.8  8.5   1.1     8   5.9 155 1015.4  19.8  18.3  14.9   MM   MM    MM
2024 06 15 12 00 220  7.2  9.0   1.2     8   6.1 160 1015.2  20.1  18.5  15.0   MM   MM    MM"#
        .to_string()
}

/// Spectral wave summary (`.spec`) table
pub fn create_spec_table() -> String {
    r#"#YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD
#yr  mo dy hr mn    m    m  sec    m  sec  -  degT     -      sec degT
2024 06 15 11 40  1.1  0.8  8.3  0.7  4.0 SSE  SE    AVERAGE  6.0 155
2024 06 15 12 10  1.3  0.9  8.3  0.7  4.0 SSE  SE    AVERAGE  6.1 160"#
        .to_string()
}
