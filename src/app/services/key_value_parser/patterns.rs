//! Labeled-quantity patterns
//!
//! Each quantity has one or more case-insensitive patterns in priority
//! order. A pattern captures a signed decimal `value` and, where the label
//! usually carries one, an optional `unit`. Within one pattern the last
//! match in the document wins; a later pattern is only consulted when no
//! earlier one matched at all.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app::models::{SpeedUnit, WindSpeed};
use crate::app::services::units::{fahrenheit_to_celsius, feet_to_meters};
use crate::constants::{COMPASS_POINTS, DEGREES_PER_COMPASS_POINT};

// Spaces and tabs only, so a label never binds to a number on the next line
const GAP: &str = r"[^\S\n]*";
const SEPARATOR: &str = r"[^\S\n]*[:=]?[^\S\n]*";
const NUMBER: &str = r"(?P<value>[-+]?\d+(?:\.\d+)?)";
const TEMPERATURE_UNIT: &str = r"(?:°|º|deg(?:rees)?)?[^\S\n]*(?:(?P<unit>F(?:ahrenheit)?|C(?:elsius)?)\b)?";

fn labeled(label: &str, tail: &str) -> Regex {
    let pattern = format!(r"(?i)\b(?:{label})\b{SEPARATOR}{NUMBER}{GAP}{tail}");
    Regex::new(&pattern).unwrap()
}

static WATER_TEMP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![labeled(
        r"water[_\s]?temp(?:erature)?|sea[_\s]surface[_\s]temp(?:erature)?|sea[_\s]temp(?:erature)?|sst",
        TEMPERATURE_UNIT,
    )]
});

static AIR_TEMP_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| vec![labeled(r"air[_\s]?temp(?:erature)?", TEMPERATURE_UNIT)]);

static WAVE_HEIGHT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let unit = r"(?:(?P<unit>meters?|metres?|m|feet|foot|ft)\b)?";
    vec![
        labeled(r"significant[_\s]wave[_\s]height|wave[_\s]?height", unit),
        labeled(r"waves", unit),
        labeled(r"swell[_\s]?height", unit),
    ]
});

static WIND_SPEED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let unit = r"(?:(?P<unit>knots?|kts?|kn|mph|m/s|mps)\b)?";
    vec![
        labeled(r"wind[_\s]?speed|wind[_\s]?spd", unit),
        // RSS form: "Wind: SW (220°) 9.9 knots"
        Regex::new(&format!(
            r"(?i)\bwind\b{SEPARATOR}(?:[NSEW]{{1,3}}\b{GAP})?(?:\([^)\n]*\){GAP})?{NUMBER}{GAP}{unit}"
        ))
        .unwrap(),
    ]
});

static WIND_DIR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(&format!(
            r"(?i)\bwind[_\s]?dir(?:ection)?\b{SEPARATOR}(?:[NSEW]{{1,3}}\b{GAP})?\(?{GAP}{NUMBER}"
        ))
        .unwrap(),
        Regex::new(&format!(
            r"(?i)\bwind\b{SEPARATOR}[NSEW]{{1,3}}\b{GAP}\({GAP}{NUMBER}"
        ))
        .unwrap(),
    ]
});

static WIND_COMPASS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\bwind[_\s]?dir(?:ection)?\b{SEPARATOR}(?P<compass>[NSEW]{{1,3}})\b"
    ))
    .unwrap()
});

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\bdate\b{SEPARATOR}(?P<date>\d{{4}}-\d{{2}}-\d{{2}})(?:(?:T|{GAP})(?P<time>\d{{1,2}}:\d{{2}}))?"
    ))
    .unwrap()
});

/// A number found after a label, with the unit written next to it
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledValue {
    pub value: f64,
    pub unit: Option<String>,
}

impl LabeledValue {
    fn unit_lower(&self) -> Option<String> {
        self.unit.as_ref().map(|u| u.to_ascii_lowercase())
    }
}

/// Last match of the first pattern that matches anywhere in the text
pub fn last_labeled(patterns: &[Regex], text: &str) -> Option<LabeledValue> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let value = caps.name("value")?.as_str().parse::<f64>().ok()?;
                value.is_finite().then(|| LabeledValue {
                    value,
                    unit: caps.name("unit").map(|u| u.as_str().to_string()),
                })
            })
            .last()
    })
}

fn temperature_celsius(found: LabeledValue) -> f64 {
    match found.unit_lower().as_deref() {
        Some(unit) if unit.starts_with('f') => fahrenheit_to_celsius(found.value),
        _ => found.value,
    }
}

/// Water temperature in Celsius
pub fn water_temperature(text: &str) -> Option<f64> {
    last_labeled(&WATER_TEMP_PATTERNS, text).map(temperature_celsius)
}

/// Air temperature in Celsius
pub fn air_temperature(text: &str) -> Option<f64> {
    last_labeled(&AIR_TEMP_PATTERNS, text).map(temperature_celsius)
}

/// Wave height in meters
pub fn wave_height(text: &str) -> Option<f64> {
    last_labeled(&WAVE_HEIGHT_PATTERNS, text).map(|found| {
        match found.unit_lower().as_deref() {
            Some("ft" | "feet" | "foot") => feet_to_meters(found.value),
            _ => found.value,
        }
    })
}

/// Wind speed in the unit it was written in (m/s when unlabeled)
pub fn wind_speed(text: &str) -> Option<WindSpeed> {
    last_labeled(&WIND_SPEED_PATTERNS, text).map(|found| WindSpeed {
        value: found.value,
        unit: found
            .unit
            .as_deref()
            .and_then(SpeedUnit::from_token)
            .unwrap_or(SpeedUnit::MetersPerSecond),
    })
}

/// Wind bearing in degrees, from a number or a written compass point
pub fn wind_direction(text: &str) -> Option<f64> {
    if let Some(found) = last_labeled(&WIND_DIR_PATTERNS, text) {
        return Some(found.value);
    }

    WIND_COMPASS_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.name("compass").and_then(|m| compass_to_degrees(m.as_str())))
        .last()
}

/// Bearing at the center of a 16-point compass sector
pub fn compass_to_degrees(point: &str) -> Option<f64> {
    let upper = point.to_ascii_uppercase();
    COMPASS_POINTS
        .iter()
        .position(|p| *p == upper)
        .map(|index| index as f64 * DEGREES_PER_COMPASS_POINT)
}

/// Explicit `date: YYYY-MM-DD[ HH:MM]` label, read as UTC
pub fn explicit_date(text: &str) -> Option<DateTime<Utc>> {
    DATE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let date = NaiveDate::parse_from_str(caps.name("date")?.as_str(), "%Y-%m-%d").ok()?;
            let time = match caps.name("time") {
                Some(t) => NaiveTime::parse_from_str(t.as_str(), "%H:%M").ok()?,
                None => NaiveTime::from_hms_opt(0, 0, 0)?,
            };
            Some(date.and_time(time).and_utc())
        })
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn close(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_water_temperature_labels_and_units() {
        assert!(close(water_temperature("Water Temperature: 18.5 C"), 18.5));
        assert!(close(water_temperature("water_temperature 18.5"), 18.5));
        assert!(close(water_temperature("SST: -1.5"), -1.5));
        assert!(close(water_temperature("Sea Temp 65°F"), (65.0 - 32.0) * 5.0 / 9.0));
        assert!(close(
            water_temperature("Water Temperature: 65°F (18.5°C)"),
            (65.0 - 32.0) * 5.0 / 9.0
        ));
        assert!(water_temperature("Air Temperature: 20 C").is_none());
    }

    #[test]
    fn test_spelled_out_temperature_units() {
        assert!(close(
            water_temperature("Water Temperature: 61 Fahrenheit"),
            (61.0 - 32.0) * 5.0 / 9.0
        ));
        assert!(close(air_temperature("Air Temp 68 degrees fahrenheit"), 20.0));
        assert!(close(water_temperature("Water Temp: 16.1 Celsius"), 16.1));
    }

    #[test]
    fn test_last_match_wins() {
        let text = "Water Temp: 10.0 C\nWater Temp: 12.5 C";
        assert!(close(water_temperature(text), 12.5));
    }

    #[test]
    fn test_label_does_not_bind_across_lines() {
        assert!(water_temperature("Water Temperature:\n18.5").is_none());
    }

    #[test]
    fn test_wave_height_units() {
        assert!(close(wave_height("Wave Height: 1.2 m"), 1.2));
        assert!(close(wave_height("Significant Wave Height: 3 ft"), 0.9144));
        assert!(close(wave_height("Waves: 4 feet"), 4.0 * 0.3048));
        assert!(close(wave_height("wave_height 2.5"), 2.5));
    }

    #[test]
    fn test_wave_labels_prefer_wave_height_over_swell() {
        let text = "Significant Wave Height: 1.4 m\nSwell Height: 0.9 m";
        assert!(close(wave_height(text), 1.4));
        assert!(close(wave_height("Swell Height: 0.9 m"), 0.9));
    }

    #[test]
    fn test_wind_speed_units() {
        assert_eq!(
            wind_speed("Wind Speed: 14 knots"),
            Some(WindSpeed { value: 14.0, unit: SpeedUnit::Knots })
        );
        assert_eq!(
            wind_speed("Wind Speed: 9 mph"),
            Some(WindSpeed { value: 9.0, unit: SpeedUnit::MilesPerHour })
        );
        assert_eq!(
            wind_speed("wind speed 7.2"),
            Some(WindSpeed { value: 7.2, unit: SpeedUnit::MetersPerSecond })
        );
        assert_eq!(
            wind_speed("Wind: SW (220°) 9.9 knots"),
            Some(WindSpeed { value: 9.9, unit: SpeedUnit::Knots })
        );
    }

    #[test]
    fn test_wind_direction_is_not_read_as_speed() {
        assert_eq!(wind_speed("Wind Direction: SW (220°)"), None);
        assert_eq!(wind_speed("Wind Gust: 17 knots"), None);
    }

    #[test]
    fn test_wind_direction_forms() {
        assert_eq!(wind_direction("Wind Direction: SW (220°)"), Some(220.0));
        assert_eq!(wind_direction("Wind Dir: 95"), Some(95.0));
        assert_eq!(wind_direction("Wind: SW (220°) 9.9 knots"), Some(220.0));
        assert_eq!(wind_direction("Wind Direction: NNE"), Some(22.5));
        assert_eq!(wind_direction("Wind Speed: 14 knots"), None);
    }

    #[test]
    fn test_compass_to_degrees() {
        assert_eq!(compass_to_degrees("N"), Some(0.0));
        assert_eq!(compass_to_degrees("e"), Some(90.0));
        assert_eq!(compass_to_degrees("WSW"), Some(247.5));
        assert_eq!(compass_to_degrees("NEN"), None);
    }

    #[test]
    fn test_explicit_date() {
        assert_eq!(
            explicit_date("Date: 2024-06-15"),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(
            explicit_date("date: 2024-06-15 12:30"),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap())
        );
        assert_eq!(explicit_date("date: 2024-13-45"), None);
        assert_eq!(explicit_date("update 2024-06-15"), None);
    }
}
