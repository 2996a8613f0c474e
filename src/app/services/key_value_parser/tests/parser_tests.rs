//! Tests for labeled extraction, tabular fill-in and record assembly

use super::super::parser::{KeyValueParser, TimestampSource};
use super::{create_rss_feed, fallback_instant, test_clock};
use crate::app::models::{SemanticField, SourceFormat};
use chrono::{TimeZone, Utc};

#[test]
fn test_fahrenheit_water_temperature() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);

    let record = parser.parse("Water Temperature: 61 F").unwrap();

    assert_eq!(record.water_c, Some(16.1));
    assert_eq!(record.sst_c, Some(16.1));
    assert_eq!(record.water_f, Some(61.0));
    assert_eq!(record.wave_m, None);
    assert_eq!(record.ts, fallback_instant().timestamp_millis());
}

#[test]
fn test_empty_and_unlabeled_text() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);

    assert!(parser.parse("").is_none());
    assert!(parser.parse(" \n\t ").is_none());
    assert!(parser.parse("Station offline for maintenance").is_none());
    assert!(parser.parse("<rss><channel></channel></rss>").is_none());
}

#[test]
fn test_rss_description_block() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock).with_tabular_hint(SourceFormat::Rss);

    let result = parser.parse_detailed(&create_rss_feed());
    let record = result.record.unwrap();

    assert_eq!(record.water_c, Some(18.3));
    assert_eq!(record.water_f, Some(65.0));
    assert_eq!(record.air_c, Some(20.0));
    assert_eq!(record.air_f, Some(68.0));
    assert_eq!(record.wave_m, Some(0.9));
    assert_eq!(record.wave_ft, Some(3.0));
    assert_eq!(record.wind_kts, Some(14.0));
    assert_eq!(record.wind_mph, Some(16.0));
    assert_eq!(record.wind_mps, Some(7.0));
    assert_eq!(record.wind_dir_deg, Some(220.0));
    assert_eq!(record.wind_dir_compass.as_deref(), Some("SW"));
    assert_eq!(
        record.timestamp(),
        Some(Utc.with_ymd_and_hms(2024, 6, 15, 12, 50, 0).unwrap())
    );

    assert!(result.stats.markup_stripped);
    assert_eq!(result.stats.labeled_fields.len(), 5);
    assert!(result.stats.tabular.is_none());
    assert_eq!(result.stats.timestamp_source, TimestampSource::PubDate);
}

#[test]
fn test_compact_rss_wind_form() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);

    let record = parser
        .parse("<description>Wind: SW (220&#176;) 9.9 knots<br/>Waves: 1.2 m</description>")
        .unwrap();

    assert_eq!(record.wind_kts, Some(10.0));
    assert_eq!(record.wind_mph, Some(11.0));
    assert_eq!(record.wind_dir_compass.as_deref(), Some("SW"));
    assert_eq!(record.wave_m, Some(1.2));
}

#[test]
fn test_explicit_date_label_wins_over_pub_date() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);
    let text = "<item><pubDate>Sat, 15 Jun 2024 12:50:00 +0000</pubDate>\
                <description>Date: 2024-06-14 09:30<br/>Wave Height: 4 ft</description></item>";

    let result = parser.parse_detailed(text);
    let record = result.record.unwrap();

    assert_eq!(
        record.timestamp(),
        Some(Utc.with_ymd_and_hms(2024, 6, 14, 9, 30, 0).unwrap())
    );
    assert_eq!(result.stats.timestamp_source, TimestampSource::Label);
    assert_eq!(record.wave_m, Some(1.2));
}

#[test]
fn test_spec_table_fills_missing_fields() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);
    let spec = "#YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD\n\
                #yr  mo dy hr mn    m    m  sec    m  sec  -  degT     -      sec degT\n\
                2024 06 15 12 10  1.3  0.9  8.3  0.7  4.0 SSE  SE    AVERAGE  6.1 160\n";

    let result = parser.parse_detailed(spec);
    let record = result.record.unwrap();

    assert_eq!(record.wave_m, Some(1.3));
    assert_eq!(record.sst_c, None);
    assert_eq!(
        record.timestamp(),
        Some(Utc.with_ymd_and_hms(2024, 6, 15, 12, 10, 0).unwrap())
    );
    assert_eq!(result.stats.tabular_fields, vec![SemanticField::WaveHeight]);
    assert_eq!(result.stats.timestamp_source, TimestampSource::TableRow);
}

#[test]
fn test_labels_take_precedence_over_table() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);
    let text = "Wave Height: 2.0 m\nWater Temp: 12.0 C\n\
                #YY MM DD hh mm WVHT\n\
                24 06 15 12 00 1.3\n";

    let result = parser.parse_detailed(text);
    let record = result.record.unwrap();

    assert_eq!(record.wave_m, Some(2.0));
    assert_eq!(record.sst_c, Some(12.0));
    assert!(result.stats.tabular_fields.is_empty());
}

#[test]
fn test_free_text_values_outside_every_range_are_ignored() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);
    let text = "Buoy report\nPressure 1016 mb\nVisibility 99 nmi";

    let result = parser.parse_detailed(text);
    assert!(result.record.is_none());
    assert!(result.stats.tabular.is_some());
}

#[test]
fn test_headerless_numeric_text_reaches_table_pass() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);

    let result = parser.parse_detailed("1.2 0.8\n1.3 0.9\n");
    let record = result.record.unwrap();

    assert_eq!(record.wave_m, Some(1.3));
    assert_eq!(record.ts, fallback_instant().timestamp_millis());
    assert_eq!(result.stats.tabular_fields, vec![SemanticField::WaveHeight]);
    assert_eq!(result.stats.timestamp_source, TimestampSource::Clock);
}

#[test]
fn test_table_inside_markup_reaches_table_pass() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);

    let result = parser.parse_detailed("<p>#YY MM DD hh mm WVHT</p><p>24 06 15 12 00 1.3</p>");
    let record = result.record.unwrap();

    assert!(result.stats.markup_stripped);
    assert_eq!(record.wave_m, Some(1.3));
    assert_eq!(
        record.timestamp(),
        Some(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
    );
    assert_eq!(result.stats.timestamp_source, TimestampSource::TableRow);
}

#[test]
fn test_stats_serialize_field_names() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);

    let result = parser.parse_detailed("#YY MM DD hh mm WVHT\n24 06 15 12 00 1.3\nWater Temperature: 61 F\n");
    let json = serde_json::to_value(&result.stats).unwrap();

    assert_eq!(json["labeled_fields"], serde_json::json!(["sst"]));
    assert_eq!(json["tabular_fields"], serde_json::json!(["wave_height"]));
    assert_eq!(json["timestamp_source"], "table_row");
    assert_eq!(json["tabular"]["header_found"], true);
}

#[test]
fn test_parsing_is_idempotent() {
    let clock = test_clock();
    let parser = KeyValueParser::new(&clock);
    let feed = create_rss_feed();

    for text in ["Water Temperature: 61 F", "Wind Speed: 12 mph", feed.as_str()] {
        assert_eq!(parser.parse(text), parser.parse(text));
    }
}
