//! Tests for composing one record from several sources

use super::super::orchestrator::compose_records;
use crate::app::models::{Measurements, NormalizedRecord, SourceFormat};
use crate::app::services::units::normalize;
use chrono::{TimeZone, Utc};

fn record(measurements: Measurements, hour: u32) -> NormalizedRecord {
    normalize(
        &measurements,
        Utc.with_ymd_and_hms(2024, 6, 15, hour, 0, 0).unwrap(),
    )
}

#[test]
fn test_no_candidates() {
    assert!(compose_records(&[]).is_none());
}

#[test]
fn test_single_source_is_not_relabelled() {
    let ocean = record(
        Measurements {
            water_c: Some(18.5),
            wave_m: Some(1.1),
            ..Default::default()
        },
        12,
    );

    let (composed, source) = compose_records(&[(SourceFormat::Ocean, ocean.clone())]).unwrap();
    assert_eq!(source, "ocean");
    assert_eq!(composed, ocean);
}

#[test]
fn test_sst_and_wave_from_different_sources() {
    let ocean = record(
        Measurements {
            water_c: Some(18.5),
            ..Default::default()
        },
        11,
    );
    let spec = record(
        Measurements {
            wave_m: Some(1.3),
            ..Default::default()
        },
        12,
    );
    let realtime2 = record(
        Measurements {
            water_c: Some(17.0),
            wave_m: Some(2.0),
            air_c: Some(20.1),
            ..Default::default()
        },
        10,
    );

    let (composed, source) = compose_records(&[
        (SourceFormat::Ocean, ocean),
        (SourceFormat::Spec, spec.clone()),
        (SourceFormat::Realtime2, realtime2),
    ])
    .unwrap();

    assert_eq!(source, "ocean+spec");
    assert_eq!(composed.sst_c, Some(18.5));
    assert_eq!(composed.wave_m, Some(1.3));
    assert_eq!(composed.wave_ft, spec.wave_ft);
    assert_eq!(composed.air_c, Some(20.1));
    assert_eq!(composed.ts, spec.ts);
}

#[test]
fn test_without_primary_fields_first_candidate_wins() {
    let wind_only = record(
        Measurements {
            wind_dir_deg: Some(90.0),
            ..Default::default()
        },
        12,
    );
    let other = record(
        Measurements {
            air_c: Some(5.0),
            ..Default::default()
        },
        12,
    );

    let (composed, source) = compose_records(&[
        (SourceFormat::Realtime2, wind_only.clone()),
        (SourceFormat::Rss, other),
    ])
    .unwrap();

    assert_eq!(source, "realtime2");
    assert_eq!(composed, wind_only);
}
