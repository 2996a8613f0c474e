//! Integration tests for the fallback orchestrator through the public API
//!
//! A map-backed fetcher stands in for the network so every scenario runs
//! offline and deterministically.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use ndbc_normalizer::app::services::fallback_orchestrator::{
    FallbackOrchestrator, SourceFetcher, StationResponse,
};
use ndbc_normalizer::{Config, Error, FixedClock, Result, SourceFormat};

/// Fetcher answering from a fixed URL -> body map; unknown URLs fail
struct MapFetcher {
    bodies: HashMap<String, String>,
}

impl MapFetcher {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            bodies: entries
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl SourceFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| Error::transport(url, "HTTP 404 Not Found"))
    }
}

const OCEAN_URL: &str = "https://ndbc.test/realtime2/46042.ocean";
const SPEC_URL: &str = "https://ndbc.test/realtime2/46042.spec";
const TXT_URL: &str = "https://ndbc.test/realtime2/46042.txt";
const RSS_URL: &str = "https://ndbc.test/latest_obs/46042.rss";

const SPEC: &str = "\
#YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD
#yr  mo dy hr mn    m    m  sec    m  sec  -  degT     -      sec degT
2024 06 15 12 40  2.1  1.8 12.5  1.0  5.3  NW  NW    AVERAGE  8.0 315
";

const TXT: &str = "\
#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
2024 06 15 12 50 320  7.7  9.8    MM    MM    MM  MM 1016.2  12.9  13.2  10.1   MM   MM    MM
";

fn orchestrator(fetcher: MapFetcher, config: Config) -> FallbackOrchestrator<MapFetcher> {
    let config = config
        .with_base_urls("https://ndbc.test/realtime2", "https://ndbc.test/latest_obs")
        .with_retry_backoff_ms(0);
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
    FallbackOrchestrator::new(fetcher, config).with_clock(Arc::new(clock))
}

fn body_json(response: &StationResponse) -> serde_json::Value {
    serde_json::from_str(&response.to_json().unwrap()).unwrap()
}

/// Purpose: A station without an ocean feed resolves from its spectral summary
/// Benefit: Exercises the missing-feed fallback that most buoys hit
#[tokio::test]
async fn test_station_without_ocean_feed() {
    let fetcher = MapFetcher::new(&[(SPEC_URL, SPEC), (TXT_URL, TXT)]);
    let orchestrator = orchestrator(fetcher, Config::default());

    let response = orchestrator.respond("46042").await;
    assert_eq!(response.status, 200);

    let json = body_json(&response);
    assert_eq!(json["station"], "46042");
    assert_eq!(json["source"], "spec");
    assert_eq!(json["waveM"], 2.1);
    assert!(json.get("sstC").is_none());
}

/// Purpose: Compose SST from the realtime2 table and waves from the summary
/// Benefit: Prefer-both mode yields a record neither feed has alone
#[tokio::test]
async fn test_prefer_both_across_feeds() {
    let fetcher = MapFetcher::new(&[(SPEC_URL, SPEC), (TXT_URL, TXT)]);
    let orchestrator = orchestrator(fetcher, Config::default().with_prefer_both());

    let report = orchestrator.fetch_station("46042").await.unwrap();

    assert_eq!(report.source, "realtime2+spec");
    assert_eq!(report.record.sst_c, Some(13.2));
    assert_eq!(report.record.wave_m, Some(2.1));
    assert_eq!(report.record.wind_dir_compass.as_deref(), Some("NW"));
    assert_eq!(
        report.record.timestamp(),
        Some(Utc.with_ymd_and_hms(2024, 6, 15, 12, 50, 0).unwrap())
    );
}

/// Purpose: A custom source order is honoured
/// Benefit: Operators can put the RSS feed first for stations without tables
#[tokio::test]
async fn test_custom_source_order() {
    let rss = "<rss><channel><item><description>\
               &lt;strong&gt;Water Temperature:&lt;/strong&gt; 55.8&amp;#176;F&lt;br /&gt;\
               </description></item></channel></rss>";
    let fetcher = MapFetcher::new(&[(RSS_URL, rss), (TXT_URL, TXT)]);
    let config = Config::default().with_sources(vec![SourceFormat::Rss, SourceFormat::Realtime2]);
    let orchestrator = orchestrator(fetcher, config);

    let report = orchestrator.fetch_station("46042").await.unwrap();

    assert_eq!(report.source, "rss");
    assert_eq!(report.record.water_c, Some(13.2));
}

/// Purpose: Nothing answers for an unknown station
/// Benefit: Callers see a 502 naming the station, with no raw echo by default
#[tokio::test]
async fn test_unknown_station() {
    let orchestrator = orchestrator(MapFetcher::new(&[]), Config::default());

    let response = orchestrator.respond("ZZZZ9").await;
    assert_eq!(response.status, 502);

    let json = body_json(&response);
    assert_eq!(json["station"], "ZZZZ9");
    assert!(json["error"].as_str().unwrap().contains("All sources failed"));

    let error = orchestrator.fetch_station("ZZZZ9").await.unwrap_err();
    assert!(error.is_exhaustion());
}

/// Purpose: Debug mode echoes the bodies that parsed to nothing
/// Benefit: Operators can see what upstream actually sent
#[tokio::test]
async fn test_debug_echo() {
    let fetcher = MapFetcher::new(&[(OCEAN_URL, "#YY MM DD hh mm OTMP\n2024 06 15 12 00 MM\n")]);
    let orchestrator = orchestrator(fetcher, Config::default().with_debug());

    let response = orchestrator.respond("46042").await;
    assert_eq!(response.status, 502);

    let json = body_json(&response);
    assert_eq!(json["raw"][0]["source"], "ocean");
    assert!(json["raw"][0]["body"].as_str().unwrap().contains("OTMP"));
}
