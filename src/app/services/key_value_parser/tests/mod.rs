//! Test utilities for key-value parser testing

use crate::app::services::clock::FixedClock;
use chrono::{DateTime, TimeZone, Utc};

mod parser_tests;

pub fn fallback_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
}

pub fn test_clock() -> FixedClock {
    FixedClock::new(fallback_instant())
}

/// Latest-observation RSS feed as NDBC publishes it
pub fn create_rss_feed() -> String {
    r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<rss version="2.0" xmlns:georss="http://www.georss.org/georss">
  <channel>
    <title>NDBC - Station 44013 Observations</title>
    <description><![CDATA[This is an observation from the National Data Buoy Center]]></description>
    <item>
      <pubDate>Sat, 15 Jun 2024 12:50:00 +0000</pubDate>
      <title>Station 44013 - BOSTON 16 NM East of Boston, MA</title>
      <description><![CDATA[
        <strong>June 15, 2024 8:50 am EDT</strong><br />
        <strong>Location:</strong> 42.346N 70.651W<br />
        <strong>Wind Direction:</strong> SW (220&#176;)<br />
        <strong>Wind Speed:</strong> 14 knots<br />
        <strong>Wind Gust:</strong> 17 knots<br />
        <strong>Significant Wave Height:</strong> 3 ft<br />
        <strong>Dominant Wave Period:</strong> 8 sec<br />
        <strong>Atmospheric Pressure:</strong> 30.01 in (1016.3 mb)<br />
        <strong>Air Temperature:</strong> 68&#176;F (20.1&#176;C)<br />
        <strong>Water Temperature:</strong> 65&#176;F (18.5&#176;C)<br />
      ]]></description>
    </item>
  </channel>
</rss>"#
        .to_string()
}
