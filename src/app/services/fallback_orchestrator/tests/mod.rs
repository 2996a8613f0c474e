//! Test utilities for orchestrator testing
//!
//! Provides a scripted fetcher that answers by file extension and records
//! every URL it was asked for.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::fetcher::SourceFetcher;
use super::orchestrator::FallbackOrchestrator;
use crate::app::services::clock::FixedClock;
use crate::config::Config;
use crate::{Error, Result};

mod compose_tests;

/// Scripted answer for one feed extension
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Fail,
    /// Fail this many times, then answer
    FailThen(u32, String),
}

/// Fetcher answering from a script keyed by URL extension
#[derive(Default)]
pub struct ScriptedFetcher {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, extension: &str, reply: Reply) -> Self {
        self.replies.insert(extension.to_string(), reply);
        self
    }

    pub fn body(self, extension: &str, body: &str) -> Self {
        self.reply(extension, Reply::Body(body.to_string()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let previous = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.to_string());
            calls.iter().filter(|u| u.as_str() == url).count() as u32 - 1
        };

        let extension = url.rsplit('.').next().unwrap_or_default();
        match self.replies.get(extension) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::FailThen(failures, body)) if previous >= *failures => Ok(body.clone()),
            _ => Err(Error::transport(url, "HTTP 404 Not Found")),
        }
    }
}

pub fn test_config() -> Config {
    Config::default()
        .with_base_urls("http://buoys.test/realtime2", "http://buoys.test/latest_obs")
        .with_retry_backoff_ms(0)
}

pub fn orchestrator(fetcher: ScriptedFetcher, config: Config) -> FallbackOrchestrator<ScriptedFetcher> {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
    FallbackOrchestrator::new(fetcher, config).with_clock(Arc::new(clock))
}

pub const OCEAN_WITH_SST: &str = "#YY  MM DD hh mm  OTMP   COND   SAL\n\
                                  #yr  mo dy hr mn  degC  mS/cm   psu\n\
                                  2024 06 15 12 00  18.5   MM     MM\n";

pub const OCEAN_ALL_MISSING: &str = "#YY  MM DD hh mm OTMP   WVHT\n\
                                     2024 06 15 12 00   MM     MM\n";

pub const SPEC_WITH_WAVES: &str = "#YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD\n\
                                   2024 06 15 12 10  1.3  0.9  8.3  0.7  4.0 SSE  SE    AVERAGE  6.1 160\n";

pub const REALTIME2_FULL: &str = "#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP\n\
                                  2024 06 15 12 00 220  7.2  9.0   1.2     8   6.1 160 1015.2  20.1  18.1\n";

pub const RSS_FEED: &str = "<rss><channel><item>\
                            <pubDate>Sat, 15 Jun 2024 12:50:00 +0000</pubDate>\
                            <description>&lt;strong&gt;Water Temperature:&lt;/strong&gt; 65&amp;#176;F&lt;br /&gt;</description>\
                            </item></channel></rss>";
