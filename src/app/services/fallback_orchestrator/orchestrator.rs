//! Source fallback and multi-source composition

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::fetcher::SourceFetcher;
use super::response::StationResponse;
use crate::app::models::{NormalizedRecord, ParserPipeline, RawDocument, SourceFormat};
use crate::app::services::clock::{Clock, SystemClock};
use crate::app::services::column_table_parser::ColumnTableParser;
use crate::app::services::key_value_parser::KeyValueParser;
use crate::config::Config;
use crate::{Error, Result};

/// What happened when one source was tried
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The body parsed into a record
    Parsed,
    /// The body was received but held no usable data
    NoData,
    /// Every try failed at the transport level
    TransportFailed { message: String },
}

/// One source tried for a station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAttempt {
    pub format: SourceFormat,
    pub url: String,
    /// Requests made, including retries
    pub tries: u32,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// A resolved station observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub station: String,
    /// Source tag, or `sst+wave` tags when composed from two sources
    pub source: String,
    pub record: NormalizedRecord,
    pub attempts: Vec<SourceAttempt>,
}

/// Outcome of one orchestration with any raw bodies collected along the way
#[derive(Debug)]
pub struct Resolution {
    pub result: Result<StationReport>,
    /// Bodies that parsed to nothing; collected only in debug mode
    pub raw: Vec<RawDocument>,
}

/// Check and normalize a station identifier
///
/// Identifiers are trimmed, must be non-empty ASCII alphanumerics and are
/// lowercased to match upstream file names.
pub fn validate_station(raw: &str) -> Result<String> {
    let station = raw.trim();
    if station.is_empty() {
        return Err(Error::invalid_station(raw, "station identifier is required"));
    }
    if !station.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::invalid_station(
            raw,
            "only ASCII letters and digits are allowed",
        ));
    }
    Ok(station.to_ascii_lowercase())
}

/// Tries a station's feeds in priority order until one parses
pub struct FallbackOrchestrator<F: SourceFetcher> {
    fetcher: F,
    config: Config,
    clock: Arc<dyn Clock>,
}

impl<F: SourceFetcher> FallbackOrchestrator<F> {
    /// Create an orchestrator using the system clock
    pub fn new(fetcher: F, config: Config) -> Self {
        Self {
            fetcher,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock handed to the parsers
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve a station, returning only the report or the error
    pub async fn fetch_station(&self, station: &str) -> Result<StationReport> {
        self.resolve(station).await.result
    }

    /// Resolve a station into the response a transport shell would send
    pub async fn respond(&self, station: &str) -> StationResponse {
        let resolution = self.resolve(station).await;
        StationResponse::from_resolution(station, &resolution)
    }

    /// Resolve a station in the configured mode
    pub async fn resolve(&self, station: &str) -> Resolution {
        let station = match validate_station(station) {
            Ok(station) => station,
            Err(error) => {
                return Resolution {
                    result: Err(error),
                    raw: Vec::new(),
                };
            }
        };

        if self.config.prefer_both {
            self.resolve_composed(&station).await
        } else {
            self.resolve_sequential(&station).await
        }
    }

    /// Route a document to the parser its format needs
    pub fn parse_document(&self, document: &RawDocument) -> Option<NormalizedRecord> {
        if document.is_blank() {
            return None;
        }

        let clock = self.clock.as_ref();
        match document.format.pipeline() {
            ParserPipeline::ColumnTable => {
                ColumnTableParser::new(clock).parse(&document.body, document.format)
            }
            ParserPipeline::KeyValue => KeyValueParser::new(clock)
                .with_tabular_hint(document.format)
                .parse(&document.body),
        }
    }

    async fn resolve_sequential(&self, station: &str) -> Resolution {
        let mut attempts = Vec::new();
        let mut raw = Vec::new();
        let mut received = 0usize;

        for &format in &self.config.sources {
            let url = self.config.source_url(station, format);
            let (body, tries) = self.fetch_with_retry(&url).await;

            let body = match body {
                Ok(body) => body,
                Err(error) => {
                    attempts.push(SourceAttempt {
                        format,
                        url,
                        tries,
                        outcome: AttemptOutcome::TransportFailed {
                            message: error.to_string(),
                        },
                    });
                    continue;
                }
            };

            received += 1;
            let document = RawDocument::new(format, body);
            match self.parse_document(&document) {
                Some(record) => {
                    info!("Station {} resolved from {}", station, format);
                    attempts.push(SourceAttempt {
                        format,
                        url,
                        tries,
                        outcome: AttemptOutcome::Parsed,
                    });
                    return Resolution {
                        result: Ok(StationReport {
                            station: station.to_string(),
                            source: format.tag().to_string(),
                            record,
                            attempts,
                        }),
                        raw,
                    };
                }
                None => {
                    debug!("No usable data in {} feed for {}", format, station);
                    attempts.push(SourceAttempt {
                        format,
                        url,
                        tries,
                        outcome: AttemptOutcome::NoData,
                    });
                    if self.config.debug {
                        raw.push(document);
                    }
                }
            }
        }

        Resolution {
            result: Err(self.exhaustion(station, received)),
            raw,
        }
    }

    async fn resolve_composed(&self, station: &str) -> Resolution {
        let fetches = self.config.sources.iter().map(|&format| async move {
            let url = self.config.source_url(station, format);
            let (body, tries) = self.fetch_with_retry(&url).await;
            (format, url, body, tries)
        });

        // join_all keeps input order, so results stay in priority order
        let results = join_all(fetches).await;

        let mut attempts = Vec::new();
        let mut candidates = Vec::new();
        let mut raw = Vec::new();
        let mut received = 0usize;

        for (format, url, body, tries) in results {
            let outcome = match body {
                Err(error) => AttemptOutcome::TransportFailed {
                    message: error.to_string(),
                },
                Ok(body) => {
                    received += 1;
                    let document = RawDocument::new(format, body);
                    match self.parse_document(&document) {
                        Some(record) => {
                            candidates.push((format, record));
                            AttemptOutcome::Parsed
                        }
                        None => {
                            if self.config.debug {
                                raw.push(document);
                            }
                            AttemptOutcome::NoData
                        }
                    }
                }
            };
            attempts.push(SourceAttempt {
                format,
                url,
                tries,
                outcome,
            });
        }

        let result = match compose_records(&candidates) {
            Some((record, source)) => {
                info!("Station {} composed from {}", station, source);
                Ok(StationReport {
                    station: station.to_string(),
                    source,
                    record,
                    attempts,
                })
            }
            None => Err(self.exhaustion(station, received)),
        };

        Resolution { result, raw }
    }

    /// Fetch one URL, retrying transport failures with doubling delays
    async fn fetch_with_retry(&self, url: &str) -> (Result<String>, u32) {
        let mut tries = 0;
        loop {
            tries += 1;
            match self.fetcher.fetch(url).await {
                Ok(body) => return (Ok(body), tries),
                Err(error) => {
                    warn!("Fetch {} failed (try {}): {}", url, tries, error);
                    if tries > self.config.retries {
                        return (Err(error), tries);
                    }
                    tokio::time::sleep(self.config.retry_delay(tries)).await;
                }
            }
        }
    }

    fn exhaustion(&self, station: &str, received: usize) -> Error {
        let attempted = self.config.sources.len();
        warn!(
            "No source produced data for {} ({} of {} answered)",
            station, received, attempted
        );
        if received > 0 {
            Error::no_usable_data(station, attempted)
        } else {
            Error::all_sources_failed(station, attempted)
        }
    }
}

/// Compose one record from parsed candidates in priority order
///
/// SST comes from the first candidate that has it and wave height from the
/// first that has that; other fields are filled in priority order. Without
/// any primary field the first candidate is returned unchanged.
pub fn compose_records(
    candidates: &[(SourceFormat, NormalizedRecord)],
) -> Option<(NormalizedRecord, String)> {
    let sst = candidates.iter().find(|(_, r)| r.sst_c.is_some());
    let wave = candidates.iter().find(|(_, r)| r.wave_m.is_some());

    let (base_format, base) = match (sst, wave) {
        (Some(sst), _) => sst,
        (None, Some(wave)) => wave,
        (None, None) => {
            let (format, record) = candidates.first()?;
            return Some((record.clone(), format.tag().to_string()));
        }
    };

    let mut record = base.clone();
    let mut source = base_format.tag().to_string();

    if let Some((wave_format, wave_record)) = wave {
        if wave_format != base_format {
            record.wave_m = wave_record.wave_m;
            record.wave_ft = wave_record.wave_ft;
            record.ts = record.ts.max(wave_record.ts);
            source = format!("{}+{}", source, wave_format.tag());
        }
    }

    for (_, other) in candidates {
        record.fill_missing_from(other);
    }

    Some((record, source))
}
