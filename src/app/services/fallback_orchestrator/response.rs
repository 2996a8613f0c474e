//! Transport-neutral station responses
//!
//! Maps an orchestration outcome onto the status code and JSON body any
//! HTTP shell would return, so shells only have to copy both out.

use serde::Serialize;

use super::orchestrator::{Resolution, StationReport};
use crate::app::models::{NormalizedRecord, RawDocument};
use crate::{Error, Result};

/// One raw upstream body echoed in debug mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawEcho {
    pub source: String,
    pub body: String,
}

impl From<&RawDocument> for RawEcho {
    fn from(document: &RawDocument) -> Self {
        Self {
            source: document.format.tag().to_string(),
            body: document.body.clone(),
        }
    }
}

/// JSON body of a station response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// `{station, source, ...record}`
    Observation {
        station: String,
        source: String,
        #[serde(flatten)]
        record: NormalizedRecord,
    },
    /// `{error, station}` plus raw bodies in debug mode
    Failure {
        error: String,
        station: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw: Option<Vec<RawEcho>>,
    },
}

/// Status code and body for one station request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl StationResponse {
    /// 200 with the normalized record
    pub fn ok(report: &StationReport) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Observation {
                station: report.station.clone(),
                source: report.source.clone(),
                record: report.record.clone(),
            },
        }
    }

    /// Error response; raw bodies are attached only when some were collected
    pub fn from_error(station: &str, error: &Error, raw: &[RawDocument]) -> Self {
        let raw = (!raw.is_empty()).then(|| raw.iter().map(RawEcho::from).collect());

        Self {
            status: error.http_status(),
            body: ResponseBody::Failure {
                error: error.to_string(),
                station: station.to_string(),
                raw,
            },
        }
    }

    /// Map a full resolution; the station is echoed as the caller sent it
    pub fn from_resolution(station: &str, resolution: &Resolution) -> Self {
        match &resolution.result {
            Ok(report) => Self::ok(report),
            Err(error) => Self::from_error(station.trim(), error, &resolution.raw),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Serialize the body as compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.body)?)
    }

    /// Serialize the body as indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.body)?)
    }
}
