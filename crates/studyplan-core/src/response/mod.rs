//! Parsing the text-generation service's answer into timetable rows.
//!
//! The flow is linear:
//!
//! ```text
//! empty?  --yes--> EmptyResponse
//!   |
//! strict JSON decode --ok--> shape check --bad--> MalformedStructure
//!   |                           |
//!   | decode error              +--> normalize rows --bad row--> ConstructionFailure
//!   v
//! regex recovery --any field unmatched--> RecoveryFailure
//! ```
//!
//! Every terminal error carries the raw text so the user can read the
//! answer themselves.

pub mod recovery;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::ScheduleEntry;

/// Terminal failures of [`parse_response`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("the model did not return any text")]
    EmptyResponse,

    #[error("invalid 'timetable' structure in the JSON response")]
    MalformedStructure { raw: String },

    #[error("could not extract timetable data from the response")]
    RecoveryFailure { raw: String },

    #[error("could not build the timetable: {reason}")]
    ConstructionFailure { raw: String, reason: String },
}

impl ResponseError {
    /// The raw service answer, when the error surfaces it.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::EmptyResponse => None,
            Self::MalformedStructure { raw }
            | Self::RecoveryFailure { raw }
            | Self::ConstructionFailure { raw, .. } => Some(raw),
        }
    }
}

/// Which path produced the rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSource {
    /// The response decoded as JSON with the expected shape.
    Structured,
    /// JSON decoding failed with `decode_error`; rows came from the regex
    /// recovery scan.
    Recovered { decode_error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTimetable {
    pub entries: Vec<ScheduleEntry>,
    pub source: ParseSource,
}

/// Parse a service answer. `None` and whitespace-only text count as empty.
pub fn parse_response(text: Option<&str>) -> Result<ParsedTimetable, ResponseError> {
    let raw = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(ResponseError::EmptyResponse),
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            let entries = parse_structured(&value, raw)?;
            debug!(rows = entries.len(), "parsed structured timetable");
            Ok(ParsedTimetable {
                entries,
                source: ParseSource::Structured,
            })
        }
        Err(e) => {
            let decode_error = e.to_string();
            warn!(error = %decode_error, "response is not valid JSON; attempting recovery");
            let entries = recovery::recover_entries(raw).ok_or_else(|| {
                ResponseError::RecoveryFailure {
                    raw: raw.to_string(),
                }
            })?;
            debug!(rows = entries.len(), "recovered timetable rows");
            Ok(ParsedTimetable {
                entries,
                source: ParseSource::Recovered { decode_error },
            })
        }
    }
}

/// Validate the decoded shape and normalize each element.
fn parse_structured(value: &Value, raw: &str) -> Result<Vec<ScheduleEntry>, ResponseError> {
    let rows = value
        .get("timetable")
        .and_then(Value::as_array)
        .ok_or_else(|| ResponseError::MalformedStructure {
            raw: raw.to_string(),
        })?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let obj = row
                .as_object()
                .ok_or_else(|| ResponseError::ConstructionFailure {
                    raw: raw.to_string(),
                    reason: format!("timetable entry {} is not an object", i + 1),
                })?;
            Ok(entry_from_object(obj))
        })
        .collect()
}

fn entry_from_object(obj: &Map<String, Value>) -> ScheduleEntry {
    let field = |key: &str| obj.get(key).map(value_text).unwrap_or_default();

    let tasks = match obj.get("tasks") {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![value_text(other)],
    };

    ScheduleEntry {
        date: field("date"),
        day: field("day"),
        start_time: field("start_time"),
        end_time: field("end_time"),
        tasks,
    }
}

/// Render a JSON value as display text: strings verbatim, null as empty,
/// anything else in its JSON form.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
