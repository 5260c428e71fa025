//! Reconstruction requests and the status shown next to their result

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{WatchError, WatchResult};

use super::{ReconstructionReport, ResolvedVersion};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%d-%H%M%S",
];

/// Parse a user supplied timestamp
///
/// Accepts RFC 3339, a date and time without offset (taken as UTC), or a bare
/// `YYYY-MM-DD` date, which means midnight UTC.
pub fn parse_timestamp(input: &str) -> WatchResult<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(WatchError::invalid_input_field(
            "timestamp is empty",
            "timestamp",
        ));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(parsed.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(WatchError::invalid_input_field(
        format!("unrecognized timestamp '{}'", input),
        "timestamp",
    ))
}

/// A request to view a document at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconstructionRequest {
    /// `None` asks for the current version
    pub at: Option<DateTime<Utc>>,
}

impl ReconstructionRequest {
    pub fn current() -> Self {
        Self { at: None }
    }

    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            at: Some(timestamp),
        }
    }

    /// Build from an optional query parameter; absent or blank means current
    pub fn from_param(param: Option<&str>) -> WatchResult<Self> {
        match param.map(str::trim) {
            None | Some("") => Ok(Self::current()),
            Some(value) => parse_timestamp(value).map(Self::at),
        }
    }
}

/// Status line for a displayed version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Current,
    Version(DateTime<Utc>),
    Earliest,
    Failed(String),
}

impl ViewStatus {
    pub fn from_report(report: &ReconstructionReport) -> Self {
        match &report.resolved {
            ResolvedVersion::Current => Self::Current,
            ResolvedVersion::At { timestamp, .. } => Self::Version(*timestamp),
            ResolvedVersion::BeforeHistory => Self::Earliest,
        }
    }
}

impl fmt::Display for ViewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "showing current version"),
            Self::Version(ts) => {
                write!(f, "showing version from {}", ts.format("%Y-%m-%d %H:%M:%S UTC"))
            }
            Self::Earliest => write!(f, "showing earliest known version"),
            Self::Failed(message) => write!(f, "failed to load version: {}", message),
        }
    }
}
