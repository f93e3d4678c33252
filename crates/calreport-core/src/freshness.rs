//! Selection of recently updated events.
//!
//! [`filter_and_format`] turns a list of [`EventRecord`]s into the lines of
//! the "daily updated events" report. It is a pure function of its inputs:
//! the cutoff is computed once by the caller (see [`daily_cutoff`]) and passed
//! in, so the same inputs always give the same [`FreshnessReport`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::EventRecord;

/// Label shown for private events that carry no summary.
pub const PRIVATE_BUSY_LABEL: &str = "busy - private";

/// Errors produced while filtering events.
#[derive(Debug, Error)]
pub enum FreshnessError {
    /// An event's `updated` field is not valid RFC 3339.
    #[error("event {event_id} has invalid updated timestamp {value:?}: {source}")]
    InvalidTimestamp {
        event_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A display-ready projection of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLine {
    pub id: String,
    /// Resolved label: the summary, the private fallback, or empty.
    pub summary: String,
    /// The `updated` text as received, echoed verbatim.
    pub updated: String,
}

/// Outcome of filtering a list of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreshnessReport {
    /// The input list was empty.
    NoEvents,
    /// The input had events; these are the ones updated after the cutoff,
    /// in input order. May be empty.
    Updated(Vec<DisplayLine>),
}

impl FreshnessReport {
    /// Returns the selected lines (empty for [`FreshnessReport::NoEvents`]).
    pub fn lines(&self) -> &[DisplayLine] {
        match self {
            Self::NoEvents => &[],
            Self::Updated(lines) => lines,
        }
    }
}

/// Returns the cutoff for the daily report: one day before `now`.
pub fn daily_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(1)
}

/// Parses an RFC 3339 timestamp into a UTC instant.
pub fn parse_updated(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

/// Selects the events updated strictly after `cutoff`.
///
/// Fails on the first unparseable timestamp without returning any lines.
pub fn filter_and_format(
    cutoff: DateTime<Utc>,
    events: &[EventRecord],
) -> Result<FreshnessReport, FreshnessError> {
    if events.is_empty() {
        return Ok(FreshnessReport::NoEvents);
    }

    let mut lines = Vec::new();
    for event in events {
        let updated =
            parse_updated(&event.updated).map_err(|source| FreshnessError::InvalidTimestamp {
                event_id: event.id.clone(),
                value: event.updated.clone(),
                source,
            })?;

        if updated > cutoff {
            lines.push(DisplayLine {
                id: event.id.clone(),
                summary: display_summary(event).to_string(),
                updated: event.updated.clone(),
            });
        }
    }

    Ok(FreshnessReport::Updated(lines))
}

fn display_summary(event: &EventRecord) -> &str {
    if !event.summary.is_empty() {
        &event.summary
    } else if event.is_private() {
        PRIVATE_BUSY_LABEL
    } else {
        ""
    }
}
