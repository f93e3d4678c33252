//! Calendar data types consumed by the reports.
//!
//! These are provider-agnostic projections of what the calendar API returns:
//! - [`EventRecord`]: the handful of event fields the reports look at
//! - [`EventListing`]: one page of events plus listing metadata
//! - [`ColorPalette`]: calendar and event color definitions
//! - [`OwnerDetails`]: everything the owner report prints

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Visibility tag that triggers the private summary fallback.
pub const PRIVATE_VISIBILITY: &str = "private";

/// A calendar event as seen by the reports.
///
/// Records are read-only inputs; the reports derive display projections from
/// them and never modify them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Opaque event identifier.
    pub id: String,
    /// Event title; empty when the API omits it (e.g. private events).
    pub summary: String,
    /// Visibility tag as reported by the API (`"default"`, `"private"`, ...).
    pub visibility: String,
    /// Last modification time, RFC 3339 text as returned by the API.
    pub updated: String,
}

impl EventRecord {
    /// Creates a record with the given id and update timestamp.
    pub fn new(id: impl Into<String>, updated: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            updated: updated.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Builder method to set the visibility tag.
    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = visibility.into();
        self
    }

    /// Returns true if the event is marked private.
    pub fn is_private(&self) -> bool {
        self.visibility == PRIVATE_VISIBILITY
    }
}

/// One page of events for a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventListing {
    /// Title of the calendar the events belong to.
    pub calendar_summary: String,
    /// Events in API order.
    pub events: Vec<EventRecord>,
    /// Token for the next page, if the listing was truncated.
    pub next_page_token: Option<String>,
}

impl EventListing {
    /// Returns true if more pages are available.
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}

/// A background/foreground color pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDefinition {
    pub background: String,
    pub foreground: String,
}

/// Color definitions for calendars and events, keyed by color id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    /// Resource kind reported by the API (`calendar#colors`).
    pub kind: String,
    /// When the palette was last changed, as RFC 3339 text.
    pub updated: String,
    pub calendar: BTreeMap<String, ColorDefinition>,
    pub event: BTreeMap<String, ColorDefinition>,
}

/// Data shown by the owner details report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerDetails {
    pub palette: ColorPalette,
    /// Ids of the calendars on the user's calendar list.
    pub calendar_ids: Vec<String>,
}
