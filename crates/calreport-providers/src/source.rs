//! The [`CalendarSource`] trait consumed by the reports.
//!
//! A source exposes the three read-only calls the reports need. The Google
//! client implements it; tests implement it with canned data.

use std::future::Future;
use std::pin::Pin;

use calreport_core::{ColorPalette, EventListing};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{OperationExt, ProviderError, ProviderResult};

/// A boxed future so the trait stays object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Upper bound on pages followed by [`collect_all_events`].
pub const MAX_PAGES: usize = 1000;

/// Parameters for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Only return events ending after this instant.
    pub time_min: Option<DateTime<Utc>>,
    /// Page to fetch; `None` for the first page.
    pub page_token: Option<String>,
    /// Page size hint.
    pub max_results: Option<u32>,
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_min(mut self, time_min: DateTime<Utc>) -> Self {
        self.time_min = Some(time_min);
        self
    }

    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    pub fn with_max_results(mut self, max: u32) -> Self {
        self.max_results = Some(max);
        self
    }
}

/// Read-only calendar API capabilities.
pub trait CalendarSource: Send + Sync {
    /// Returns the name/type of this source (e.g. `"google"`).
    fn name(&self) -> &str;

    /// Fetches the calendar and event color palette.
    fn get_colors(&self) -> BoxFuture<'_, ProviderResult<ColorPalette>>;

    /// Lists the ids of the calendars on the user's calendar list.
    fn list_calendar_ids(&self) -> BoxFuture<'_, ProviderResult<Vec<String>>>;

    /// Fetches a single page of events.
    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<EventListing>>;
}

/// Fetches every page of events, following `next_page_token`.
///
/// The returned listing keeps the calendar summary of the first page and has
/// no next page token.
pub async fn collect_all_events(
    source: &dyn CalendarSource,
    calendar_id: &str,
    query: &EventQuery,
) -> ProviderResult<EventListing> {
    let mut page_query = query.clone();
    let mut collected = EventListing::default();

    for page in 0..MAX_PAGES {
        let listing = source
            .list_events(calendar_id, &page_query)
            .await
            .operation("collect_all_events")?;

        if page == 0 {
            collected.calendar_summary = listing.calendar_summary;
        }
        collected.events.extend(listing.events);

        match listing.next_page_token {
            Some(token) => page_query.page_token = Some(token),
            None => {
                debug!(
                    "collected {} events from {} page(s) of {}",
                    collected.events.len(),
                    page + 1,
                    calendar_id
                );
                return Ok(collected);
            }
        }
    }

    Err(ProviderError::invalid_response(format!(
        "calendar {calendar_id} returned more than {MAX_PAGES} pages"
    ))
    .with_provider(source.name())
    .with_operation("collect_all_events"))
}
