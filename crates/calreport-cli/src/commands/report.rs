//! The three calendar reports.
//!
//! Each function fetches what it needs from a [`CalendarSource`] and returns
//! the framed report text; the binary prints it.

use calreport_core::{
    filter_and_format, framed, render_daily_updated, render_event_listing, render_owner_details,
    OwnerDetails,
};
use calreport_providers::{collect_all_events, CalendarSource, EventQuery};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::ReportSettings;
use crate::error::{ClientResult, ResultExt};

pub const OWNER_TITLE: &str = "Calendar Details";
pub const EVENTS_TITLE: &str = "All Events";
pub const DAILY_TITLE: &str = "Daily Updated Events";

/// Color palette and calendar ids.
pub async fn show_owner(source: &dyn CalendarSource) -> ClientResult<String> {
    let details = fetch_owner_details(source)
        .await
        .context(|| "failed to show owner details".to_string())?;
    Ok(framed(OWNER_TITLE, &render_owner_details(&details)))
}

async fn fetch_owner_details(source: &dyn CalendarSource) -> ClientResult<OwnerDetails> {
    let palette = source.get_colors().await?;
    let calendar_ids = source.list_calendar_ids().await?;
    debug!(
        "{} calendar colors, {} event colors, {} calendars",
        palette.calendar.len(),
        palette.event.len(),
        calendar_ids.len()
    );
    Ok(OwnerDetails {
        palette,
        calendar_ids,
    })
}

/// First page of events of `calendar_id`.
pub async fn show_events(
    source: &dyn CalendarSource,
    calendar_id: &str,
    settings: &ReportSettings,
) -> ClientResult<String> {
    let query = base_query(settings);
    let listing = source
        .list_events(calendar_id, &query)
        .await
        .context(|| format!("failed to show events for '{calendar_id}'"))?;
    Ok(framed(
        EVENTS_TITLE,
        &render_event_listing(calendar_id, &listing),
    ))
}

/// Events of `calendar_id` updated after `cutoff`.
pub async fn show_daily_updated(
    source: &dyn CalendarSource,
    calendar_id: &str,
    cutoff: DateTime<Utc>,
    settings: &ReportSettings,
) -> ClientResult<String> {
    let context = || format!("failed to show daily updated events for '{calendar_id}'");

    let query = base_query(settings).with_time_min(cutoff);
    let listing = if settings.follow_pages {
        collect_all_events(source, calendar_id, &query).await
    } else {
        source.list_events(calendar_id, &query).await
    }
    .context(context)?;

    let report = filter_and_format(cutoff, &listing.events).context(context)?;
    info!(
        "{} of {} events in '{}' updated since {}",
        report.lines().len(),
        listing.events.len(),
        calendar_id,
        cutoff
    );
    Ok(framed(DAILY_TITLE, &render_daily_updated(calendar_id, &report)))
}

fn base_query(settings: &ReportSettings) -> EventQuery {
    match settings.max_results {
        Some(max) => EventQuery::new().with_max_results(max),
        None => EventQuery::new(),
    }
}
