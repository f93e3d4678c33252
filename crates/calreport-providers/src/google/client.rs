//! Google Calendar API client.
//!
//! A thin reqwest wrapper around the three read-only endpoints the reports
//! use. Requests ask for partial responses (`fields`) so only the data that
//! is printed travels over the wire.

use std::collections::BTreeMap;
use std::time::Duration;

use calreport_core::{ColorDefinition, ColorPalette, EventListing, EventRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{OperationExt, ProviderError, ProviderResult};
use crate::source::{BoxFuture, CalendarSource, EventQuery};

use super::config::CALENDAR_API_BASE;

const PROVIDER_NAME: &str = "google";

const CALENDAR_LIST_FIELDS: &str = "items/id";
const EVENT_FIELDS: &str = "items(id,updated,summary,visibility),summary,nextPageToken";

/// Authenticated Google Calendar API client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("calreport/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            access_token: access_token.into(),
            base_url: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Sends requests to `base_url` instead of the public API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// `GET /colors`
    pub async fn colors(&self) -> ProviderResult<ColorPalette> {
        let url = format!("{}/colors", self.base_url);
        let colors: ApiColors = self.get_json(&url, &[]).await.operation("get_colors")?;
        Ok(colors.into())
    }

    /// `GET /users/me/calendarList`, ids only.
    pub async fn calendar_ids(&self) -> ProviderResult<Vec<String>> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let list: ApiCalendarList = self
            .get_json(&url, &[("fields", CALENDAR_LIST_FIELDS.to_string())])
            .await
            .operation("list_calendars")?;
        Ok(list.items.into_iter().map(|entry| entry.id).collect())
    }

    /// `GET /calendars/{id}/events`, one page.
    pub async fn events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> ProviderResult<EventListing> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let mut params = vec![("fields", EVENT_FIELDS.to_string())];
        if let Some(time_min) = query.time_min {
            params.push(("timeMin", time_min.to_rfc3339()));
        }
        if let Some(ref token) = query.page_token {
            params.push(("pageToken", token.clone()));
        }
        if let Some(max) = query.max_results {
            params.push(("maxResults", max.to_string()));
        }

        let page: ApiEventList = self
            .get_json(&url, &params)
            .await
            .operation("list_events")?;
        debug!(
            "calendar {} returned {} events (more pages: {})",
            calendar_id,
            page.items.len(),
            page.next_page_token.is_some()
        );
        Ok(page.into())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> ProviderResult<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                ProviderError::network(message).with_provider(PROVIDER_NAME)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body).with_provider(PROVIDER_NAME));
        }

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e))
                .with_provider(PROVIDER_NAME)
        })?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
                .with_provider(PROVIDER_NAME)
        })
    }
}

/// Maps a non-success status to an error code.
fn status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    use reqwest::StatusCode;

    match status {
        StatusCode::UNAUTHORIZED => {
            ProviderError::authentication("access token expired or invalid")
        }
        StatusCode::FORBIDDEN => ProviderError::authorization(format!("access denied: {}", body)),
        StatusCode::NOT_FOUND => ProviderError::not_found("calendar or resource not found"),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited("rate limit exceeded"),
        _ => ProviderError::server(format!("API error ({}): {}", status, body)),
    }
}

impl CalendarSource for GoogleCalendarClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn get_colors(&self) -> BoxFuture<'_, ProviderResult<ColorPalette>> {
        Box::pin(self.colors())
    }

    fn list_calendar_ids(&self) -> BoxFuture<'_, ProviderResult<Vec<String>>> {
        Box::pin(self.calendar_ids())
    }

    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<EventListing>> {
        Box::pin(self.events(calendar_id, query))
    }
}

/// Response from `GET /colors`.
#[derive(Debug, Deserialize)]
struct ApiColors {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    updated: String,
    #[serde(default)]
    calendar: BTreeMap<String, ApiColor>,
    #[serde(default)]
    event: BTreeMap<String, ApiColor>,
}

#[derive(Debug, Deserialize)]
struct ApiColor {
    #[serde(default)]
    background: String,
    #[serde(default)]
    foreground: String,
}

impl From<ApiColor> for ColorDefinition {
    fn from(color: ApiColor) -> Self {
        Self {
            background: color.background,
            foreground: color.foreground,
        }
    }
}

impl From<ApiColors> for ColorPalette {
    fn from(colors: ApiColors) -> Self {
        Self {
            kind: colors.kind,
            updated: colors.updated,
            calendar: colors
                .calendar
                .into_iter()
                .map(|(id, c)| (id, c.into()))
                .collect(),
            event: colors
                .event
                .into_iter()
                .map(|(id, c)| (id, c.into()))
                .collect(),
        }
    }
}

/// Response from `GET /users/me/calendarList`.
#[derive(Debug, Deserialize)]
struct ApiCalendarList {
    #[serde(default)]
    items: Vec<ApiCalendarListEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiCalendarListEntry {
    id: String,
}

/// Response from `GET /calendars/{id}/events`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventList {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

/// A single event; every field may be absent in a partial response.
#[derive(Debug, Deserialize)]
struct ApiEvent {
    #[serde(default)]
    id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    visibility: String,
    #[serde(default)]
    updated: String,
}

impl From<ApiEvent> for EventRecord {
    fn from(event: ApiEvent) -> Self {
        Self {
            id: event.id,
            summary: event.summary,
            visibility: event.visibility,
            updated: event.updated,
        }
    }
}

impl From<ApiEventList> for EventListing {
    fn from(list: ApiEventList) -> Self {
        Self {
            calendar_summary: list.summary,
            events: list.items.into_iter().map(EventRecord::from).collect(),
            next_page_token: list.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}
