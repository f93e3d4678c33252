//! Calendar API access for calreport.
//!
//! - [`CalendarSource`] - the read-only calls the reports are built on
//! - [`collect_all_events`] - follows page tokens across a listing
//! - [`google`] - the Google Calendar implementation, with OAuth and a token cache
//! - [`ProviderError`] - error type tagged with provider and operation
//!
//! ```text
//! ┌────────────────────┐   token    ┌───────────────┐
//! │   GoogleSession    │──────────▶ │ Google OAuth  │
//! └─────────┬──────────┘            └───────────────┘
//!           │ client()
//!           ▼
//! ┌────────────────────┐    HTTPS   ┌───────────────┐
//! │GoogleCalendarClient│──────────▶ │ Calendar API  │
//! └─────────┬──────────┘            └───────────────┘
//!           │ CalendarSource
//!           ▼
//!   ColorPalette / EventListing
//! ```

pub mod error;
pub mod google;
pub mod source;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use source::{collect_all_events, BoxFuture, CalendarSource, EventQuery, MAX_PAGES};
