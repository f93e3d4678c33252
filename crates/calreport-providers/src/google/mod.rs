//! Google Calendar API v3 access.
//!
//! - [`GoogleSession`] owns credentials and the token cache and hands out
//!   authenticated [`GoogleCalendarClient`]s
//! - [`OAuthClient`] runs the installed-app consent flow (PKCE, loopback
//!   redirect) and refreshes access tokens
//! - [`GoogleCalendarClient`] implements [`CalendarSource`](crate::CalendarSource)
//!
//! ```ignore
//! use calreport_providers::google::{GoogleConfig, GoogleSession, OAuthCredentials};
//!
//! let credentials = OAuthCredentials::from_file("client_secret.json")?;
//! let session = GoogleSession::new(GoogleConfig::new(credentials))?;
//! let client = session.client().await?;
//! let palette = client.colors().await?;
//! ```

mod auth;
mod client;
mod config;
mod session;
mod tokens;

pub use auth::{parse_callback, Callback, OAuthClient, PkceChallenge, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL};
pub use client::GoogleCalendarClient;
pub use config::{GoogleConfig, OAuthCredentials, CALENDAR_API_BASE};
pub use session::{GoogleSession, TokenSource};
pub use tokens::{StoredToken, TokenCache};
