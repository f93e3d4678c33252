//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calreport/config.toml` by default:
//!
//! ```toml
//! debug = false
//!
//! [google]
//! client_id = "YOUR_ID.apps.googleusercontent.com"
//! client_secret = "YOUR_SECRET"
//! # credentials_file = "~/Downloads/client_secret.json"
//! # token_path = "/path/to/google-tokens.json"
//! # timeout_secs = 30
//!
//! [report]
//! follow_pages = true
//! # max_results = 250
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use calreport_providers::google::{GoogleConfig, OAuthCredentials};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Configuration for the calreport client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Google Calendar settings.
    pub google: Option<GoogleSettings>,

    /// Debug mode.
    pub debug: bool,

    /// Report settings.
    pub report: ReportSettings,
}

/// How the reports query the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Follow page tokens in the daily updated events report.
    pub follow_pages: bool,

    /// Page size requested from the API.
    pub max_results: Option<u32>,
}

/// Largest page size the Calendar API accepts for event listings.
pub const MAX_PAGE_SIZE: u32 = 2500;

impl ReportSettings {
    /// Checks `max_results` against the range the API accepts.
    pub fn validate(&self) -> Result<(), String> {
        match self.max_results {
            Some(max) if max == 0 || max > MAX_PAGE_SIZE => Err(format!(
                "report.max_results must be between 1 and {MAX_PAGE_SIZE}, got {max}"
            )),
            _ => Ok(()),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            follow_pages: true,
            max_results: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if there is
    /// no file there.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!("no config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path, which must exist.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| ClientError::Config(format!("{} in {}", e, path.display())))
    }

    /// Parses and checks the TOML text of a config file.
    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(content).map_err(|e| format!("failed to parse config: {}", e))?;
        config.report.validate()?;
        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calreport")
    }
}

/// Google Calendar settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleSettings {
    /// OAuth client ID.
    pub client_id: Option<String>,

    /// OAuth client secret.
    pub client_secret: Option<String>,

    /// Google Cloud Console credentials JSON, used when the id and secret
    /// are not set inline.
    pub credentials_file: Option<PathBuf>,

    /// Path to token storage.
    pub token_path: Option<PathBuf>,

    /// HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Credentials given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub credentials_file: Option<PathBuf>,
}

impl GoogleSettings {
    /// Builds the provider configuration, letting `overrides` win over
    /// values from `config.toml`.
    pub fn to_provider_config(&self, overrides: &CredentialOverrides) -> ClientResult<GoogleConfig> {
        let credentials = self.resolve_credentials(overrides)?;
        credentials.validate().map_err(|e| {
            ClientError::Config(format!("invalid Google credentials: {}", e.message()))
        })?;

        let mut config = GoogleConfig::new(credentials);
        if let Some(ref path) = self.token_path {
            config = config.with_token_path(path);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Picks credentials in order: an id and secret from the command line,
    /// a credentials file from the command line, then the `[google]` section
    /// (inline values before its `credentials_file`). An id from one place
    /// may be paired with a secret from another.
    pub(crate) fn resolve_credentials(
        &self,
        overrides: &CredentialOverrides,
    ) -> ClientResult<OAuthCredentials> {
        if let (Some(id), Some(secret)) = (&overrides.client_id, &overrides.client_secret) {
            return Ok(OAuthCredentials::new(id, secret));
        }

        if let Some(ref path) = overrides.credentials_file {
            return read_credentials_file(path);
        }

        let id = overrides.client_id.as_ref().or(self.client_id.as_ref());
        let secret = overrides
            .client_secret
            .as_ref()
            .or(self.client_secret.as_ref());
        if let (Some(id), Some(secret)) = (id, secret) {
            return Ok(OAuthCredentials::new(id, secret));
        }

        if let Some(ref path) = self.credentials_file {
            return read_credentials_file(path);
        }

        if id.is_some() {
            return Err(ClientError::Config(
                "client_secret is missing; set it in [google] or pass --client-secret".to_string(),
            ));
        }
        Err(ClientError::Config(format!(
            "Google credentials not found. Add to {}:\n  \
             [google]\n  \
             client_id = \"YOUR_ID.apps.googleusercontent.com\"\n  \
             client_secret = \"YOUR_SECRET\"\n\n  \
             or pass --client-id/--client-secret or --credentials-file",
            ClientConfig::default_path().display()
        )))
    }
}

fn read_credentials_file(path: &Path) -> ClientResult<OAuthCredentials> {
    OAuthCredentials::from_file(path)
        .map_err(|e| ClientError::Config(e.message().to_string()))
}

impl ClientConfig {
    /// Provider configuration from the `[google]` section and `overrides`.
    pub fn google_config(&self, overrides: &CredentialOverrides) -> ClientResult<GoogleConfig> {
        self.google
            .clone()
            .unwrap_or_default()
            .to_provider_config(overrides)
    }
}
