//! Command-line interface definition.

use std::path::PathBuf;

use calreport_core::TracingOutputFormat;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::CredentialOverrides;

/// calreport - Google Calendar owner details, events and daily changes
#[derive(Debug, Parser)]
#[command(name = "calreport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALREPORT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// Log filter directives, e.g. `calreport_providers=trace`; overrides
    /// `--debug` and `RUST_LOG`
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    // --- Credential flags ---
    /// OAuth client ID
    #[arg(long, env = "GOOGLE_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "GOOGLE_CLIENT_SECRET", hide_env_values = true, global = true)]
    pub client_secret: Option<String>,

    /// Path to a Google Cloud Console credentials JSON file
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE", global = true)]
    pub credentials_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Credentials given through flags or their environment variables.
    pub fn credential_overrides(&self) -> CredentialOverrides {
        CredentialOverrides {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            credentials_file: self.credentials_file.clone(),
        }
    }
}

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single lines
    Compact,
    /// One JSON object per line
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Compact => TracingOutputFormat::Compact,
            LogFormat::Json => TracingOutputFormat::Json,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the color palette and the ids of your calendars
    ShowOwner,

    /// Show the first page of events of a calendar
    ShowEvents {
        /// Calendar to list, e.g. `primary` or an email address
        calendar_id: String,
    },

    /// Show the events of a calendar updated in the last 24 hours
    ShowDailyUpdatedEvents {
        /// Calendar to report on
        calendar_id: String,
    },

    /// Authorize calreport to read your calendars
    Auth {
        /// Re-run the consent flow even if a token is cached
        #[arg(long)]
        force: bool,

        /// Delete the cached token instead of authorizing
        #[arg(long, conflicts_with = "force")]
        sign_out: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the current configuration
    Dump,
    /// Validate the configuration
    Validate,
    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_show_events_with_calendar_id() {
        let cli = Cli::try_parse_from(["calreport", "show-events", "team@example.com"]).unwrap();
        match cli.command {
            Command::ShowEvents { calendar_id } => assert_eq!(calendar_id, "team@example.com"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn calendar_id_is_required() {
        let err = Cli::try_parse_from(["calreport", "show-daily-updated-events"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "calreport",
            "show-owner",
            "--debug",
            "--log-format",
            "json",
            "--client-id",
            "id.apps.googleusercontent.com",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(
            cli.credential_overrides().client_id.as_deref(),
            Some("id.apps.googleusercontent.com")
        );
    }

    #[test]
    fn auth_force_flag() {
        let cli = Cli::try_parse_from(["calreport", "auth", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Auth {
                force: true,
                sign_out: false
            }
        ));
    }

    #[test]
    fn sign_out_conflicts_with_force() {
        let cli = Cli::try_parse_from(["calreport", "auth", "--sign-out"]).unwrap();
        assert!(matches!(cli.command, Command::Auth { sign_out: true, .. }));

        let err = Cli::try_parse_from(["calreport", "auth", "--sign-out", "--force"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn log_filter_flag() {
        let cli =
            Cli::try_parse_from(["calreport", "show-owner", "--log-filter", "calreport=trace"]).unwrap();
        assert_eq!(cli.log_filter.as_deref(), Some("calreport=trace"));
    }
}
