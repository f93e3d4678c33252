//! Client error types.

use std::fmt;

use calreport_core::FreshnessError;
use calreport_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Calendar API or authentication error.
    Provider(ProviderError),
    /// Report data could not be processed.
    Report(FreshnessError),
    /// IO error.
    Io(std::io::Error),
    /// A command failed; `context` names what was being done.
    Command {
        context: String,
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Wraps this error with the operation that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Command {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(err) => write!(f, "{}", err),
            Self::Report(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Command { context, source } => write!(f, "{}: {}", context, source),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Report(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Command { source, .. } => Some(source.as_ref()),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<FreshnessError> for ClientError {
    fn from(err: FreshnessError) -> Self {
        Self::Report(err)
    }
}

/// Adds operation context to a failed result.
pub trait ResultExt<T> {
    fn context<F>(self, context: F) -> ClientResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ClientError>,
{
    fn context<F>(self, context: F) -> ClientResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().context(context()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn context_prefixes_message() {
        let err = ClientError::from(ProviderError::not_found("no such calendar").with_provider("google"))
            .context("failed to show events for 'cal'");
        assert_eq!(
            err.to_string(),
            "failed to show events for 'cal': [google] not_found: no such calendar"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn result_context_is_lazy_on_success() {
        let ok: Result<u8, ProviderError> = Ok(1);
        let value = ok
            .context(|| unreachable!("context built for a successful result"))
            .unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn config_error_display() {
        let err = ClientError::Config("missing client_id".to_string());
        assert_eq!(err.to_string(), "configuration error: missing client_id");
    }
}
