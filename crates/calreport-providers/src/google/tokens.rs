//! On-disk OAuth token cache.
//!
//! The cache is a single JSON file holding the latest [`StoredToken`]. It is
//! written through a temp file and renamed into place, and restricted to the
//! owner on Unix.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Access tokens are treated as expired this long before Google says so.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A cached OAuth token set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl StoredToken {
    /// Builds a token from a token endpoint response received at `now`.
    pub fn issued(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in_secs: Option<i64>,
        scopes: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at: expiry(expires_in_secs, now),
            scopes,
        }
    }

    /// True if the access token is expired at `now`. Tokens without an
    /// expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// True if every scope in `required` was granted.
    pub fn covers(&self, required: &[String]) -> bool {
        required.iter().all(|scope| self.scopes.contains(scope))
    }

    /// Replaces the access token after a refresh. The refresh token is kept
    /// unless the server rotated it.
    pub fn refreshed(
        mut self,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in_secs: Option<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        self.access_token = access_token.into();
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
        self.expires_at = expiry(expires_in_secs, now);
        self
    }
}

fn expiry(expires_in_secs: Option<i64>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    expires_in_secs.map(|secs| now + Duration::seconds(secs - EXPIRY_MARGIN_SECS))
}

/// File-backed token cache.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached token; `Ok(None)` if there is no cache file yet.
    pub fn load(&self) -> ProviderResult<Option<StoredToken>> {
        if !self.path.exists() {
            debug!("no token cache at {}", self.path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to read token cache: {}", e))
        })?;
        let token = serde_json::from_str(&content).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to parse token cache {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("loaded token cache from {}", self.path.display());
        Ok(Some(token))
    }

    /// Writes `token` to the cache file.
    pub fn store(&self, token: &StoredToken) -> ProviderResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::configuration(format!("failed to create token directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(token)
            .map_err(|e| ProviderError::internal(format!("failed to serialize token: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| {
            ProviderError::configuration(format!("failed to write token cache: {}", e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to move token cache into place: {}", e))
        })?;

        debug!("stored token cache at {}", self.path.display());
        Ok(())
    }

    /// Deletes the cache file if it exists.
    pub fn clear(&self) -> ProviderResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                ProviderError::configuration(format!("failed to remove token cache: {}", e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn token() -> StoredToken {
        StoredToken::issued(
            "access",
            Some("refresh".to_string()),
            Some(3600),
            vec!["scope-a".to_string()],
            now(),
        )
    }

    #[test]
    fn expiry_keeps_a_margin() {
        let token = token();
        assert_eq!(
            token.expires_at,
            Some(now() + Duration::seconds(3600 - EXPIRY_MARGIN_SECS))
        );
        assert!(!token.is_expired_at(now()));
        assert!(token.is_expired_at(now() + Duration::seconds(3550)));
    }

    #[test]
    fn token_without_expiry_never_expires() {
        let token = StoredToken::issued("a", None, None, vec![], now());
        assert!(!token.is_expired_at(now() + Duration::days(365)));
    }

    #[test]
    fn scope_coverage() {
        let token = token();
        assert!(token.covers(&["scope-a".to_string()]));
        assert!(!token.covers(&["scope-b".to_string()]));
        assert!(token.covers(&[]));
    }

    #[test]
    fn refresh_keeps_refresh_token_unless_rotated() {
        let later = now() + Duration::hours(2);
        let kept = token().refreshed("access-2", None, Some(3600), later);
        assert_eq!(kept.access_token, "access-2");
        assert_eq!(kept.refresh_token.as_deref(), Some("refresh"));
        assert!(!kept.is_expired_at(later));

        let rotated = token().refreshed("access-3", Some("refresh-2".to_string()), None, later);
        assert_eq!(rotated.refresh_token.as_deref(), Some("refresh-2"));
        assert!(rotated.expires_at.is_none());
    }

    #[test]
    fn cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("nested").join("tokens.json"));

        assert_eq!(cache.load().unwrap(), None);
        cache.store(&token()).unwrap();
        assert_eq!(cache.load().unwrap(), Some(token()));

        cache.clear().unwrap();
        assert!(!cache.path().exists());
        assert_eq!(cache.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn cache_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("tokens.json"));
        cache.store(&token()).unwrap();

        let mode = fs::metadata(cache.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "{not json").unwrap();
        assert!(TokenCache::new(path).load().is_err());
    }
}
