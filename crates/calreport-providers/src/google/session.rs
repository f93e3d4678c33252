//! Turns configuration and the token cache into an authenticated client.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{OperationExt, ProviderErrorCode, ProviderResult};

use super::auth::OAuthClient;
use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;
use super::tokens::{StoredToken, TokenCache};

/// What [`GoogleSession::token`] had to do to produce a usable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// The cached access token was still valid.
    Cache,
    /// The cached token was expired and has been refreshed.
    Refreshed,
    /// The user went through the consent flow.
    Authorized,
}

/// Authentication state for one Google account.
#[derive(Debug)]
pub struct GoogleSession {
    config: GoogleConfig,
    cache: TokenCache,
    oauth: OAuthClient,
}

impl GoogleSession {
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate()?;
        let cache = TokenCache::new(&config.token_path);
        let oauth = OAuthClient::new(config.credentials.clone(), config.timeout)?;
        Ok(Self {
            config,
            cache,
            oauth,
        })
    }

    /// Replaces the OAuth client, e.g. to point it at another token endpoint.
    pub fn with_oauth_client(mut self, oauth: OAuthClient) -> Self {
        self.oauth = oauth;
        self
    }

    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    /// Returns a valid token, refreshing or authorizing as needed, and
    /// writes any new token to the cache.
    pub async fn token(&self) -> ProviderResult<(StoredToken, TokenSource)> {
        if let Some(found) = self.cached_token().await? {
            return Ok(found);
        }

        info!("no usable cached token, starting consent flow");
        Ok((self.reauthorize().await?, TokenSource::Authorized))
    }

    /// Returns a valid token without user interaction, refreshing an
    /// expired one. `Ok(None)` means only the consent flow can help: there
    /// is no cached token with the configured scopes, it is expired without
    /// a refresh token, or the token endpoint rejected the refresh token.
    pub async fn cached_token(&self) -> ProviderResult<Option<(StoredToken, TokenSource)>> {
        let Some(token) = self
            .cache
            .load()?
            .filter(|token| token.covers(&self.config.scopes))
        else {
            return Ok(None);
        };

        if !token.is_expired_at(Utc::now()) {
            debug!("using cached access token");
            return Ok(Some((token, TokenSource::Cache)));
        }
        if token.refresh_token.is_none() {
            debug!("cached access token expired and cannot be refreshed");
            return Ok(None);
        }

        debug!("cached access token expired, refreshing");
        match self.oauth.refresh(token).await {
            Ok(token) => {
                self.cache.store(&token)?;
                Ok(Some((token, TokenSource::Refreshed)))
            }
            Err(e) if e.code() == ProviderErrorCode::AuthenticationFailed => {
                warn!("refresh token rejected: {}", e.message());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Runs the consent flow unconditionally and caches the result.
    pub async fn reauthorize(&self) -> ProviderResult<StoredToken> {
        let token = self.authorize_interactively().await?;
        self.cache.store(&token)?;
        Ok(token)
    }

    /// Builds an API client with a valid access token.
    pub async fn client(&self) -> ProviderResult<GoogleCalendarClient> {
        let (token, source) = self.token().await.operation("authenticate")?;
        debug!("access token from {:?}", source);
        Ok(
            GoogleCalendarClient::new(token.access_token, self.config.timeout)?
                .with_base_url(&self.config.api_base),
        )
    }

    async fn authorize_interactively(&self) -> ProviderResult<StoredToken> {
        self.oauth
            .authorize(&self.config.scopes, self.config.loopback_port_range)
            .await
            .operation("authorize")
    }

    /// Removes the cached token.
    pub fn sign_out(&self) -> ProviderResult<()> {
        self.cache.clear().operation("sign_out")
    }
}
