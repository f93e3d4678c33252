//! Installed-application OAuth 2.0 flow for Google APIs.
//!
//! The authorization code flow with PKCE (RFC 7636) and a loopback redirect:
//!
//! 1. bind a listener on `127.0.0.1` within the configured port range
//! 2. open the consent page with an S256 code challenge and a random state
//! 3. accept the redirect, check the state, read the authorization code
//! 4. exchange code + verifier for an access token and a refresh token
//!
//! Expired access tokens are renewed with [`OAuthClient::refresh`].

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use rand::Rng as _;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ProviderError, ProviderResult};

use super::config::OAuthCredentials;
use super::tokens::StoredToken;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const CALLBACK_PATH: &str = "/callback";
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

const SUCCESS_PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n\
    <html><body><h1>calreport is authorized</h1><p>You can close this window.</p></body></html>";
const FAILURE_PAGE: &str = "HTTP/1.1 400 Bad Request\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n\
    <html><body><h1>Authorization failed</h1><p>Check the terminal for details.</p></body></html>";

/// PKCE verifier/challenge pair plus the anti-CSRF state.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub verifier: String,
    pub challenge: String,
    pub state: String,
}

impl PkceChallenge {
    pub fn generate() -> Self {
        let verifier = random_token::<32>();
        Self {
            challenge: s256(&verifier),
            verifier,
            state: random_token::<16>(),
        }
    }

    /// Builds the consent page URL.
    pub fn authorization_url(
        &self,
        auth_url: &str,
        client_id: &str,
        redirect_uri: &str,
        scopes: &[String],
    ) -> ProviderResult<Url> {
        let scope = scopes.join(" ");
        Url::parse_with_params(
            auth_url,
            &[
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("code_challenge", self.challenge.as_str()),
                ("code_challenge_method", "S256"),
                ("state", self.state.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| ProviderError::configuration(format!("invalid authorization URL: {}", e)))
    }
}

fn random_token<const N: usize>() -> String {
    let mut bytes = [0u8; N];
    rand::rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn s256(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Talks to Google's OAuth endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
}

impl OAuthClient {
    pub fn new(credentials: OAuthCredentials, timeout: Duration) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            http,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        })
    }

    /// Points the client at a different token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Runs the interactive consent flow and returns the issued token.
    pub async fn authorize(
        &self,
        scopes: &[String],
        port_range: (u16, u16),
    ) -> ProviderResult<StoredToken> {
        let pkce = PkceChallenge::generate();
        let (listener, port) = bind_loopback(port_range).await?;
        let redirect_uri = format!("http://127.0.0.1:{port}{CALLBACK_PATH}");
        let url =
            pkce.authorization_url(&self.auth_url, &self.credentials.client_id, &redirect_uri, scopes)?;

        info!("opening browser for Google consent");
        debug!("authorization URL: {}", url);
        if let Err(e) = open::that(url.as_str()) {
            warn!("failed to open browser: {}", e);
            eprintln!("\nOpen this URL in your browser to authorize calreport:\n\n{url}\n");
        }

        let callback = tokio::time::timeout(CALLBACK_TIMEOUT, accept_callback(&listener))
            .await
            .map_err(|_| ProviderError::authentication("timed out waiting for the OAuth redirect"))??;

        if callback.state != pkce.state {
            return Err(ProviderError::authentication(
                "OAuth state mismatch, refusing the authorization code",
            ));
        }

        info!("received authorization code, exchanging it for tokens");
        let response = self
            .post_token_form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", callback.code.as_str()),
                ("code_verifier", pkce.verifier.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .await?;

        Ok(StoredToken::issued(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            scopes.to_vec(),
            Utc::now(),
        ))
    }

    /// Exchanges the refresh token of `token` for a new access token.
    pub async fn refresh(&self, token: StoredToken) -> ProviderResult<StoredToken> {
        let refresh_token = token.refresh_token.clone().ok_or_else(|| {
            ProviderError::authentication("no refresh token cached, run 'calreport auth'")
        })?;

        let response = self
            .post_token_form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .await?;

        info!("refreshed access token");
        Ok(token.refreshed(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            Utc::now(),
        ))
    }

    async fn post_token_form(&self, params: &[(&str, &str)]) -> ProviderResult<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read token response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
        })
    }
}

async fn bind_loopback(port_range: (u16, u16)) -> ProviderResult<(TcpListener, u16)> {
    for port in port_range.0..=port_range.1 {
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)).await {
            debug!("OAuth redirect listener on port {}", port);
            return Ok((listener, port));
        }
    }
    Err(ProviderError::configuration(format!(
        "no free loopback port in {}-{}",
        port_range.0, port_range.1
    )))
}

/// Code and state carried by the OAuth redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    pub code: String,
    pub state: String,
}

/// Accepts connections until one is the OAuth redirect.
async fn accept_callback(listener: &TcpListener) -> ProviderResult<Callback> {
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| ProviderError::internal(format!("failed to accept redirect: {}", e)))?;
        debug!("redirect connection from {}", peer);

        if let Some(result) = serve_callback(stream).await {
            return result;
        }
    }
}

/// Reads one request; `None` if it is not the callback (e.g. favicon).
async fn serve_callback(mut stream: TcpStream) -> Option<ProviderResult<Callback>> {
    let (read_half, mut write_half) = stream.split();
    let mut request_line = String::new();
    BufReader::new(read_half)
        .read_line(&mut request_line)
        .await
        .ok()?;

    let result = parse_callback(&request_line)?;
    let page = if result.is_ok() { SUCCESS_PAGE } else { FAILURE_PAGE };
    let _ = write_half.write_all(page.as_bytes()).await;
    let _ = write_half.flush().await;
    Some(result)
}

/// Parses `GET /callback?code=..&state=.. HTTP/1.1`.
pub fn parse_callback(request_line: &str) -> Option<ProviderResult<Callback>> {
    let mut parts = request_line.split_whitespace();
    if parts.next() != Some("GET") {
        return None;
    }
    let target = parts.next()?;
    let url = Url::parse(&format!("http://127.0.0.1{target}")).ok()?;
    if url.path() != CALLBACK_PATH {
        return None;
    }

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Some(Err(ProviderError::authentication(format!(
                    "authorization denied: {}",
                    value
                ))));
            }
            _ => {}
        }
    }

    Some(match code {
        Some(code) => Ok(Callback {
            code,
            state: state.unwrap_or_default(),
        }),
        None => Err(ProviderError::authentication(
            "OAuth redirect carried no authorization code",
        )),
    })
}
