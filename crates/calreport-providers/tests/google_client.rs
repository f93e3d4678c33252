//! HTTP-level tests for the Google Calendar client against a mock server.

use std::time::Duration;

use calreport_providers::google::{
    GoogleCalendarClient, GoogleConfig, GoogleSession, OAuthClient, OAuthCredentials, StoredToken,
    TokenCache, TokenSource,
};
use calreport_providers::{collect_all_events, CalendarSource, EventQuery, ProviderErrorCode};
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GoogleCalendarClient {
    GoogleCalendarClient::new("test-token", Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn colors_are_fetched_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/colors"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "calendar#colors",
            "updated": "2012-02-14T00:00:00.000Z",
            "calendar": {"1": {"background": "#ac725e", "foreground": "#1d1d1d"}},
            "event": {"2": {"background": "#7ae7bf", "foreground": "#1d1d1d"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let palette = client(&server).get_colors().await.unwrap();
    assert_eq!(palette.kind, "calendar#colors");
    assert_eq!(palette.event["2"].background, "#7ae7bf");
}

#[tokio::test]
async fn calendar_list_requests_ids_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .and(query_param("fields", "items/id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "me@example.com"}, {"id": "team@example.com"}]
        })))
        .mount(&server)
        .await;

    let ids = client(&server).list_calendar_ids().await.unwrap();
    assert_eq!(ids, vec!["me@example.com", "team@example.com"]);
}

#[tokio::test]
async fn events_query_carries_time_min_and_page_token() {
    let server = MockServer::start().await;
    let cutoff = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();

    Mock::given(method("GET"))
        .and(path("/calendars/team%40example.com/events"))
        .and(query_param("timeMin", "2024-03-09T12:00:00+00:00"))
        .and(query_param("pageToken", "p2"))
        .and(query_param("maxResults", "50"))
        .and(query_param(
            "fields",
            "items(id,updated,summary,visibility),summary,nextPageToken",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Team",
            "items": [{"id": "e1", "updated": "2024-03-10T08:00:00.000Z", "summary": "Retro"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = EventQuery::new()
        .with_time_min(cutoff)
        .with_page_token("p2")
        .with_max_results(50);
    let listing = client(&server)
        .list_events("team@example.com", &query)
        .await
        .unwrap();

    assert_eq!(listing.calendar_summary, "Team");
    assert_eq!(listing.events.len(), 1);
    assert!(!listing.has_more());
}

#[tokio::test]
async fn all_pages_are_collected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(query_param("pageToken", "second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Primary",
            "items": [{"id": "c", "updated": "2024-01-03T00:00:00Z"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Primary",
            "nextPageToken": "second",
            "items": [
                {"id": "a", "updated": "2024-01-01T00:00:00Z"},
                {"id": "b", "updated": "2024-01-02T00:00:00Z"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let listing = collect_all_events(&client, "primary", &EventQuery::new())
        .await
        .unwrap();

    let ids: Vec<_> = listing.events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(listing.next_page_token, None);
}

#[tokio::test]
async fn http_errors_carry_code_provider_and_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/missing/events"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/colors"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client(&server);

    let err = client
        .list_events("missing", &EventQuery::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ProviderErrorCode::NotFound);
    assert_eq!(err.provider(), Some("google"));
    assert_eq!(err.operation(), Some("list_events"));

    let err = client.get_colors().await.unwrap_err();
    assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
    assert_eq!(err.operation(), Some("get_colors"));
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/colors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).get_colors().await.unwrap_err();
    assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
}

#[tokio::test]
async fn refresh_posts_refresh_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let oauth = OAuthClient::new(
        OAuthCredentials::new("demo.apps.googleusercontent.com", "secret"),
        Duration::from_secs(5),
    )
    .unwrap()
    .with_token_url(format!("{}/token", server.uri()));

    let now = Utc::now();
    let mut stale = StoredToken::issued(
        "stale",
        Some("old-refresh".to_string()),
        Some(3600),
        vec![],
        now,
    );
    stale.expires_at = Some(now - chrono::Duration::minutes(5));

    let token = oauth.refresh(stale).await.unwrap();
    assert_eq!(token.access_token, "fresh");
    assert_eq!(token.refresh_token.as_deref(), Some("old-refresh"));
    assert!(!token.is_expired_at(Utc::now()));
}

#[tokio::test]
async fn rejected_refresh_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let oauth = OAuthClient::new(
        OAuthCredentials::new("demo.apps.googleusercontent.com", "secret"),
        Duration::from_secs(5),
    )
    .unwrap()
    .with_token_url(format!("{}/token", server.uri()));

    let token = StoredToken::issued("a", Some("r".to_string()), None, vec![], Utc::now());
    let err = oauth.refresh(token).await.unwrap_err();
    assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
    assert!(err.message().contains("invalid_grant"));
}

#[tokio::test]
async fn session_refreshes_expired_cached_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "renewed",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .and(bearer_token("renewed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "primary"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("tokens.json");
    let mut expired = StoredToken::issued(
        "expired",
        Some("refresh".to_string()),
        None,
        vec![GoogleConfig::READONLY_SCOPE.to_string()],
        Utc::now(),
    );
    expired.expires_at = Some(Utc::now() - chrono::Duration::hours(1));
    TokenCache::new(&token_path).store(&expired).unwrap();

    let credentials = OAuthCredentials::new("demo.apps.googleusercontent.com", "secret");
    let config = GoogleConfig::new(credentials.clone())
        .with_token_path(&token_path)
        .with_api_base(server.uri());
    let oauth = OAuthClient::new(credentials, Duration::from_secs(5))
        .unwrap()
        .with_token_url(format!("{}/token", server.uri()));
    let session = GoogleSession::new(config).unwrap().with_oauth_client(oauth);

    let (token, source) = session.token().await.unwrap();
    assert_eq!(source, TokenSource::Refreshed);
    assert_eq!(token.access_token, "renewed");

    // the refreshed token was written back, so the client reuses it
    let cached = TokenCache::new(&token_path).load().unwrap().unwrap();
    assert_eq!(cached.access_token, "renewed");
    assert_eq!(cached.refresh_token.as_deref(), Some("refresh"));

    let client = session.client().await.unwrap();
    assert_eq!(client.list_calendar_ids().await.unwrap(), vec!["primary"]);
}

#[tokio::test]
async fn revoked_refresh_token_leaves_consent_as_the_only_option() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("tokens.json");
    let mut expired = StoredToken::issued(
        "expired",
        Some("revoked".to_string()),
        None,
        vec![GoogleConfig::READONLY_SCOPE.to_string()],
        Utc::now(),
    );
    expired.expires_at = Some(Utc::now() - chrono::Duration::hours(1));
    TokenCache::new(&token_path).store(&expired).unwrap();

    let credentials = OAuthCredentials::new("demo.apps.googleusercontent.com", "secret");
    let oauth = OAuthClient::new(credentials.clone(), Duration::from_secs(5))
        .unwrap()
        .with_token_url(format!("{}/token", server.uri()));
    let session = GoogleSession::new(GoogleConfig::new(credentials).with_token_path(&token_path))
        .unwrap()
        .with_oauth_client(oauth);

    assert!(session.cached_token().await.unwrap().is_none());
    assert_eq!(
        TokenCache::new(&token_path).load().unwrap(),
        Some(expired)
    );
}

#[tokio::test]
async fn refresh_transport_failure_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("tokens.json");
    let mut expired = StoredToken::issued(
        "expired",
        Some("refresh".to_string()),
        None,
        vec![GoogleConfig::READONLY_SCOPE.to_string()],
        Utc::now(),
    );
    expired.expires_at = Some(Utc::now() - chrono::Duration::hours(1));
    TokenCache::new(&token_path).store(&expired).unwrap();

    let credentials = OAuthCredentials::new("demo.apps.googleusercontent.com", "secret");
    // nothing listens on port 1
    let oauth = OAuthClient::new(credentials.clone(), Duration::from_secs(5))
        .unwrap()
        .with_token_url("http://127.0.0.1:1/token");
    let session = GoogleSession::new(GoogleConfig::new(credentials).with_token_path(&token_path))
        .unwrap()
        .with_oauth_client(oauth);

    let err = session.cached_token().await.unwrap_err();
    assert_eq!(err.code(), ProviderErrorCode::NetworkError);
}
