mod auth_support;

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use trakt_device_auth::error::DeviceAuthError;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_support::{client, grant, token_body, CLIENT_ID, CLIENT_SECRET};

async fn mount_pending(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .respond_with(ResponseTemplate::new(400))
        .up_to_n_times(times)
        .with_priority(1)
        .expect(times)
        .mount(server)
        .await;
}

async fn exchange_attempts(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == "/oauth/device/token")
        .count()
}

#[tokio::test]
async fn poll_returns_token_after_pending_responses() {
    let server = MockServer::start().await;
    mount_pending(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .and(body_json(json!({
            "code": "abc",
            "client_id": CLIENT_ID,
            "client_secret": CLIENT_SECRET
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("AT")))
        .expect(1)
        .mount(&server)
        .await;

    let started = Instant::now();
    let token = client(&server)
        .poll_for_token(&grant("abc", 30, 1))
        .await
        .expect("token after approval");

    assert_eq!(token.access_token, "AT");
    assert_eq!(token.expires_at.timestamp(), 1_700_000_000 + 7_776_000);
    assert_eq!(exchange_attempts(&server).await, 3);
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test]
async fn poll_stops_on_denied_after_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .respond_with(ResponseTemplate::new(418))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).poll_for_token(&grant("abc", 30, 1)).await;

    assert!(matches!(result, Err(DeviceAuthError::AccessDenied)));
    assert_eq!(exchange_attempts(&server).await, 1);
}

#[tokio::test]
async fn poll_stops_on_rate_limit_without_retrying() {
    let server = MockServer::start().await;
    mount_pending(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).poll_for_token(&grant("abc", 30, 1)).await;

    assert!(matches!(result, Err(DeviceAuthError::SlowDown)));
    assert_eq!(exchange_attempts(&server).await, 2);
}

#[tokio::test]
async fn poll_reports_deadline_when_never_claimed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let result = client(&server).poll_for_token(&grant("abc", 3, 1)).await;

    assert!(matches!(result, Err(DeviceAuthError::DeadlineExceeded)));
    assert!(exchange_attempts(&server).await <= 3);
}

#[tokio::test]
async fn poll_cancellation_is_not_a_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = client(&server)
        .poll_for_token_with_cancel(&grant("abc", 600, 1), &cancel)
        .await;

    assert!(matches!(result, Err(DeviceAuthError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(3));
}
