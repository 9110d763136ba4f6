//! HTTP transport for the three device-flow exchanges.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use strum::Display;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::auth::device_code::DeviceCodeGrant;
use crate::auth::poll;
use crate::auth::token::{TokenRecord, WireToken};
use crate::config::{ClientCredentials, DeviceAuthConfig, API_VERSION_HEADER};
use crate::error::DeviceAuthError;
use crate::util::cancel::run_until_cancelled;

/// Redirect URI the API expects for device-flow refreshes.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// One of the three remote exchanges, each with its own status-code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    RequestDeviceCode,
    ExchangeCodeForToken,
    RefreshToken,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Self::RequestDeviceCode => "/oauth/device/code",
            Self::ExchangeCodeForToken => "/oauth/device/token",
            Self::RefreshToken => "/oauth/token",
        }
    }

    /// Map a response status to `Ok` (decode the body) or its classified error.
    pub fn classify(self, status: StatusCode) -> Result<(), DeviceAuthError> {
        use Operation::*;

        match (self, status.as_u16()) {
            (_, 200) => Ok(()),
            (ExchangeCodeForToken, 400) => Err(DeviceAuthError::AuthorizationPending),
            (RefreshToken, 401) => Err(DeviceAuthError::InvalidGrant),
            (_, 403) => Err(DeviceAuthError::Forbidden),
            (ExchangeCodeForToken, 404) => Err(DeviceAuthError::InvalidDeviceCode),
            (ExchangeCodeForToken, 409) => Err(DeviceAuthError::AlreadyApproved),
            (ExchangeCodeForToken, 410) => Err(DeviceAuthError::DeviceCodeExpired),
            (ExchangeCodeForToken, 418) => Err(DeviceAuthError::AccessDenied),
            (ExchangeCodeForToken, 429) => Err(DeviceAuthError::SlowDown),
            (_, 500) => Err(DeviceAuthError::ServerError),
            (_, status @ (503 | 504)) => Err(DeviceAuthError::ServiceOverloaded { status }),
            (_, status @ 520..=522) => Err(DeviceAuthError::EdgeNetwork { status }),
            (operation, status) => Err(DeviceAuthError::UnexpectedStatus { operation, status }),
        }
    }
}

#[derive(Serialize)]
struct DeviceCodeRequest<'a> {
    client_id: &'a str,
}

#[derive(Serialize)]
struct DeviceTokenRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
}

/// Stateless client for the device authorization endpoints.
///
/// Every call is exactly one request/response pair. The `_with_cancel`
/// variants abort the request when the token is cancelled.
///
/// # Example
/// ```no_run
/// use trakt_device_auth::auth::DeviceAuthClient;
/// use trakt_device_auth::config::{ClientCredentials, DeviceAuthConfig};
///
/// # async fn example() -> trakt_device_auth::error::Result<()> {
/// let client = DeviceAuthClient::new(
///     DeviceAuthConfig::default(),
///     ClientCredentials::new("client-id", "client-secret"),
/// )?;
/// let grant = client.request_device_code().await?;
/// println!("Visit {} and enter {}", grant.verification_url, grant.user_code);
/// let token = client.poll_for_token(&grant).await?;
/// println!("expires at {}", token.expires_at);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeviceAuthClient {
    http: reqwest::Client,
    config: DeviceAuthConfig,
    credentials: ClientCredentials,
}

impl DeviceAuthClient {
    pub fn new(
        config: DeviceAuthConfig,
        credentials: ClientCredentials,
    ) -> Result<Self, DeviceAuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                DeviceAuthError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    /// Swap in a preconfigured HTTP client (proxies, custom TLS roots).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn config(&self) -> &DeviceAuthConfig {
        &self.config
    }

    pub async fn request_device_code(&self) -> Result<DeviceCodeGrant, DeviceAuthError> {
        self.request_device_code_with_cancel(&CancellationToken::new())
            .await
    }

    /// Ask the API for a claimable device code.
    pub async fn request_device_code_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DeviceCodeGrant, DeviceAuthError> {
        let body = DeviceCodeRequest {
            client_id: &self.credentials.client_id,
        };
        let grant: DeviceCodeGrant = self
            .post(Operation::RequestDeviceCode, &body, cancel)
            .await?;
        grant.validate()?;
        Ok(grant)
    }

    pub async fn exchange_code_for_token(
        &self,
        grant: &DeviceCodeGrant,
    ) -> Result<TokenRecord, DeviceAuthError> {
        self.exchange_code_for_token_with_cancel(grant, &CancellationToken::new())
            .await
    }

    /// Single exchange attempt. Returns [`DeviceAuthError::AuthorizationPending`]
    /// while the user has not approved the code; prefer
    /// [`poll_for_token`](Self::poll_for_token) unless driving the loop yourself.
    pub async fn exchange_code_for_token_with_cancel(
        &self,
        grant: &DeviceCodeGrant,
        cancel: &CancellationToken,
    ) -> Result<TokenRecord, DeviceAuthError> {
        let body = DeviceTokenRequest {
            code: &grant.device_code,
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
        };
        self.post_token(Operation::ExchangeCodeForToken, &body, cancel)
            .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRecord, DeviceAuthError> {
        self.refresh_token_with_cancel(refresh_token, &CancellationToken::new())
            .await
    }

    /// Trade a refresh token for a new token pair. Only needed once the
    /// access token nears expiry.
    pub async fn refresh_token_with_cancel(
        &self,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenRecord, DeviceAuthError> {
        let body = RefreshTokenRequest {
            refresh_token,
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
            redirect_uri: OOB_REDIRECT_URI,
            grant_type: "refresh_token",
        };
        self.post_token(Operation::RefreshToken, &body, cancel).await
    }

    pub async fn refresh_record(&self, token: &TokenRecord) -> Result<TokenRecord, DeviceAuthError> {
        self.refresh_token(&token.refresh_token).await
    }

    pub async fn poll_for_token(
        &self,
        grant: &DeviceCodeGrant,
    ) -> Result<TokenRecord, DeviceAuthError> {
        poll::poll_for_token(self, grant, &CancellationToken::new()).await
    }

    /// Poll until approval, expiry of the grant, a fatal error, or cancellation.
    pub async fn poll_for_token_with_cancel(
        &self,
        grant: &DeviceCodeGrant,
        cancel: &CancellationToken,
    ) -> Result<TokenRecord, DeviceAuthError> {
        poll::poll_for_token(self, grant, cancel).await
    }

    async fn post_token<B: Serialize>(
        &self,
        operation: Operation,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<TokenRecord, DeviceAuthError> {
        let wire: WireToken = self.post(operation, body, cancel).await?;
        wire.validate()?;
        Ok(TokenRecord::from(wire))
    }

    /// Send one POST and decode a 200 body. The response is dropped (and its
    /// connection released) on every other path.
    async fn post<B, T>(
        &self,
        operation: Operation,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<T, DeviceAuthError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(operation.path());
        debug!(operation = %operation, url = url.as_str(), "sending device auth request");

        let request = self
            .http
            .post(&url)
            .headers(self.request_headers()?)
            .json(body)
            .send();
        let response = run_until_cancelled(cancel, request).await??;

        let status = response.status();
        debug!(operation = %operation, status = status.as_u16(), "device auth response");
        operation.classify(status)?;

        let bytes = run_until_cancelled(cancel, response.bytes()).await??;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn request_headers(&self) -> Result<HeaderMap, DeviceAuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let version = HeaderValue::from_str(&self.config.api_version).map_err(|_| {
            DeviceAuthError::Configuration(format!(
                "invalid API version header value: {}",
                self.config.api_version
            ))
        })?;
        headers.insert(HeaderName::from_static(API_VERSION_HEADER), version);
        Ok(headers)
    }
}
