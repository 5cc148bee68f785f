//! Token-based authorization against a Keystone-style identity endpoint
//!
//! A pre-supplied token short-circuits the identity service entirely;
//! otherwise every call to [`AuthorizationClient::get_token`] performs one
//! password-credentials exchange.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::MelangeError;
use crate::transport::DEFAULT_TIMEOUT;

/// Path of the token endpoint, relative to the identity service root
pub const TOKENS_PATH: &str = "/v2.0/tokens";

#[derive(Deserialize)]
struct TokenResponse {
    auth: TokenAuth,
}

#[derive(Deserialize)]
struct TokenAuth {
    token: TokenId,
}

#[derive(Deserialize)]
struct TokenId {
    id: String,
}

/// Client for obtaining `X-AUTH-TOKEN` values
#[derive(Clone)]
pub struct AuthorizationClient {
    http: Client,
    timeout: Duration,
    url: Option<Url>,
    username: Option<String>,
    access_key: Option<String>,
    auth_token: Option<String>,
}

impl AuthorizationClient {
    /// Create a new authorization client
    ///
    /// # Arguments
    /// * `auth_url` - Identity service root (e.g. `http://keystone:5001`); may be
    ///   omitted when `auth_token` is given
    /// * `username` - Account name for password credentials
    /// * `access_key` - Password / API key for password credentials
    /// * `auth_token` - Static token; when present no identity call is ever made
    /// * `timeout` - Per-request timeout for the token exchange
    pub fn new(
        auth_url: Option<&str>,
        username: Option<String>,
        access_key: Option<String>,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MelangeError> {
        let url = auth_url
            .map(|base| Url::parse(base).and_then(|base| base.join(TOKENS_PATH)))
            .transpose()?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MelangeError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            timeout,
            url,
            username,
            access_key,
            auth_token,
        })
    }

    /// Create a client that always returns `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            timeout: DEFAULT_TIMEOUT,
            url: None,
            username: None,
            access_key: None,
            auth_token: Some(token.into()),
        }
    }

    /// Timeout applied to the token exchange
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The resolved token endpoint, if an identity URL was configured
    pub fn token_url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Get a currently valid token
    ///
    /// # Returns
    /// * `Ok(String)` - The static token, or `auth.token.id` from the identity service
    /// * `Err(MelangeError::Auth)` - The identity service answered with status >= 400
    pub async fn get_token(&self) -> Result<String, MelangeError> {
        if let Some(token) = &self.auth_token {
            return Ok(token.clone());
        }

        let url = self
            .url
            .clone()
            .ok_or_else(|| MelangeError::Auth("no auth url or auth token configured".to_string()))?;

        let body = json!({
            "passwordCredentials": {
                "username": self.username,
                "password": self.access_key,
            }
        });

        debug!("requesting token from {}", url);

        let response = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| MelangeError::Connection(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MelangeError::Connection(e.to_string()))?;

        if status.as_u16() >= 400 {
            return Err(MelangeError::Auth(text));
        }

        let token: TokenResponse = serde_json::from_str(&text)?;
        debug!("token acquired");
        Ok(token.auth.token.id)
    }
}

impl fmt::Debug for AuthorizationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationClient")
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("username", &self.username)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}
