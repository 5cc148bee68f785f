//! HTTP transport for the Melange API
//!
//! [`Transport`] is the seam the resource layer talks through; it is a trait
//! so unit tests can swap in [`MockTransport`](crate::mock::MockTransport).
//! [`HttpTransport`] is the reqwest-backed implementation.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method};
use tracing::{debug, trace, warn};

use crate::common::Fields;
use crate::common::query::with_query;
use crate::error::MelangeError;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A single request against the Melange API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute path, without query string (e.g. `/v0.1/ipam/ip_blocks`)
    pub path: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body
    pub body: Option<String>,
    /// Query parameters; unset entries are never sent
    pub params: Fields,
}

impl ApiRequest {
    /// Create a request with no headers, body or parameters
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            params: Fields::new(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a serialized body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach query parameters
    #[must_use]
    pub fn params(mut self, params: Fields) -> Self {
        self.params = params;
        self
    }

    /// Look up a header value (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Path with the encoded query string appended
    pub fn path_and_query(&self) -> String {
        with_query(&self.path, &self.params)
    }
}

/// A successful (status < 400) response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body, possibly empty
    pub body: String,
}

/// Transport collaborator used by [`Resource`](crate::resource::Resource).
///
/// Implementations must map socket-level failures to
/// [`MelangeError::Connection`] and statuses of 400 or above to
/// [`MelangeError::ServiceResponse`] carrying the raw body.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request/response exchange
    async fn do_request(&self, request: ApiRequest) -> Result<ApiResponse, MelangeError>;
}

/// reqwest-backed transport talking to `host:port`
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    /// * `host` - Melange server host name
    /// * `port` - Melange server port
    /// * `use_ssl` - Use `https` instead of `http`
    /// * `timeout` - Per-request timeout
    pub fn new(host: &str, port: u16, use_ssl: bool, timeout: Duration) -> Result<Self, MelangeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MelangeError::Connection(e.to_string()))?;

        let scheme = if use_ssl { "https" } else { "http" };
        Ok(Self {
            client,
            base_url: format!("{scheme}://{host}:{port}"),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn do_request(&self, request: ApiRequest) -> Result<ApiResponse, MelangeError> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            trace!("request body: {}", body);
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| MelangeError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| MelangeError::Connection(e.to_string()))?;

        if status >= 400 {
            warn!("{} {} failed: {}", request.method, request.path, status);
            return Err(MelangeError::ServiceResponse { status, body });
        }

        trace!("response {}: {}", status, body);
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_scheme() {
        let plain = HttpTransport::new("localhost", 9898, false, DEFAULT_TIMEOUT);
        assert!(matches!(plain, Ok(ref t) if t.base_url() == "http://localhost:9898"));

        let tls = HttpTransport::new("melange.example", 443, true, DEFAULT_TIMEOUT);
        assert!(matches!(tls, Ok(ref t) if t.base_url() == "https://melange.example:443"));
    }

    #[test]
    fn test_request_header_lookup_is_case_insensitive() {
        let request = ApiRequest::new(Method::GET, "/v0.1/ipam/ip_blocks")
            .header("X-AUTH-TOKEN", "abc");
        assert_eq!(request.header_value("x-auth-token"), Some("abc"));
        assert_eq!(request.header_value("content-type"), None);
    }

    #[test]
    fn test_path_and_query() {
        let mut params = Fields::new();
        params.insert("used_by_device".to_string(), json!("dev1"));
        let request = ApiRequest::new(Method::GET, "/v0.1/ipam/allocated_ip_addresses").params(params);
        assert_eq!(
            request.path_and_query(),
            "/v0.1/ipam/allocated_ip_addresses?used_by_device=dev1"
        );
    }
}
