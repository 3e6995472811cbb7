//! reqwest-backed implementation of [`UserApi`]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::LOGIN_PATH;
use super::USER_PATH;
use super::UserApi;
use crate::error::ApiError;
use crate::model::Credentials;
use crate::model::User;

/// JSON-over-HTTP client for the dashboard backend.
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use dashboard_lib::api::HttpUserApi;
///
/// let api = HttpUserApi::builder()
///     .base_url("http://localhost:8080")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let user = api.fetch_user().await?;
/// ```
#[derive(Clone)]
pub struct HttpUserApi {
    inner: Arc<HttpUserApiInner>,
}

struct HttpUserApiInner {
    base_url: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpUserApi {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> HttpUserApiBuilder<Missing> {
        HttpUserApiBuilder::new()
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url.trim_end_matches('/'), path)
    }

    fn with_timeout(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        request
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let url = self.endpoint(LOGIN_PATH);
        log::debug!("POST {}", url);

        let request = self.with_timeout(self.inner.http_client.post(&url).json(credentials));
        let response = request.send().await?;

        read_json(response, "Login failed").await
    }

    async fn fetch_user(&self) -> Result<User, ApiError> {
        let url = self.endpoint(USER_PATH);
        log::debug!("GET {}", url);

        let request = self.with_timeout(self.inner.http_client.get(&url));
        let response = request.send().await?;

        read_json(response, "Failed to fetch user").await
    }
}

impl std::fmt::Debug for HttpUserApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUserApi")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

/// Decodes a 2xx JSON body, or maps any other status to `failure`.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    failure: &str,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        log::warn!("{} with HTTP {}", failure, status.as_u16());
        return Err(ApiError::http(status.as_u16(), failure));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`HttpUserApi`].
///
/// The base URL is required and enforced at compile time.
pub struct HttpUserApiBuilder<Url> {
    url: Url,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl HttpUserApiBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the API base URL, e.g. `http://localhost:8080`.
    pub fn base_url(self, url: impl Into<String>) -> HttpUserApiBuilder<Set<String>> {
        HttpUserApiBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for HttpUserApiBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpUserApiBuilder<U> {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Ignored when a custom client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl HttpUserApiBuilder<Set<String>> {
    /// Builds the [`HttpUserApi`], validating the base URL.
    pub fn build(self) -> Result<HttpUserApi, ApiError> {
        let base_url = self.url.0;
        let parsed =
            url::Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(HttpUserApi {
            inner: Arc::new(HttpUserApiInner {
                base_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let api = HttpUserApi::builder()
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(api.endpoint(LOGIN_PATH), "http://localhost:8080/api/login");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpUserApi::builder().base_url("not a url").build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_base_url_rejected() {
        let result = HttpUserApi::builder().base_url("mailto:ops@example.com").build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
