//! Flickr REST client
//!
//! Thin wrapper over one HTTP endpoint: every call is a GET against the
//! REST URL with `method`, auth and format parameters, executed through the
//! retry primitive in [`crate::fetcher::retry`]. Responses are classified
//! before deserialization: HTTP 429 and Flickr error code 105 are rate
//! limits (retryable), 5xx and transport failures are transient, any other
//! API error or a structurally malformed body fails immediately.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::RetryPolicy;
use crate::fetcher::envelope::{LoginResponse, PhotosEnvelope, PopularPhotosResponse, RestStatus};
use crate::fetcher::retry::call_with_retry;
use crate::fetcher::{FetcherError, FetcherResult, PageSource};

/// Default Flickr REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.flickr.com/services/rest";

/// Flickr error code signalling a rate limit.
const RATE_LIMIT_ERROR_CODE: i64 = 105;

/// Pre-obtained credentials, treated as an opaque capability.
///
/// Obtaining the token (interactive OAuth flow) is out of scope; both
/// values are forwarded as query parameters unchanged.
#[derive(Debug, Clone)]
pub struct AuthContext {
    api_key: String,
    oauth_token: String,
}

impl AuthContext {
    /// Create an auth context from an API key and access token.
    pub fn new(api_key: impl Into<String>, oauth_token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            oauth_token: oauth_token.into(),
        }
    }
}

/// The supported remote operations.
///
/// An explicit enum rather than a dotted method string: unknown operations
/// are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    /// `flickr.stats.getPopularPhotos`
    GetPopularPhotos,
    /// `flickr.test.login`
    TestLogin,
}

impl ApiMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::GetPopularPhotos => "flickr.stats.getPopularPhotos",
            ApiMethod::TestLogin => "flickr.test.login",
        }
    }
}

impl std::fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP client for the Flickr REST API.
pub struct FlickrHttpClient {
    client: reqwest::Client,
    base_url: String,
    auth: AuthContext,
    retry: RetryPolicy,
}

impl FlickrHttpClient {
    /// Create a client against the default endpoint.
    pub fn new(auth: AuthContext, retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            auth,
            retry,
        }
    }

    /// Override the REST endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute one API method with retry/backoff and decode the response.
    pub async fn call<T>(&self, method: ApiMethod, params: &[(&str, String)]) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        call_with_retry(&self.retry, method.as_str(), || self.attempt(method, params)).await
    }

    /// Verify the configured credentials with `flickr.test.login`.
    pub async fn verify_credentials(&self) -> FetcherResult<LoginResponse> {
        self.call(ApiMethod::TestLogin, &[]).await
    }

    async fn attempt<T>(&self, method: ApiMethod, params: &[(&str, String)]) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let mut query: Vec<(&str, String)> = vec![
            ("method", method.as_str().to_string()),
            ("api_key", self.auth.api_key.clone()),
            ("oauth_token", self.auth.oauth_token.clone()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
        ];
        query.extend(params.iter().map(|(k, v)| (*k, v.clone())));

        debug!(%method, params = params.len(), "GET {}", self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetcherError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(FetcherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(FetcherError::ServerError(status.as_u16()));
        }
        if status.is_client_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetcherError::HttpError(format!(
                "client error {status}: {text}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetcherError::NetworkError(e.to_string()))?;
        decode_body(&body)
    }
}

#[async_trait]
impl PageSource for FlickrHttpClient {
    async fn popular_page(
        &self,
        date: NaiveDate,
        page: u32,
        per_page: u32,
    ) -> FetcherResult<PhotosEnvelope> {
        let params = [
            ("date", date.format("%Y-%m-%d").to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        let response: PopularPhotosResponse =
            self.call(ApiMethod::GetPopularPhotos, &params).await?;
        Ok(response.photos)
    }
}

/// Classify and decode one response body.
///
/// A `stat:"ok"` body that fails typed deserialization is a malformed
/// success response and is never retried.
pub(crate) fn decode_body<T>(body: &str) -> FetcherResult<T>
where
    T: DeserializeOwned,
{
    let status: RestStatus = serde_json::from_str(body)
        .map_err(|e| FetcherError::MalformedResponse(format!("unparseable body: {e}")))?;

    match status.stat.as_str() {
        "ok" => serde_json::from_str(body).map_err(|e| {
            FetcherError::MalformedResponse(format!("missing expected fields: {e}"))
        }),
        "fail" => {
            let code = status.code.unwrap_or(0);
            let message = status.message.unwrap_or_default();
            if code == RATE_LIMIT_ERROR_CODE || message.to_lowercase().contains("rate limit") {
                Err(FetcherError::RateLimitExceeded)
            } else {
                Err(FetcherError::ApiError { code, message })
            }
        }
        other => Err(FetcherError::MalformedResponse(format!(
            "unexpected stat value: {other}"
        ))),
    }
}
