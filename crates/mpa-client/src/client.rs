//! HTTP client shim for the Manual Purchase Agent API.
//!
//! Wraps `reqwest` with cache-busting and response normalization. Results of
//! the remote API change between identical calls (fresh AI inference), so
//! every request disables caching and every GET carries a timestamp parameter.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use reqwest::{Client, Method, Url};
use serde::Serialize;

use crate::error::ClientError;
use crate::response::NormalizedResponse;

/// Query parameter carrying the cache-busting timestamp on GET requests.
pub const CACHE_BUST_PARAM: &str = "_t";

/// Client for the Manual Purchase Agent REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// Only connecting is bounded in time. AI-backed lookups may run for
    /// minutes, so a request never times out once the connection is up.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(no_cache_headers())
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request and normalizes the outcome. Never fails: transport
    /// errors come back as `success == false` with `status == 0`.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> NormalizedResponse {
        let cache_bust = (method == Method::GET).then(|| chrono::Utc::now().timestamp_millis());
        let url = match self.build_url(path, cache_bust) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(path, error = %e, "could not build request URL");
                return NormalizedResponse::network_error(&e.to_string());
            }
        };

        tracing::debug!(%method, %url, has_body = body.is_some(), "api request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "api request failed before a response");
                return NormalizedResponse::network_error(&e.to_string());
            }
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%method, %url, status = status.as_u16(), error = %e, "could not read response body");
                return NormalizedResponse::network_error(&e.to_string());
            }
        };

        let normalized =
            NormalizedResponse::from_parts(status.as_u16(), &status_text, status.is_success(), &body);

        if normalized.success {
            tracing::debug!(%method, %url, status = normalized.status, "api response");
        } else {
            tracing::warn!(
                %method,
                %url,
                status = normalized.status,
                error = normalized.error.as_deref().unwrap_or(""),
                "api response reported failure"
            );
        }

        normalized
    }

    pub async fn get(&self, path: &str) -> NormalizedResponse {
        self.request::<()>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> NormalizedResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> NormalizedResponse {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> NormalizedResponse {
        self.request::<()>(Method::DELETE, path, None).await
    }

    /// Joins `path` (which may carry its own query string) onto the base URL
    /// and appends the cache-busting timestamp when given.
    fn build_url(&self, path: &str, cache_bust: Option<i64>) -> Result<Url, ClientError> {
        let mut url =
            self.base_url
                .join(path.trim_start_matches('/'))
                .map_err(|e| ClientError::InvalidBaseUrl {
                    base_url: format!("{}{path}", self.base_url),
                    reason: e.to_string(),
                })?;
        if let Some(ts) = cache_bust {
            url.query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &ts.to_string());
        }
        Ok(url)
    }
}

fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
