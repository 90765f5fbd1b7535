//! HTTP implementation of [`ReportBackend`] on top of `reqwest`

use super::{ApiError, CheckoutRequest, RedirectUrl, ReportBackend};
use crate::config::ApiConfig;
use crate::core::models::{Report, Subscription};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    url: &'a str,
    user_id: &'a str,
}

#[derive(Deserialize)]
struct HistoryBody {
    #[serde(default)]
    reports: Option<Vec<Report>>,
}

/// FastAPI-style error payload: `{"detail": "..."}`
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Client for the analysis backend's REST surface
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:8000`)
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|e| {
                logger::warn!("Failed to build HTTP client ({e}); using defaults");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Create a client from the `[api]` config section
    #[must_use]
    pub fn from_config(api: &ApiConfig) -> Self {
        let secs = if api.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            api.timeout_secs
        };
        Self::new(api.base_url.clone(), Duration::from_secs(secs))
    }

    /// API root this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint address by appending path segments to the API root.
    /// Segments are percent-encoded, so opaque ids cannot escape the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ApiError::NetworkOrServerError(format!("invalid API root '{}': {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::NetworkOrServerError(format!(
                    "API root '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Extract the backend's `detail` message from an error response
    async fn detail(response: Response) -> Option<String> {
        let body = response.json::<ErrorBody>().await.ok()?;
        match body.detail? {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        }
    }

    async fn server_error(response: Response) -> ApiError {
        let status = response.status();
        let detail = Self::detail(response).await;
        ApiError::NetworkOrServerError(detail.map_or_else(
            || format!("server responded with {status}"),
            |d| format!("{status}: {d}"),
        ))
    }
}

#[async_trait]
impl ReportBackend for HttpBackend {
    async fn analyze(&self, url: &str, user_id: &str) -> Result<Report, ApiError> {
        let endpoint = self.endpoint(&["analyze"])?;
        logger::debug!("POST {endpoint} url={url} user={user_id}");

        let response = self
            .client
            .post(endpoint)
            .json(&AnalyzeBody { url, user_id })
            .send()
            .await
            .map_err(|e| {
                logger::warn!("Analyze request failed: {e}");
                ApiError::analysis_failed(None)
            })?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::QuotaExceeded);
        }
        if !status.is_success() {
            let detail = Self::detail(response).await;
            logger::warn!("Analyze rejected with {status}: {detail:?}");
            return Err(ApiError::analysis_failed(detail));
        }

        let mut report = response.json::<Report>().await.map_err(|e| {
            logger::warn!("Analyze response could not be decoded: {e}");
            ApiError::analysis_failed(None)
        })?;
        report.stamp(url, chrono::Utc::now());
        Ok(report)
    }

    async fn list_history(&self, user_id: &str) -> Result<Vec<Report>, ApiError> {
        let endpoint = self.endpoint(&["history"])?;
        logger::debug!("GET {endpoint} user={user_id}");

        let response = self
            .client
            .get(endpoint)
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let body: Option<HistoryBody> = serde_json::from_str(&text)
            .map_err(|e| ApiError::NetworkOrServerError(format!("bad history payload: {e}")))?;
        Ok(body.and_then(|b| b.reports).unwrap_or_default())
    }

    async fn get_report(&self, id: &str, user_id: &str) -> Result<Report, ApiError> {
        let endpoint = self.endpoint(&["report", id])?;
        logger::debug!("GET {endpoint} user={user_id}");

        let response = self
            .client
            .get(endpoint)
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => return Err(ApiError::NotFound),
            s if !s.is_success() => return Err(Self::server_error(response).await),
            _ => {}
        }

        let report: Option<Report> = response
            .json()
            .await
            .map_err(|e| ApiError::NetworkOrServerError(format!("bad report payload: {e}")))?;
        report.ok_or(ApiError::NotFound)
    }

    async fn get_subscription(&self, user_id: &str) -> Result<Subscription, ApiError> {
        let endpoint = self.endpoint(&["subscription"])?;
        logger::debug!("GET {endpoint} user={user_id}");

        let response = self
            .client
            .get(endpoint)
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }
        Ok(response.json::<Subscription>().await?)
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<RedirectUrl, ApiError> {
        let endpoint = self.endpoint(&["billing", "create-checkout-session"])?;
        logger::debug!("POST {endpoint} user={}", request.user_id);

        let response = self.client.post(endpoint).json(request).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }
        Ok(response.json::<RedirectUrl>().await?)
    }

    async fn create_portal_session(
        &self,
        user_id: &str,
        return_url: &str,
    ) -> Result<RedirectUrl, ApiError> {
        let endpoint = self.endpoint(&["billing", "portal"])?;
        logger::debug!("POST {endpoint} user={user_id}");

        let response = self
            .client
            .post(endpoint)
            .query(&[("user_id", user_id), ("return_url", return_url)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }
        Ok(response.json::<RedirectUrl>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_segments_to_root() {
        let backend = HttpBackend::new("http://localhost:8000/api/", Duration::from_secs(1));
        let url = backend.endpoint(&["report", "abc123"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/report/abc123");
    }

    #[test]
    fn endpoint_encodes_opaque_ids() {
        let backend = HttpBackend::new("http://localhost:8000", Duration::from_secs(1));
        let url = backend.endpoint(&["report", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/report/a%2Fb%20c");
    }

    #[test]
    fn invalid_root_is_a_server_error() {
        let backend = HttpBackend::new("not a url", Duration::from_secs(1));
        assert!(matches!(
            backend.endpoint(&["history"]),
            Err(ApiError::NetworkOrServerError(_))
        ));
    }
}
