//! HTTP client for the prediction service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::PredictionApi;
use super::types::{ApiErrorBody, CreatePrediction, PredictionError, PredictionJob};

/// Default Replicate API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.replicate.com";

/// Default limit for a single request, including reading the body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default limit for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based prediction client.
#[derive(Clone)]
pub struct HttpPredictionClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPredictionClient {
    /// Create a new client for the service at `base_url`.
    ///
    /// Every request is bounded by `request_timeout`; a timed-out request
    /// surfaces as [`PredictionError::ConnectionFailed`].
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| PredictionError::RequestFailed(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Get the base URL for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn predictions_url(&self) -> String {
        format!("{}/v1/predictions", self.base_url)
    }
}

/// Timeouts can fire while the body is still streaming in.
fn body_error(e: reqwest::Error) -> PredictionError {
    if e.is_timeout() {
        PredictionError::ConnectionFailed(e.to_string())
    } else {
        PredictionError::InvalidResponse(e.to_string())
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionClient {
    async fn create(
        &self,
        token: &str,
        request: &CreatePrediction,
    ) -> Result<PredictionJob, PredictionError> {
        let response = self
            .client
            .post(self.predictions_url())
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| PredictionError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::CREATED {
            // Error bodies are not always JSON; fall back to the status line.
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(PredictionError::Rejected {
                status: status.as_u16(),
                detail: body
                    .detail
                    .or(body.title)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        response.json().await.map_err(body_error)
    }

    async fn fetch(&self, token: &str, status_url: &str) -> Result<PredictionJob, PredictionError> {
        let response = self
            .client
            .get(status_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PredictionError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PredictionError::RequestFailed(format!(
                "Status: {}",
                response.status()
            )));
        }

        response.json().await.map_err(body_error)
    }
}
