//! Voice-cloning proxy implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::PollPolicy;
use crate::config::ProxyConfig;
use crate::prediction::{
    CreatePrediction, PredictionApi, PredictionError, PredictionJob, PredictionStatus,
};

/// Errors that can occur while serving a clone request.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("API token is not configured on the server.")]
    MissingCredential,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// The service refused to create the prediction.
    #[error("{0}")]
    Rejected(String),

    /// The prediction reached a failed or canceled state.
    #[error("{0}")]
    JobFailed(String),

    #[error("Prediction did not finish after {attempts} polls")]
    TimedOut { attempts: u32 },

    #[error("Server error: {0}")]
    Upstream(#[from] PredictionError),
}

/// A voice-cloning request as sent by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloneRequest {
    pub text: String,
    pub language: String,
    /// Reference voice sample as a data URL.
    pub audio_data_url: String,
}

/// Runs clone requests against the prediction service.
pub struct CloneProxy<A: PredictionApi> {
    api: A,
    config: ProxyConfig,
}

impl<A: PredictionApi> CloneProxy<A> {
    /// Create a new proxy.
    pub fn new(api: A, config: ProxyConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The service credential, or [`ProxyError::MissingCredential`].
    pub fn credential(&self) -> Result<&str, ProxyError> {
        self.config
            .api_token()
            .ok_or(ProxyError::MissingCredential)
    }

    /// Run a clone request to completion and return the audio URL.
    ///
    /// The credential is checked before anything is sent upstream.
    pub async fn clone_voice(&self, request: &CloneRequest) -> Result<String, ProxyError> {
        let token = self.credential()?;

        let prediction = CreatePrediction::new(
            request.text.as_str(),
            request.language.as_str(),
            request.audio_data_url.as_str(),
        )
        .with_version(self.config.model_version.as_str());

        let job = self
            .api
            .create(token, &prediction)
            .await
            .map_err(|e| match e {
                PredictionError::Rejected { status, detail } => {
                    warn!(status, %detail, "Prediction rejected");
                    ProxyError::Rejected(detail)
                }
                other => ProxyError::Upstream(other),
            })?;

        info!(prediction_id = %job.id, language = %request.language, "Prediction created");

        let status_url = job.status_url().ok_or_else(|| {
            PredictionError::InvalidResponse("Prediction has no status URL".to_string())
        })?;

        let job = self.wait_for_completion(token, status_url).await?;

        match job.status {
            PredictionStatus::Succeeded => {
                let audio_url = job.audio_url().ok_or_else(|| {
                    PredictionError::InvalidResponse(
                        "Prediction succeeded without an audio URL".to_string(),
                    )
                })?;
                info!(
                    prediction_id = %job.id,
                    run_time_ms = job.run_time().map(|d| d.num_milliseconds()),
                    "Prediction succeeded"
                );
                Ok(audio_url.to_string())
            }
            PredictionStatus::Failed => {
                warn!(prediction_id = %job.id, error = ?job.error, "Prediction failed");
                Err(ProxyError::JobFailed(
                    job.error.unwrap_or_else(|| "Prediction failed".to_string()),
                ))
            }
            PredictionStatus::Canceled => {
                warn!(prediction_id = %job.id, "Prediction canceled");
                Err(ProxyError::JobFailed(
                    job.error
                        .unwrap_or_else(|| "Prediction was canceled".to_string()),
                ))
            }
            // wait_for_completion only returns terminal jobs.
            PredictionStatus::Starting | PredictionStatus::Processing => {
                Err(PredictionError::InvalidResponse(format!(
                    "Prediction is still {:?}",
                    job.status
                ))
                .into())
            }
        }
    }

    /// Poll `status_url` until the job is terminal or the poll budget runs out.
    ///
    /// Every poll is preceded by a wait from the configured [`PollPolicy`].
    pub async fn wait_for_completion(
        &self,
        token: &str,
        status_url: &str,
    ) -> Result<PredictionJob, ProxyError> {
        let policy: &PollPolicy = &self.config.poll;

        for (attempt, wait) in policy.intervals().enumerate() {
            tokio::time::sleep(wait).await;

            let job = self.api.fetch(token, status_url).await?;
            debug!(
                prediction_id = %job.id,
                attempt = attempt + 1,
                status = ?job.status,
                "Polled prediction"
            );

            if job.status.is_terminal() {
                return Ok(job);
            }
        }

        warn!(status_url, attempts = policy.max_attempts, "Gave up polling prediction");
        Err(ProxyError::TimedOut {
            attempts: policy.max_attempts,
        })
    }
}
