//! Communication with the asynchronous prediction service.
//!
//! Provides the trait and HTTP implementation used to create prediction
//! jobs on Replicate and read back their state.

mod client;
mod types;

pub use client::{
    DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, HttpPredictionClient,
};
pub use types::{
    ApiErrorBody, CloneInput, CreatePrediction, PredictionError, PredictionJob, PredictionStatus,
    PredictionUrls, XTTS_V2_VERSION,
};

use async_trait::async_trait;

/// Trait for prediction service communication.
///
/// This trait abstracts the HTTP calls to the prediction service,
/// allowing for mock implementations in tests. The credential is passed
/// per call so that callers decide when it is checked.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Submit a new prediction job.
    ///
    /// Succeeds only when the service acknowledges the job with `201 Created`;
    /// any other status is reported as [`PredictionError::Rejected`].
    async fn create(
        &self,
        token: &str,
        request: &CreatePrediction,
    ) -> Result<PredictionJob, PredictionError>;

    /// Fetch the current state of a job from its status URL.
    async fn fetch(&self, token: &str, status_url: &str) -> Result<PredictionJob, PredictionError>;
}
