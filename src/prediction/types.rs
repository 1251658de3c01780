//! Prediction service request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coqui XTTS v2 voice-cloning model version on Replicate.
pub const XTTS_V2_VERSION: &str =
    "3495203c3b06c8889a721342a781033230a1334c2a412cb591a6202479e0a6d5";

/// Errors that can occur when communicating with the prediction service.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Job creation was not acknowledged with `201 Created`.
    #[error("Prediction rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Lifecycle state of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    /// Returns true once the prediction can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded | PredictionStatus::Failed | PredictionStatus::Canceled
        )
    }
}

/// Links returned with every prediction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictionUrls {
    pub get: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel: Option<String>,
}

/// A prediction job as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionJob {
    #[serde(default)]
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PredictionJob {
    /// URL to poll for the job's current state.
    pub fn status_url(&self) -> Option<&str> {
        self.urls.as_ref().map(|urls| urls.get.as_str())
    }

    /// Location of the generated audio.
    ///
    /// XTTS returns a single URL; models that return a list yield the first entry.
    pub fn audio_url(&self) -> Option<&str> {
        match self.output.as_ref()? {
            serde_json::Value::String(url) => Some(url),
            serde_json::Value::Array(items) => items.iter().find_map(|v| v.as_str()),
            _ => None,
        }
    }

    /// Wall-clock time the job ran for, when the service reported both ends.
    pub fn run_time(&self) -> Option<chrono::Duration> {
        Some(self.completed_at? - self.created_at?)
    }
}

/// Model input for a voice-cloning prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloneInput {
    pub text: String,
    /// Reference voice as a data URL (base64-encoded audio).
    pub speaker_wav: String,
    pub language: String,
}

/// Body of a prediction creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePrediction {
    pub version: String,
    pub input: CloneInput,
}

impl CreatePrediction {
    /// Create a voice-cloning prediction for the default XTTS v2 version.
    pub fn new(
        text: impl Into<String>,
        language: impl Into<String>,
        speaker_wav: impl Into<String>,
    ) -> Self {
        Self {
            version: XTTS_V2_VERSION.to_string(),
            input: CloneInput {
                text: text.into(),
                speaker_wav: speaker_wav.into(),
                language: language.into(),
            },
        }
    }

    /// Set the model version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Error body returned by the service on rejected requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_prediction_builder() {
        let request = CreatePrediction::new("Hello world", "en", "data:audio/wav;base64,AAAA")
            .with_version("abc123");

        assert_eq!(request.version, "abc123");
        assert_eq!(request.input.text, "Hello world");
        assert_eq!(request.input.language, "en");
        assert_eq!(request.input.speaker_wav, "data:audio/wav;base64,AAAA");
    }

    #[test]
    fn test_create_prediction_defaults_to_xtts() {
        let request = CreatePrediction::new("Hola", "es", "data:");
        assert_eq!(request.version, XTTS_V2_VERSION);
    }

    #[test]
    fn test_create_prediction_serialize() {
        let request = CreatePrediction::new("Hi", "en", "data:x");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["version"], XTTS_V2_VERSION);
        assert_eq!(json["input"]["text"], "Hi");
        assert_eq!(json["input"]["speaker_wav"], "data:x");
        assert_eq!(json["input"]["language"], "en");
    }

    #[test]
    fn test_prediction_job_deserialize_starting() {
        let json = r#"{
            "id": "p1",
            "status": "starting",
            "urls": {
                "get": "https://api.replicate.com/v1/predictions/p1",
                "cancel": "https://api.replicate.com/v1/predictions/p1/cancel"
            },
            "output": null,
            "error": null,
            "created_at": "2024-01-01T00:00:00.123456Z"
        }"#;

        let job: PredictionJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, PredictionStatus::Starting);
        assert_eq!(
            job.status_url(),
            Some("https://api.replicate.com/v1/predictions/p1")
        );
        assert_eq!(job.audio_url(), None);
        assert!(job.run_time().is_none());
    }

    #[test]
    fn test_prediction_job_deserialize_succeeded() {
        let json = r#"{
            "status": "succeeded",
            "output": "https://replicate.delivery/out.wav",
            "created_at": "2024-01-01T00:00:00Z",
            "completed_at": "2024-01-01T00:00:12Z"
        }"#;

        let job: PredictionJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, PredictionStatus::Succeeded);
        assert_eq!(job.audio_url(), Some("https://replicate.delivery/out.wav"));
        assert_eq!(job.run_time(), Some(chrono::Duration::seconds(12)));
    }

    #[test]
    fn test_audio_url_from_list_output() {
        let json = r#"{"status": "succeeded", "output": ["https://a/1.wav", "https://a/2.wav"]}"#;

        let job: PredictionJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.audio_url(), Some("https://a/1.wav"));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!PredictionStatus::Starting.is_terminal());
        assert!(!PredictionStatus::Processing.is_terminal());
        assert!(PredictionStatus::Succeeded.is_terminal());
        assert!(PredictionStatus::Failed.is_terminal());
        assert!(PredictionStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_api_error_body_deserialize() {
        let json = r#"{"title": "Invalid version", "detail": "The specified version does not exist", "status": 422}"#;

        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(
            body.detail.as_deref(),
            Some("The specified version does not exist")
        );
        assert_eq!(body.title.as_deref(), Some("Invalid version"));
    }
}
