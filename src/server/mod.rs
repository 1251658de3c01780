//! HTTP front end for the clone proxy.
//!
//! Exposes `POST /api/clone` and `GET /health`. Every error is returned as
//! a JSON `{ "error": ... }` body.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::prediction::PredictionApi;
use crate::proxy::{CloneProxy, CloneRequest, ProxyError};

/// Successful clone response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClonedAudio {
    pub audio_url: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub credential_configured: bool,
}

impl ProxyError {
    /// HTTP status reported to the caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::MissingCredential
            | ProxyError::Rejected(_)
            | ProxyError::JobFailed(_)
            | ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ProxyError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ProxyError::PayloadTooLarge(rejection.body_text())
        } else {
            ProxyError::InvalidRequest(rejection.body_text())
        }
    }
}

/// Build the router serving `proxy`.
///
/// Request bodies are capped at the configured `max_body_bytes`.
pub fn router<A: PredictionApi + 'static>(proxy: CloneProxy<A>) -> Router {
    let body_limit = proxy.config().max_body_bytes;

    Router::new()
        .route(
            "/api/clone",
            post(clone_voice::<A>).fallback(method_not_allowed),
        )
        .route("/health", get(health::<A>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(Arc::new(proxy))
}

async fn clone_voice<A: PredictionApi + 'static>(
    State(proxy): State<Arc<CloneProxy<A>>>,
    payload: Result<Json<CloneRequest>, JsonRejection>,
) -> Result<Json<ClonedAudio>, ProxyError> {
    // Configuration errors take precedence over a bad body.
    proxy.credential()?;

    let Json(request) = payload?;
    let audio_url = proxy.clone_voice(&request).await?;

    Ok(Json(ClonedAudio { audio_url }))
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: "Method Not Allowed".to_string(),
        }),
    )
}

async fn health<A: PredictionApi + 'static>(
    State(proxy): State<Arc<CloneProxy<A>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        credential_configured: proxy.config().api_token().is_some(),
    })
}
