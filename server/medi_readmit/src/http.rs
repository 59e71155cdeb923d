//! HTTP transport for the inference service.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/predict` | Predict readmission for one patient record |
//! | `GET` | `/health` | Liveness plus artifact load state |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::artifacts::ArtifactStatus;
use crate::service::{InferenceService, ServiceError};

pub type AppState = Arc<InferenceService>;

pub fn router(service: AppState, cors_allow_any_origin: bool) -> Router {
    let app = Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(service);
    if cors_allow_any_origin {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);
        app.layer(cors)
    } else {
        app
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    artifacts: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: msg.into() })).into_response()
}

fn status_for(e: &ServiceError) -> StatusCode {
    match e {
        ServiceError::MalformedRequest(_)
        | ServiceError::MissingFeature(_)
        | ServiceError::InvalidFeatureType(_) => StatusCode::BAD_REQUEST,
        ServiceError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::ReconciliationInternal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `POST /predict`
async fn predict(
    State(service): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            log::debug!("rejected request body: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let outcome = tokio::task::spawn_blocking(move || service.predict(&body)).await;
    match outcome {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(e)) => {
            if e.is_client_error() {
                log::debug!("prediction rejected: {e}");
            } else {
                log::error!("prediction failed: {e}");
            }
            error_response(status_for(&e), e.to_string())
        }
        Err(join) => {
            log::error!("prediction task failed: {join}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "prediction task failed")
        }
    }
}

/// `GET /health`: always 200; artifact trouble is reported, not fatal.
async fn health(State(service): State<AppState>) -> Json<HealthResponse> {
    let (artifacts, detail) = match service.artifact_status() {
        ArtifactStatus::Loaded => ("loaded", None),
        ArtifactStatus::NotLoaded => ("not_loaded", None),
        ArtifactStatus::Degraded(msg) => ("degraded", Some(msg)),
    };
    Json(HealthResponse {
        status: "healthy",
        artifacts,
        detail,
    })
}
