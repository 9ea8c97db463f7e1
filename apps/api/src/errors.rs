use std::any::Any;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::envelope::ErrorEnvelope;
use crate::jobs::store::StoreError;
use crate::jobs::validation::ValidationErrors;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`;
/// every variant renders as the failure envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Route not found")]
    RouteNotFound,

    #[error("Server Error: {0}")]
    Store(#[from] StoreError),

    #[error("Server Error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn job_not_found() -> Self {
        AppError::NotFound("Job not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Store(e) => tracing::error!("Store error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::Validation(e) => tracing::debug!("Rejected payload: {e}"),
            _ => {}
        }

        (status, Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}

/// Fallback for requests that match no route.
pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

/// Converts a handler panic into the 500 envelope. Installed via `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!("Handler panicked: {detail}");

    let body = Json(json!({
        "success": false,
        "error": "Something went wrong!",
        "message": detail
    }));

    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
