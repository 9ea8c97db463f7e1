use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success body: `{"success": true, "data": ..., "count"?: n}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Failure body: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorEnvelope {
            success: false,
            error: error.into(),
        }
    }
}

/// Serializes as `{}`; the payload of a successful delete.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Empty {}

/// A success envelope paired with its status code.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            status: StatusCode::OK,
            body: Envelope {
                success: true,
                data,
                count: None,
            },
        }
    }

    pub fn created(data: T) -> Self {
        ApiResponse {
            status: StatusCode::CREATED,
            ..ApiResponse::ok(data)
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// List responses carry `count == data.len()`.
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        ApiResponse {
            status: StatusCode::OK,
            body: Envelope {
                success: true,
                data,
                count: Some(count),
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
