//! Error types for the HTTP boundary

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::PerceptError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PerceptError> for ServerError {
    fn from(err: PerceptError) -> Self {
        match err {
            // Client-side failures: the request is rejected, the process
            // stays ready.
            PerceptError::Shape { .. } | PerceptError::ImageDecode(_) => {
                ServerError::BadRequest(err.to_string())
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_errors_map_to_bad_request() {
        let err = ServerError::from(PerceptError::Shape {
            expected: "(N, 28, 28)".to_string(),
            actual: "rank-5".to_string(),
        });
        assert!(matches!(err, ServerError::BadRequest(_)));
    }

    #[test]
    fn test_inference_errors_map_to_internal() {
        let err = ServerError::from(PerceptError::Inference("out of memory".to_string()));
        assert!(matches!(err, ServerError::Internal(_)));
    }
}
