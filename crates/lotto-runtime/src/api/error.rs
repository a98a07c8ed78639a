//! Mapping of pipeline errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lotto_generation::{CombinationError, GenerationError};
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    Generation(GenerationError),
    BadRequest(String),
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        ApiError::Generation(e)
    }
}

impl From<CombinationError> for ApiError {
    fn from(e: CombinationError) -> Self {
        ApiError::Generation(GenerationError::InvalidCombination(e))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "bad_request", message.clone())
            }
            ApiError::Generation(e) => match e {
                GenerationError::Validation { .. } => {
                    (StatusCode::BAD_REQUEST, "validation_error", e.to_string())
                }
                GenerationError::InvalidCombination(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_combination", e.to_string())
                }
                GenerationError::DrawNotFound(_) => {
                    (StatusCode::NOT_FOUND, "draw_not_found", e.to_string())
                }
                // Dependency failures are logged in full but reported
                // generically.
                GenerationError::DataUnavailable(_) | GenerationError::Store(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "data_unavailable",
                    "Draw history is temporarily unavailable".to_string(),
                ),
                GenerationError::GenerationExhausted { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "generation_exhausted",
                    "Could not generate an acceptable batch, try again".to_string(),
                ),
                GenerationError::InvalidConfig(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal configuration error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            if let ApiError::Generation(e) = &self {
                error!(status = status.as_u16(), error = %e, "Request failed");
            }
        }
        (
            status,
            Json(ErrorBody {
                error: ErrorDetail { code, message },
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto_generation::DataError;

    fn status(e: GenerationError) -> StatusCode {
        ApiError::from(e).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status(GenerationError::Validation {
                requested: 0,
                min: 1,
                max: 20
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(GenerationError::InvalidCombination(CombinationError::Duplicate {
                number: 3
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(GenerationError::DrawNotFound(1121)), StatusCode::NOT_FOUND);
        assert_eq!(
            status(GenerationError::DataUnavailable(DataError::Timeout)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(GenerationError::GenerationExhausted {
                slot: 2,
                attempts: 100
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_dependency_details_are_not_exposed() {
        let err = ApiError::from(GenerationError::DataUnavailable(DataError::ConnectionError(
            "postgres://user:pw@db".into(),
        )));
        let (_, code, message) = err.parts();
        assert_eq!(code, "data_unavailable");
        assert!(!message.contains("postgres"));
    }
}
