/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate HTTP status code with a `{"message": ...}` body, the
/// shape the browser client expects on every failure.
///
/// No retries anywhere: every failure is terminal for the request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400) - missing or malformed input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Invalid login credentials (400)
    ///
    /// Deliberately undifferentiated: "no such user" and "wrong password"
    /// produce the identical response.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Unauthorized (401) - missing/invalid/expired token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (403) - resource not owned by caller
    ///
    /// Not-found on an ownership-filtered lookup is collapsed into this
    /// variant so task ids of other users cannot be probed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found (404) - unknown route
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError(msg) => {
                // Log internal detail but don't expose it to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong!".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                // Unique constraint violations surface as 400, matching the
                // registration duplicate check racing a concurrent insert
                if db_err.constraint().is_some() {
                    return ApiError::BadRequest(
                        "User with this email or username already exists".to_string(),
                    );
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<taskvault_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskvault_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert token errors to API errors
///
/// Every token failure maps to the same 401 message; expired and tampered
/// tokens are indistinguishable to the caller.
impl From<taskvault_shared::auth::jwt::JwtError> for ApiError {
    fn from(_err: taskvault_shared::auth::jwt::JwtError) -> Self {
        ApiError::Unauthorized("Invalid or expired token".to_string())
    }
}

/// Convert validator errors to API errors
///
/// Collapses field errors into one message for the 400 body.
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .iter()
            .flat_map(|(_, errors)| {
                errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string())
                })
            })
            .collect::<Vec<_>>()
            .join("; ");

        ApiError::BadRequest(if message.is_empty() {
            "Validation failed".to_string()
        } else {
            message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::Forbidden("Not allowed to update this task".to_string());
        assert_eq!(err.to_string(), "Forbidden: Not allowed to update this task");

        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InternalError("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_jwt_errors_collapse_to_one_message() {
        use taskvault_shared::auth::jwt::JwtError;

        let from_expired: ApiError = JwtError::Expired.into();
        let from_tampered: ApiError = JwtError::ValidationError("bad signature".into()).into();

        let expired = match from_expired {
            ApiError::Unauthorized(msg) => msg,
            other => panic!("expected Unauthorized, got {}", other),
        };
        let tampered = match from_tampered {
            ApiError::Unauthorized(msg) => msg,
            other => panic!("expected Unauthorized, got {}", other),
        };

        assert_eq!(expired, tampered);
    }
}
