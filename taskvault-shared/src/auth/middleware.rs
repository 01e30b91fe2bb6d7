/// Authentication middleware for Axum
///
/// This module provides the authorization gate protecting all task routes.
/// The middleware extracts a bearer token from the `Authorization` header,
/// validates it, and adds the caller's identity to request extensions.
///
/// Both raw tokens and the `Bearer `-prefixed form are accepted.
///
/// # Request Extensions
///
/// After successful authentication, the middleware adds:
/// - `AuthUser`: the authenticated user's id
///
/// # Example
///
/// ```no_run
/// use axum::{Extension, Router, routing::get};
/// use taskvault_shared::auth::middleware::AuthUser;
///
/// async fn protected_handler(Extension(auth): Extension<AuthUser>) -> String {
///     format!("Hello, user {}!", auth.id)
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::validate_token;

/// Identity attached to the request after successful authentication
///
/// Handlers extract it with Axum's `Extension` extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Authenticated user ID
    pub id: Uuid,
}

/// Error type for the authorization gate
///
/// Every failure maps to 401. Beyond token presence, clients cannot tell
/// a malformed token from a tampered or expired one.
#[derive(Debug)]
pub enum AuthError {
    /// No token in the Authorization header
    MissingToken,

    /// Token failed validation (malformed, tampered, or expired)
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "No token provided",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
    }
}

/// Extracts the token from an Authorization header value
///
/// Accepts `Bearer <token>` and a bare `<token>`.
fn extract_bearer(header_value: &str) -> Option<&str> {
    let token = header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Bearer token authentication middleware
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - Authorization header is missing or empty
/// - Token validation fails for any reason
pub async fn bearer_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = extract_bearer(auth_header).ok_or(AuthError::MissingToken)?;

    let claims = validate_token(token, &secret).map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        AuthError::InvalidToken
    })?;

    req.extensions_mut().insert(AuthUser { id: claims.sub });

    Ok(next.run(req).await)
}
