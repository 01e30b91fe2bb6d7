/// Authentication endpoints
///
/// This module provides user registration and login:
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a bearer token
///
/// Login failures are deliberately undifferentiated: "no such user" and
/// "wrong password" return the identical 400 response so account existence
/// cannot be probed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskvault_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
///
/// Fields are optional at the serde level so missing input yields the
/// API's own 400 message rather than a body-rejection error.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: Option<String>,

    /// Email address
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,

    /// Password (minimum 6 characters)
    pub password: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Confirmation message
    pub message: String,

    /// ID of the new user
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: Option<String>,

    /// Password
    pub password: Option<String>,
}

/// Public view of a user, returned on login
#[derive(Debug, Serialize)]
pub struct UserView {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token (7-day expiry)
    pub token: String,

    /// The authenticated user
    pub user: UserView,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing field, password too short, invalid email,
///   or a user already exists with that email or username
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    let (Some(username), Some(email), Some(pass)) = (req.username, req.email, req.password) else {
        return Err(ApiError::BadRequest(
            "Username, email, and password are required".to_string(),
        ));
    };

    password::validate_password_length(&pass).map_err(ApiError::BadRequest)?;

    let username = username.trim().to_string();
    let email = email.trim().to_lowercase();

    // One combined lookup for duplicates on either field
    if User::find_by_email_or_username(&state.db, &email, &username)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest(
            "User with this email or username already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&pass)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username,
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Login endpoint
///
/// Authenticates a user and returns a 7-day bearer token.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "alice@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": "uuid", "username": "alice", "email": "alice@example.com" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing field or invalid credentials
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (Some(email), Some(pass)) = (req.email, req.password) else {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let email = email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = password::verify_password(&pass, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let claims = jwt::Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserView {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            username: Some("alice".to_string()),
            email: Some("alice@example.com".to_string()),
            password: Some("secret1".to_string()),
        };
        assert!(req.validate().is_ok());

        let req = RegisterRequest {
            username: Some("al".to_string()), // too short
            email: Some("alice@example.com".to_string()),
            password: Some("secret1".to_string()),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            username: Some("alice".to_string()),
            email: Some("not-an-email".to_string()),
            password: Some("secret1".to_string()),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_missing_fields_pass_derive_validation() {
        // Presence is checked in the handler, not by the derive
        let req = RegisterRequest {
            username: None,
            email: None,
            password: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_response_uses_camel_case_user_id() {
        let response = RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: Uuid::new_v4(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(!json.contains("\"user_id\""));
    }

    #[test]
    fn test_login_response_shape() {
        let response = LoginResponse {
            token: "tok".to_string(),
            user: UserView {
                id: Uuid::new_v4(),
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json["token"].is_string());
        assert_eq!(json["user"]["username"], "alice");
    }
}
