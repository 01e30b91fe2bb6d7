/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation with a real password hash
/// - Bearer token generation
/// - API client helpers

use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use sqlx::PgPool;
use taskvault_api::app::{build_router, AppState};
use taskvault_api::config::Config;
use taskvault_shared::auth::jwt::{create_token, Claims};
use taskvault_shared::auth::password::hash_password;
use taskvault_shared::models::user::{CreateUser, User};
use uuid::Uuid;

/// Password every test user is created with
pub const TEST_PASSWORD: &str = "secret-password-1";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user and a valid token
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        // Create test user with a real hash so login works too
        let suffix = Uuid::new_v4();
        let user = User::create(
            &db,
            CreateUser {
                username: format!("test-{}", suffix),
                email: format!("test-{}@example.com", suffix),
                password_hash: hash_password(TEST_PASSWORD)?,
            },
        )
        .await?;

        // Generate bearer token
        let claims = Claims::new(user.id);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Creates a second user, for cross-ownership tests
    pub async fn create_other_user(&self) -> anyhow::Result<(User, String)> {
        let suffix = Uuid::new_v4();
        let user = User::create(
            &self.db,
            CreateUser {
                username: format!("other-{}", suffix),
                email: format!("other-{}@example.com", suffix),
                password_hash: hash_password(TEST_PASSWORD)?,
            },
        )
        .await?;

        let claims = Claims::new(user.id);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Delete test user (cascades to their tasks)
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Builds an authenticated JSON request
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Reads a response body as JSON
pub async fn response_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
