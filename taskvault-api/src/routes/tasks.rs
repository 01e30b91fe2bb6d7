/// Task CRUD endpoints
///
/// Every handler here sits behind the bearer-token gate and receives the
/// caller's identity via the `AuthUser` request extension. Ownership is
/// enforced by filtering every query on that identity; a task that exists
/// but belongs to someone else is indistinguishable from one that does
/// not exist (both answer 403).
///
/// # Endpoints
///
/// - `POST   /api/tasks`     - Create task
/// - `GET    /api/tasks`     - List own tasks, newest-created first
/// - `PUT    /api/tasks/:id` - Partially update an owned task
/// - `DELETE /api/tasks/:id` - Delete an owned task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use taskvault_shared::{
    auth::middleware::AuthUser,
    models::task::{CreateTask, Task, TaskStatus, UpdateTask},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (required, at most 100 characters)
    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    pub title: Option<String>,

    /// Optional description (at most 500 characters)
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Initial status (defaults to Pending)
    pub status: Option<TaskStatus>,

    /// Deadline (required, must be in the future)
    pub deadline: Option<DateTime<Utc>>,
}

/// Update task request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// New status (any of the three enumerated values)
    pub status: Option<TaskStatus>,

    /// New deadline (must be in the future)
    pub deadline: Option<DateTime<Utc>>,
}

/// Rejects deadlines that are not in the future
fn validate_deadline(deadline: DateTime<Utc>) -> Result<(), ApiError> {
    if deadline <= Utc::now() {
        return Err(ApiError::BadRequest(
            "Deadline must be in the future".to_string(),
        ));
    }
    Ok(())
}

/// Trims a replacement title and rejects one that is empty after trimming
///
/// The derive length check runs on the raw input, so a whitespace-only
/// title would otherwise slip through and blank the stored title.
fn trimmed_title(title: Option<String>) -> Result<Option<String>, ApiError> {
    match title.as_deref().map(str::trim) {
        Some("") => Err(ApiError::BadRequest("Title cannot be empty".to_string())),
        other => Ok(other.map(String::from)),
    }
}

/// Create task endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Write report",
///   "description": "Q3 numbers",
///   "deadline": "2026-09-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: title or deadline missing, too long, or deadline
///   in the past
/// - `401 Unauthorized`: missing or invalid token
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let (Some(title), Some(deadline)) = (req.title, req.deadline) else {
        return Err(ApiError::BadRequest(
            "Title and deadline are required".to_string(),
        ));
    };

    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::BadRequest(
            "Title and deadline are required".to_string(),
        ));
    }

    validate_deadline(deadline)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.id,
            title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            deadline,
        },
    )
    .await?;

    tracing::debug!(user_id = %auth.id, task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks endpoint
///
/// Returns all tasks owned by the caller, newest-created first.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, auth.id).await?;

    Ok(Json(tasks))
}

/// Update task endpoint
///
/// Applies only the fields present in the request body. The lookup is
/// filtered by both task ID and caller identity; no match answers 403
/// whether the task is missing or owned by someone else.
///
/// # Errors
///
/// - `400 Bad Request`: invalid field value
/// - `401 Unauthorized`: missing or invalid token
/// - `403 Forbidden`: task not found under the caller's ownership
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    if let Some(deadline) = req.deadline {
        validate_deadline(deadline)?;
    }

    let update = UpdateTask {
        title: trimmed_title(req.title)?,
        description: req.description,
        status: req.status,
        deadline: req.deadline,
    };

    let task = Task::update_owned(&state.db, task_id, auth.id, update)
        .await?
        .ok_or_else(|| ApiError::Forbidden("Not allowed to update this task".to_string()))?;

    tracing::debug!(user_id = %auth.id, task_id = %task.id, "Task updated");

    Ok(Json(task))
}

/// Delete task endpoint
///
/// Same ownership-filtered lookup as update; a second delete of the same
/// id answers 403.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Task::delete_owned(&state.db, task_id, auth.id).await?;

    if !deleted {
        return Err(ApiError::Forbidden(
            "Not allowed to delete this task".to_string(),
        ));
    }

    tracing::debug!(user_id = %auth.id, task_id = %task_id, "Task deleted");

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_deadline_future() {
        assert!(validate_deadline(Utc::now() + Duration::days(1)).is_ok());
    }

    #[test]
    fn test_validate_deadline_past() {
        let result = validate_deadline(Utc::now() - Duration::days(1));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_create_request_length_limits() {
        let req = CreateTaskRequest {
            title: Some("x".repeat(101)),
            description: None,
            status: None,
            deadline: Some(Utc::now() + Duration::days(1)),
        };
        assert!(req.validate().is_err());

        let req = CreateTaskRequest {
            title: Some("x".repeat(100)),
            description: Some("y".repeat(500)),
            status: None,
            deadline: Some(Utc::now() + Duration::days(1)),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_trimmed_title_rejects_whitespace_only() {
        // Passes the derive length check (untrimmed length >= 1) but must
        // not blank the stored title
        let req: UpdateTaskRequest = serde_json::from_str("{\"title\":\"   \"}").unwrap();
        assert!(req.validate().is_ok());

        let result = trimmed_title(req.title);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_trimmed_title_trims_and_passes_through() {
        assert_eq!(
            trimmed_title(Some("  report  ".to_string())).unwrap(),
            Some("report".to_string())
        );
        assert_eq!(trimmed_title(None).unwrap(), None);
    }

    #[test]
    fn test_update_request_partial_deserialization() {
        let req: UpdateTaskRequest = serde_json::from_str("{\"status\":\"Completed\"}").unwrap();
        assert_eq!(req.status, Some(TaskStatus::Completed));
        assert!(req.title.is_none());
        assert!(req.description.is_none());
        assert!(req.deadline.is_none());
    }

    #[test]
    fn test_update_request_rejects_unknown_status() {
        let result = serde_json::from_str::<UpdateTaskRequest>("{\"status\":\"Archived\"}");
        assert!(result.is_err());
    }
}
