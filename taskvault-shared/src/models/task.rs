/// Task model and database operations
///
/// This module provides the Task model, the core entity of TaskVault.
/// Every task is owned by exactly one user and every read/update/delete
/// query carries an ownership filter on `user_id`; there are no post-hoc
/// authorization checks.
///
/// # Status
///
/// ```text
/// Pending → In Progress → Completed
/// ```
///
/// The forward-only progression is a client UI convention. The server
/// accepts any of the three values on update.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('Pending', 'In Progress', 'Completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(100) NOT NULL,
///     description VARCHAR(500),
///     status task_status NOT NULL DEFAULT 'Pending',
///     deadline TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskvault_shared::models::task::{Task, CreateTask, TaskStatus};
/// use chrono::{Duration, Utc};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     user_id,
///     title: "Write report".to_string(),
///     description: None,
///     status: TaskStatus::Pending,
///     deadline: Utc::now() + Duration::days(3),
/// }).await?;
///
/// let mine = Task::list_by_owner(&pool, user_id).await?;
/// assert_eq!(mine.first().map(|t| t.id), Some(task.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Maximum title length in characters
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum description length in characters
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Task status
///
/// Wire format matches the database enum verbatim, including the space in
/// `In Progress`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Not started yet (default for new tasks)
    #[default]
    Pending,

    /// Being worked on
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Status as the wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

/// Task model representing an owned work item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Title, required, at most 100 characters
    pub title: String,

    /// Optional description, at most 500 characters
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Deadline; must be in the future at creation time
    pub deadline: DateTime<Utc>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user
    pub user_id: Uuid,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status
    #[serde(default)]
    pub status: TaskStatus,

    /// Deadline
    pub deadline: DateTime<Utc>,
}

/// Input for partially updating a task
///
/// Only non-None fields are written; everything else is left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New deadline
    pub deadline: Option<DateTime<Utc>>,
}

impl UpdateTask {
    /// True when no field is set; such an update is a no-op write of
    /// `updated_at` only
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.deadline.is_none()
    }
}

impl Task {
    /// Creates a new task owned by `data.user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails (e.g. the owner
    /// row no longer exists)
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, status, deadline)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, status, deadline,
                      created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.deadline)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks owned by `user_id`, newest-created first
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, deadline,
                   created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Partially updates a task, filtered by both task ID and owner
    ///
    /// Only fields present in `data` are written; `updated_at` is always
    /// refreshed. Returns None when no row matched the ownership filter.
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.deadline.is_some() {
            bind_count += 1;
            query.push_str(&format!(", deadline = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, status, deadline, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(user_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(deadline) = data.deadline {
            q = q.bind(deadline);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task, filtered by both task ID and owner
    ///
    /// Returns true if a row was deleted, false when no row matched the
    /// ownership filter.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
