use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Lifecycle status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "TODO")]
    #[sqlx(rename = "TODO")]
    Todo,
    #[serde(rename = "IN_PROGRESS")]
    #[sqlx(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    #[sqlx(rename = "COMPLETED")]
    Completed,
}

/// Priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    #[serde(rename = "LOW")]
    #[sqlx(rename = "LOW")]
    Low,
    #[default]
    #[serde(rename = "MEDIUM")]
    #[sqlx(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    #[sqlx(rename = "HIGH")]
    High,
}

/// A task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the task. Ownership is set at creation
    /// and never changes.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task. Status and priority fall back to their
/// defaults (TODO / MEDIUM) when omitted.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be less than 5000 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Deserializes a field that must distinguish "absent" from "explicit null".
///
/// `None` means the field was not present in the payload at all; `Some(None)`
/// means the client sent `null` and wants the stored value cleared.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial-update payload. Only fields present in the JSON body are applied;
/// `description` and `dueDate` are nullable and use the double-`Option`
/// encoding so `null` clears them while absence leaves them untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_task"))]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    /// True when the payload carries no field at all, in which case an update
    /// is a no-op and the stored task is returned unchanged.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

fn validate_update_task(request: &UpdateTaskRequest) -> Result<(), ValidationError> {
    if let Some(Some(description)) = &request.description {
        if description.chars().count() > 5000 {
            return Err(ValidationError::new(
                "Description must be less than 5000 characters",
            ));
        }
    }
    Ok(())
}

/// Sort keys accepted by the task list endpoint. Each maps to exactly one
/// column; anything else is rejected at deserialization.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueDate,
    Title,
    Priority,
    Status,
}

impl TaskSortBy {
    pub fn column(&self) -> &'static str {
        match self {
            TaskSortBy::CreatedAt => "created_at",
            TaskSortBy::UpdatedAt => "updated_at",
            TaskSortBy::DueDate => "due_date",
            TaskSortBy::Title => "title",
            TaskSortBy::Priority => "priority",
            TaskSortBy::Status => "status",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Query parameters for listing tasks. Out-of-range `page`/`limit` values are
/// rejected by validation rather than clamped.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: i64,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,

    #[serde(default)]
    pub sort_by: TaskSortBy,

    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            status: None,
            priority: None,
            search: None,
            sort_by: TaskSortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Aggregate status counts for one user's tasks.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: i64,
    pub todo: i64,
    pub in_progress: i64,
    pub completed: i64,
}

impl Task {
    /// Builds a new `Task` from a create payload and the owning user's id,
    /// applying the TODO/MEDIUM defaults and stamping both timestamps.
    pub fn new(input: CreateTaskRequest, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            due_date: input.due_date,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_task_defaults_on_creation() {
        let input: CreateTaskRequest = serde_json::from_value(json!({"title": "T"})).unwrap();
        assert!(input.validate().is_ok());

        let user_id = Uuid::new_v4();
        let task = Task::new(input, user_id);
        assert_eq!(task.title, "T");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.user_id, user_id);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_create_task_validation() {
        let empty_title: CreateTaskRequest = serde_json::from_value(json!({"title": ""})).unwrap();
        assert!(empty_title.validate().is_err());

        let long_title: CreateTaskRequest =
            serde_json::from_value(json!({"title": "a".repeat(256)})).unwrap();
        assert!(long_title.validate().is_err());

        let long_description: CreateTaskRequest = serde_json::from_value(json!({
            "title": "ok",
            "description": "b".repeat(5001)
        }))
        .unwrap();
        assert!(long_description.validate().is_err());

        let valid: CreateTaskRequest = serde_json::from_value(json!({
            "title": "a".repeat(255),
            "description": "b".repeat(5000),
            "status": "IN_PROGRESS",
            "priority": "HIGH"
        }))
        .unwrap();
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_status_and_priority_wire_names() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("IN_PROGRESS")
        );
        assert_eq!(
            serde_json::to_value(TaskPriority::Medium).unwrap(),
            json!("MEDIUM")
        );
        let status: TaskStatus = serde_json::from_value(json!("COMPLETED")).unwrap();
        assert_eq!(status, TaskStatus::Completed);
        assert!(serde_json::from_value::<TaskStatus>(json!("DONE")).is_err());
    }

    #[test]
    fn test_partial_update_distinguishes_absent_from_null() {
        // Field absent entirely.
        let absent: UpdateTaskRequest = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert!(absent.description.is_none());
        assert!(absent.due_date.is_none());

        // Field present with explicit null: clear it.
        let cleared: UpdateTaskRequest =
            serde_json::from_value(json!({"description": null, "dueDate": null})).unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.due_date, Some(None));

        // Field present with a value.
        let set: UpdateTaskRequest =
            serde_json::from_value(json!({"description": "notes"})).unwrap();
        assert_eq!(set.description, Some(Some("notes".to_string())));
    }

    #[test]
    fn test_empty_update_detected() {
        let empty: UpdateTaskRequest = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
        assert!(empty.validate().is_ok());

        let not_empty: UpdateTaskRequest =
            serde_json::from_value(json!({"status": "COMPLETED"})).unwrap();
        assert!(!not_empty.is_empty());
    }

    #[test]
    fn test_update_description_length_checked_through_double_option() {
        let too_long: UpdateTaskRequest =
            serde_json::from_value(json!({"description": "c".repeat(5001)})).unwrap();
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults_and_bounds() {
        let defaults: TaskListQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(defaults.page, 1);
        assert_eq!(defaults.limit, 10);
        assert_eq!(defaults.sort_by, TaskSortBy::CreatedAt);
        assert_eq!(defaults.sort_order, SortOrder::Desc);
        assert!(defaults.validate().is_ok());

        let zero_page: TaskListQuery = serde_json::from_value(json!({"page": 0})).unwrap();
        assert!(zero_page.validate().is_err());

        let oversized: TaskListQuery = serde_json::from_value(json!({"limit": 101})).unwrap();
        assert!(oversized.validate().is_err());

        let max_limit: TaskListQuery = serde_json::from_value(json!({"limit": 100})).unwrap();
        assert!(max_limit.validate().is_ok());
    }

    #[test]
    fn test_sort_key_columns() {
        assert_eq!(TaskSortBy::CreatedAt.column(), "created_at");
        assert_eq!(TaskSortBy::DueDate.column(), "due_date");
        assert_eq!(TaskSortBy::Title.column(), "title");
        assert_eq!(SortOrder::Asc.sql(), "ASC");
        assert_eq!(SortOrder::Desc.sql(), "DESC");

        let sort_by: TaskSortBy = serde_json::from_value(json!("updatedAt")).unwrap();
        assert_eq!(sort_by, TaskSortBy::UpdatedAt);
        assert!(serde_json::from_value::<TaskSortBy>(json!("owner")).is_err());
    }

    #[test]
    fn test_stats_wire_shape() {
        let stats = TaskStats {
            total: 4,
            todo: 1,
            in_progress: 1,
            completed: 2,
        };
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"total": 4, "todo": 1, "inProgress": 1, "completed": 2})
        );
    }
}
