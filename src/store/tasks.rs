//! Task store and query engine.
//!
//! Listing builds one conjunctive WHERE clause shared by the page query and
//! the total count. Sorting always appends `id ASC` as a stable tie-break so
//! pagination stays deterministic across pages when the sort key has
//! duplicates. Mutations run ownership-scoped (`WHERE id = $n AND user_id =
//! $m`) after an explicit existence/ownership check, so `Forbidden` and
//! `NotFound` stay distinguishable while the mutation itself is atomic.

use crate::error::AppError;
use crate::models::{
    CreateTaskRequest, Task, TaskListQuery, TaskStats, TaskStatus, UpdateTaskRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, user_id, created_at, updated_at";

/// Conjunction of the owner filter and whichever optional filters are set.
/// Bind order: user_id, status?, priority?, search pattern twice.
fn filter_clause(query: &TaskListQuery) -> String {
    let mut sql = String::from("WHERE user_id = $1");
    let mut idx = 2;
    if query.status.is_some() {
        sql.push_str(&format!(" AND status = ${}", idx));
        idx += 1;
    }
    if query.priority.is_some() {
        sql.push_str(&format!(" AND priority = ${}", idx));
        idx += 1;
    }
    if query.search.is_some() {
        sql.push_str(&format!(
            " AND (title ILIKE ${} OR description ILIKE ${})",
            idx,
            idx + 1
        ));
    }
    sql
}

fn list_sql(query: &TaskListQuery) -> String {
    format!(
        "SELECT {} FROM tasks {} ORDER BY {} {}, id ASC LIMIT {} OFFSET {}",
        TASK_COLUMNS,
        filter_clause(query),
        query.sort_by.column(),
        query.sort_order.sql(),
        query.limit,
        (query.page - 1) * query.limit
    )
}

fn count_sql(query: &TaskListQuery) -> String {
    format!("SELECT COUNT(*) FROM tasks {}", filter_clause(query))
}

/// Returns the requested page slice and the total count of matching rows,
/// independent of the pagination window. The two queries share the same
/// filters and run concurrently.
pub async fn list(
    pool: &PgPool,
    user_id: Uuid,
    query: &TaskListQuery,
) -> Result<(Vec<Task>, i64), AppError> {
    let select_sql = list_sql(query);
    let total_sql = count_sql(query);
    let search_pattern = query.search.as_ref().map(|s| format!("%{}%", s));

    let mut select = sqlx::query_as::<_, Task>(&select_sql).bind(user_id);
    let mut count = sqlx::query_scalar::<_, i64>(&total_sql).bind(user_id);

    if let Some(status) = query.status {
        select = select.bind(status);
        count = count.bind(status);
    }
    if let Some(priority) = query.priority {
        select = select.bind(priority);
        count = count.bind(priority);
    }
    if let Some(pattern) = &search_pattern {
        select = select.bind(pattern.clone()).bind(pattern.clone());
        count = count.bind(pattern.clone()).bind(pattern.clone());
    }

    let (tasks, total) = tokio::try_join!(select.fetch_all(pool), count.fetch_one(pool))?;
    Ok((tasks, total))
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    input: CreateTaskRequest,
) -> Result<Task, AppError> {
    let task = Task::new(input, user_id);
    let created = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (id, title, description, status, priority, due_date, user_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.due_date)
    .bind(task.user_id)
    .bind(task.created_at)
    .bind(task.updated_at)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

/// Existence is checked before ownership: a task that does not exist at all is
/// `NotFound`, one owned by someone else is `Forbidden`.
pub async fn get_for_user(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .fetch_optional(pool)
    .await?;

    match task {
        None => Err(AppError::NotFound("Task not found".into())),
        Some(task) if task.user_id != user_id => Err(AppError::Forbidden(
            "You do not have access to this task".into(),
        )),
        Some(task) => Ok(task),
    }
}

async fn check_ownership(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let owner: Option<(Uuid,)> =
        sqlx::query_as("SELECT user_id FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(pool)
            .await?;

    match owner {
        None => Err(AppError::NotFound("Task not found".into())),
        Some((owner_id,)) if owner_id != user_id => Err(AppError::Forbidden(
            "You do not have access to this task".into(),
        )),
        Some(_) => Ok(()),
    }
}

/// Applies a partial update. Only fields present in the payload change;
/// `Some(None)` for description/due date clears the column. An empty payload
/// returns the stored task untouched. The UPDATE is scoped by both id and
/// owner; a zero-row result after the checks passed means the task vanished
/// concurrently and maps back to `NotFound`.
pub async fn update(
    pool: &PgPool,
    task_id: Uuid,
    user_id: Uuid,
    input: &UpdateTaskRequest,
) -> Result<Task, AppError> {
    check_ownership(pool, task_id, user_id).await?;

    if input.is_empty() {
        return get_for_user(pool, task_id, user_id).await;
    }

    let mut sets: Vec<String> = Vec::new();
    let mut idx = 1;
    if input.title.is_some() {
        sets.push(format!("title = ${}", idx));
        idx += 1;
    }
    if input.description.is_some() {
        sets.push(format!("description = ${}", idx));
        idx += 1;
    }
    if input.status.is_some() {
        sets.push(format!("status = ${}", idx));
        idx += 1;
    }
    if input.priority.is_some() {
        sets.push(format!("priority = ${}", idx));
        idx += 1;
    }
    if input.due_date.is_some() {
        sets.push(format!("due_date = ${}", idx));
        idx += 1;
    }
    sets.push("updated_at = now()".to_string());

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ${} AND user_id = ${} RETURNING {}",
        sets.join(", "),
        idx,
        idx + 1,
        TASK_COLUMNS
    );

    let mut query = sqlx::query_as::<_, Task>(&sql);
    if let Some(title) = &input.title {
        query = query.bind(title);
    }
    if let Some(description) = &input.description {
        query = query.bind(description.clone());
    }
    if let Some(status) = input.status {
        query = query.bind(status);
    }
    if let Some(priority) = input.priority {
        query = query.bind(priority);
    }
    if let Some(due_date) = &input.due_date {
        query = query.bind(*due_date);
    }
    let updated = query
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    updated.ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Permanent removal, same existence/ownership contract as `update`.
pub async fn delete(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    check_ownership(pool, task_id, user_id).await?;

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(())
}

/// Four independent counts over the user's tasks, executed concurrently.
pub async fn stats(pool: &PgPool, user_id: Uuid) -> Result<TaskStats, AppError> {
    fn count_by_status(
        pool: &PgPool,
        user_id: Uuid,
        status: TaskStatus,
    ) -> impl std::future::Future<Output = Result<i64, sqlx::Error>> + '_ {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(pool)
    }

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool);

    let (total, todo, in_progress, completed) = tokio::try_join!(
        total,
        count_by_status(pool, user_id, TaskStatus::Todo),
        count_by_status(pool, user_id, TaskStatus::InProgress),
        count_by_status(pool, user_id, TaskStatus::Completed),
    )?;

    Ok(TaskStats {
        total,
        todo,
        in_progress,
        completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortOrder, TaskPriority, TaskSortBy};
    use pretty_assertions::assert_eq;

    fn query_with(
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
        search: Option<&str>,
    ) -> TaskListQuery {
        TaskListQuery {
            status,
            priority,
            search: search.map(str::to_owned),
            ..TaskListQuery::default()
        }
    }

    #[test_log::test]
    fn test_filter_clause_owner_only() {
        let query = query_with(None, None, None);
        assert_eq!(filter_clause(&query), "WHERE user_id = $1");
    }

    #[test_log::test]
    fn test_filter_clause_is_a_conjunction() {
        let query = query_with(
            Some(TaskStatus::Todo),
            Some(TaskPriority::High),
            Some("report"),
        );
        assert_eq!(
            filter_clause(&query),
            "WHERE user_id = $1 AND status = $2 AND priority = $3 \
             AND (title ILIKE $4 OR description ILIKE $5)"
        );
    }

    #[test_log::test]
    fn test_filter_clause_search_placeholders_shift() {
        let query = query_with(None, None, Some("report"));
        assert_eq!(
            filter_clause(&query),
            "WHERE user_id = $1 AND (title ILIKE $2 OR description ILIKE $3)"
        );
    }

    #[test]
    fn test_list_sql_defaults() {
        let query = TaskListQuery::default();
        assert_eq!(
            list_sql(&query),
            format!(
                "SELECT {} FROM tasks WHERE user_id = $1 \
                 ORDER BY created_at DESC, id ASC LIMIT 10 OFFSET 0",
                TASK_COLUMNS
            )
        );
    }

    #[test]
    fn test_list_sql_pagination_window_and_sort() {
        let query = TaskListQuery {
            page: 3,
            limit: 25,
            sort_by: TaskSortBy::DueDate,
            sort_order: SortOrder::Asc,
            ..TaskListQuery::default()
        };
        let sql = list_sql(&query);
        assert!(sql.ends_with("ORDER BY due_date ASC, id ASC LIMIT 25 OFFSET 50"));
    }

    #[test]
    fn test_count_sql_shares_filters() {
        let query = query_with(Some(TaskStatus::Completed), None, None);
        assert_eq!(
            count_sql(&query),
            "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND status = $2"
        );
    }
}
