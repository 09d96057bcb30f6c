use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{CreateTaskRequest, TaskListQuery, UpdateTaskRequest},
    response::{ApiResponse, PaginatedResponse, Pagination},
    store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Lists the authenticated user's tasks.
///
/// Supports conjunctive filtering by `status`, `priority`, and a
/// case-insensitive `search` over title and description, a single sort key
/// (`sortBy`/`sortOrder`, default `createdAt`/`desc`), and pagination
/// (`page` >= 1, `limit` 1..=100). Out-of-range pagination values are rejected
/// with 400, not clamped. The response carries the page slice plus
/// `pagination.total`/`totalPages` computed over all matching rows.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    query: web::Query<TaskListQuery>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    query.validate()?;

    let (tasks, total) = store::tasks::list(&pool, user.id, &query).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(
        tasks,
        Pagination::new(query.page, query.limit, total),
        "Tasks retrieved successfully",
    )))
}

/// Aggregate status counts for the authenticated user's tasks.
#[get("/stats")]
pub async fn get_stats(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let stats = store::tasks::stats(&pool, user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        json!({ "stats": stats }),
        "Task statistics retrieved successfully",
    )))
}

/// Creates a task owned by the authenticated user. Status defaults to TODO
/// and priority to MEDIUM when omitted.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    payload: web::Json<CreateTaskRequest>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = store::tasks::create(&pool, user.id, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::new(
        json!({ "task": task }),
        "Task created successfully",
    )))
}

/// Fetches a single task. A task that does not exist is 404; one owned by a
/// different user is 403.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task = store::tasks::get_for_user(&pool, task_id.into_inner(), user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        json!({ "task": task }),
        "Task retrieved successfully",
    )))
}

/// Partially updates a task. Only fields present in the body change;
/// `description`/`dueDate` sent as `null` are cleared, absent fields are left
/// untouched. Same existence/ownership contract as `get_task`.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    payload: web::Json<UpdateTaskRequest>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = store::tasks::update(&pool, task_id.into_inner(), user.id, &payload).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        json!({ "task": task }),
        "Task updated successfully",
    )))
}

/// Permanently deletes a task. Same existence/ownership contract as
/// `get_task`.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    store::tasks::delete(&pool, task_id.into_inner(), user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        serde_json::Value::Null,
        "Task deleted successfully",
    )))
}
