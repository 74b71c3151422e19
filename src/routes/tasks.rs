/// Task routes
///
/// CRUD over task records, always scoped to the authenticated user. The
/// JWT middleware has already validated the bearer token; handlers read
/// the user id from the injected claims and never touch another user's
/// rows. An id that exists but belongs to someone else is a 404, not a
/// 403.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::Claims;
use crate::error::{AppError, ValidationError};
use crate::models::TaskItem;

const MAX_TITLE_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 500;

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub created_at: String,
    pub user_id: i32,
}

impl From<TaskItem> for TaskResponse {
    fn from(item: TaskItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            is_completed: item.is_completed,
            created_at: item.created_at.to_rfc3339(),
            user_id: item.user_id,
        }
    }
}

fn validate_task_fields(title: &str, description: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyField("title".to_string()).into());
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong("title".to_string(), MAX_TITLE_LENGTH).into());
    }
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyField("description".to_string()).into());
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(
            ValidationError::TooLong("description".to_string(), MAX_DESCRIPTION_LENGTH).into(),
        );
    }
    Ok(())
}

/// GET /task
pub async fn list_tasks(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let tasks = sqlx::query_as::<_, TaskItem>(
        r#"
        SELECT id, title, description, is_completed, created_at, user_id
        FROM task_items
        WHERE user_id = $1
        ORDER BY id
        "#,
    )
    .bind(claims.id)
    .fetch_all(pool.get_ref())
    .await?;

    let body: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /task/{id}
pub async fn get_task(
    path: web::Path<i32>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let task_id = path.into_inner();

    let task = sqlx::query_as::<_, TaskItem>(
        r#"
        SELECT id, title, description, is_completed, created_at, user_id
        FROM task_items
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(task_id)
    .bind(claims.id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("task {} not found", task_id)))?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

/// POST /task
pub async fn create_task(
    form: web::Json<CreateTaskRequest>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    validate_task_fields(&form.title, &form.description)?;

    let task = sqlx::query_as::<_, TaskItem>(
        r#"
        INSERT INTO task_items (title, description, is_completed, created_at, user_id)
        VALUES ($1, $2, FALSE, $3, $4)
        RETURNING id, title, description, is_completed, created_at, user_id
        "#,
    )
    .bind(form.title.trim())
    .bind(form.description.trim())
    .bind(Utc::now())
    .bind(claims.id)
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(user_id = claims.id, task_id = task.id, "Task created");

    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

/// PUT /task/{id}
pub async fn update_task(
    path: web::Path<i32>,
    form: web::Json<UpdateTaskRequest>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let task_id = path.into_inner();
    validate_task_fields(&form.title, &form.description)?;

    let result = sqlx::query(
        r#"
        UPDATE task_items
        SET title = $1, description = $2, is_completed = $3
        WHERE id = $4 AND user_id = $5
        "#,
    )
    .bind(form.title.trim())
    .bind(form.description.trim())
    .bind(form.is_completed)
    .bind(task_id)
    .bind(claims.id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("task {} not found", task_id)));
    }

    tracing::info!(user_id = claims.id, task_id = task_id, "Task updated");

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /task/{id}
pub async fn delete_task(
    path: web::Path<i32>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let task_id = path.into_inner();

    let result = sqlx::query("DELETE FROM task_items WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(claims.id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("task {} not found", task_id)));
    }

    tracing::info!(user_id = claims.id, task_id = task_id, "Task deleted");

    Ok(HttpResponse::NoContent().finish())
}
