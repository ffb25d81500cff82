use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::{not_found, validated, ApiResponse};
use crate::models::{Task, TaskInput};
use crate::startup::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskInput>,
) -> Result<(StatusCode, Json<ApiResponse<Task>>), AppError> {
    let input = validated(payload)?;
    let task = state.db.create_task(&input).await?;

    tracing::info!(task_id = %task.task_id, assigned = %task.assigned, "Task created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Task created successfully", task),
    ))
}

pub async fn get_all_tasks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Task>>>, AppError> {
    Ok(ApiResponse::data(state.db.list_tasks().await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let task = state
        .db
        .get_task(task_id)
        .await?
        .ok_or_else(|| not_found("Task"))?;

    Ok(ApiResponse::data(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<TaskInput>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let input = validated(payload)?;
    let task = state
        .db
        .update_task(task_id, &input)
        .await?
        .ok_or_else(|| not_found("Task"))?;

    Ok(ApiResponse::with_message("Task updated successfully", task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.db.delete_task(task_id).await? {
        return Err(not_found("Task"));
    }
    Ok(ApiResponse::message("Task deleted successfully"))
}
