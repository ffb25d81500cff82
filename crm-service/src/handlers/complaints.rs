use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::{not_found, validated, ApiResponse};
use crate::models::{Complaint, ComplaintInput};
use crate::startup::AppState;

pub async fn create_complaint(
    State(state): State<AppState>,
    Json(payload): Json<ComplaintInput>,
) -> Result<(StatusCode, Json<ApiResponse<Complaint>>), AppError> {
    let input = validated(payload)?;
    let complaint = state.db.create_complaint(&input).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Complaint registered successfully", complaint),
    ))
}

pub async fn get_all_complaints(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Complaint>>>, AppError> {
    Ok(ApiResponse::data(state.db.list_complaints().await?))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    Path(complaint_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Complaint>>, AppError> {
    let complaint = state
        .db
        .get_complaint(complaint_id)
        .await?
        .ok_or_else(|| not_found("Complaint"))?;

    Ok(ApiResponse::data(complaint))
}

pub async fn update_complaint(
    State(state): State<AppState>,
    Path(complaint_id): Path<Uuid>,
    Json(payload): Json<ComplaintInput>,
) -> Result<Json<ApiResponse<Complaint>>, AppError> {
    let input = validated(payload)?;
    let complaint = state
        .db
        .update_complaint(complaint_id, &input)
        .await?
        .ok_or_else(|| not_found("Complaint"))?;

    Ok(ApiResponse::with_message("Complaint updated successfully", complaint))
}

pub async fn delete_complaint(
    State(state): State<AppState>,
    Path(complaint_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.db.delete_complaint(complaint_id).await? {
        return Err(not_found("Complaint"));
    }
    Ok(ApiResponse::message("Complaint deleted successfully"))
}
