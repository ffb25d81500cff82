use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::invoices::{send_reminder_email, ReminderRequest};
use super::{not_found, validated, ApiResponse};
use crate::models::{Contact, ContactInput};
use crate::services::reminders::contact_message;
use crate::startup::AppState;

pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactInput>,
) -> Result<(StatusCode, Json<ApiResponse<Contact>>), AppError> {
    let input = validated(payload)?;
    let contact = state.db.create_contact(&input).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Contact created successfully", contact),
    ))
}

pub async fn get_all_contacts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Contact>>>, AppError> {
    Ok(ApiResponse::data(state.db.list_contacts().await?))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let contact = state
        .db
        .get_contact(contact_id)
        .await?
        .ok_or_else(|| not_found("Contact"))?;

    Ok(ApiResponse::data(contact))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
    Json(payload): Json<ContactInput>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let input = validated(payload)?;
    let contact = state
        .db
        .update_contact(contact_id, &input)
        .await?
        .ok_or_else(|| not_found("Contact"))?;

    Ok(ApiResponse::with_message("Contact updated successfully", contact))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.db.delete_contact(contact_id).await? {
        return Err(not_found("Contact"));
    }
    Ok(ApiResponse::message("Contact deleted successfully"))
}

pub async fn send_email_reminder(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
    payload: Option<Json<ReminderRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let contact = state
        .db
        .get_contact(contact_id)
        .await?
        .ok_or_else(|| not_found("Contact"))?;

    let message = payload
        .and_then(|Json(p)| p.text())
        .unwrap_or_else(|| contact_message(&contact));

    send_reminder_email(&state, &contact.email_address, message).await?;

    tracing::info!(contact_id = %contact_id, "Contact reminder emailed");

    Ok(ApiResponse::message("Email reminder sent successfully"))
}
