//! Calendar handlers. Paths keep the `/calender` spelling clients already use.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::{not_found, validated, ApiResponse};
use crate::models::{CalendarEvent, CalendarEventInput, DeleteCalendarEvent, UpdateCalendarEvent};
use crate::services::CrmEvent;
use crate::startup::AppState;

pub async fn create_data(
    State(state): State<AppState>,
    Json(payload): Json<CalendarEventInput>,
) -> Result<(StatusCode, Json<ApiResponse<CalendarEvent>>), AppError> {
    let input = validated(payload)?;
    let event = state.db.create_event(&input).await?;

    state.notifier.publish(CrmEvent::CalendarEventScheduled {
        event_id: event.event_id,
        event: event.event.clone(),
        date: event.date,
    });

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Event created successfully", event),
    ))
}

pub async fn get_all_data(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CalendarEvent>>>, AppError> {
    Ok(ApiResponse::data(state.db.list_events().await?))
}

pub async fn update_data(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<UpdateCalendarEvent>,
) -> Result<Json<ApiResponse<CalendarEvent>>, AppError> {
    let input = validated(payload)?;
    let event = state
        .db
        .update_event(event_id, &input.event)
        .await?
        .ok_or_else(|| not_found("Event"))?;

    Ok(ApiResponse::with_message("Event updated successfully", event))
}

/// The id travels in the request body, not the path.
pub async fn delete_data(
    State(state): State<AppState>,
    Json(payload): Json<DeleteCalendarEvent>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.db.delete_event(payload.id).await? {
        return Err(not_found("Event"));
    }
    Ok(ApiResponse::message("Event deleted successfully"))
}
