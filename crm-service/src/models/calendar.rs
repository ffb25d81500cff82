//! Calendar event model for crm-service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Scheduled calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(rename = "_id")]
    pub event_id: Uuid,
    pub event: String,
    pub date: NaiveDate,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CalendarEventInput {
    #[validate(length(min = 1, message = "Event title is required"))]
    pub event: String,
    pub date: NaiveDate,
}

/// Only the title of an existing event can be edited.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCalendarEvent {
    #[validate(length(min = 1, message = "Event title is required"))]
    pub event: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteCalendarEvent {
    pub id: Uuid,
}
