//! Task model for crm-service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{default_medium, default_pending, optional_date};

/// Follow-up task assigned to a team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub task_id: Uuid,
    pub subject: String,
    pub name: String,
    pub related_to: String,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub priority: String,
    pub assigned: String,
    pub last_reminder_date: Option<NaiveDate>,
    pub last_reminder: String,
    pub created_utc: DateTime<Utc>,
}

/// Task form body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[validate(length(min = 1, message = "Subject is required"))]
    #[serde(default)]
    pub subject: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 1, message = "Related to is required"))]
    #[serde(default)]
    pub related_to: String,
    #[validate(required(message = "Due date is required"))]
    #[serde(default, deserialize_with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default = "default_pending")]
    pub status: String,
    #[serde(default = "default_medium")]
    pub priority: String,
    #[serde(default)]
    pub assigned: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub last_reminder_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_reminder: String,
}
