//! Complaint model for crm-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{default_medium, default_pending};

/// Customer complaint case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(rename = "_id")]
    pub complaint_id: Uuid,
    pub complainer_name: String,
    pub contact_number: String,
    pub subject: String,
    pub case_origin: String,
    pub date: String,
    pub time: String,
    pub case_status: String,
    pub priority: String,
    pub created_utc: DateTime<Utc>,
}

/// Complaint form body. Date and time are kept as entered.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintInput {
    #[validate(length(min = 1, message = "Missing required field: complainerName"))]
    #[serde(default)]
    pub complainer_name: String,
    #[validate(length(min = 1, message = "Missing required field: contactNumber"))]
    #[serde(default)]
    pub contact_number: String,
    #[validate(length(min = 1, message = "Missing required field: subject"))]
    #[serde(default)]
    pub subject: String,
    #[validate(length(min = 1, message = "Missing required field: caseOrigin"))]
    #[serde(default)]
    pub case_origin: String,
    #[validate(length(min = 1, message = "Missing required field: date"))]
    #[serde(default)]
    pub date: String,
    #[validate(length(min = 1, message = "Missing required field: time"))]
    #[serde(default)]
    pub time: String,
    #[serde(default = "default_pending")]
    pub case_status: String,
    #[serde(default = "default_medium")]
    pub priority: String,
}
