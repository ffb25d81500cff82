//! HTTP handlers for crm-service.
//!
//! Every reply uses the same envelope: `{ success, message?, data? }`.

pub mod calendar;
pub mod complaints;
pub mod contacts;
pub mod health;
pub mod invoices;
pub mod leads;
pub mod tasks;

pub use health::{health_check, metrics_endpoint, readiness_check};

use axum::Json;
use serde::Serialize;
use service_core::error::AppError;
use validator::Validate;

use crate::services::record_error;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data: Some(data),
        })
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        })
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: None,
        })
    }
}

pub(crate) fn validated<T: Validate>(payload: T) -> Result<T, AppError> {
    if let Err(e) = payload.validate() {
        record_error("validation");
        return Err(AppError::from(e));
    }
    Ok(payload)
}

pub(crate) fn not_found(what: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{} not found", what))
}
