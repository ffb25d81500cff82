//! Contact model for crm-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::Lead;

/// Customer contact card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub contact_id: Uuid,
    pub company_name: String,
    pub customer_name: String,
    pub contact_number: String,
    pub email_address: String,
    pub address: String,
    pub gst_number: String,
    pub description: String,
    pub created_utc: DateTime<Utc>,
}

/// Contact form body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    #[validate(length(min = 1, message = "Company name is required"))]
    #[serde(default)]
    pub company_name: String,
    #[validate(length(min = 1, message = "Customer name is required"))]
    #[serde(default)]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Contact number is required"))]
    #[serde(default)]
    pub contact_number: String,
    #[validate(email(message = "Invalid email address"))]
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gst_number: String,
    #[serde(default)]
    pub description: String,
}

impl ContactInput {
    /// Pre-populate a contact from a lead; the description starts empty.
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            company_name: lead.company_name.clone(),
            customer_name: lead.customer_name.clone(),
            contact_number: lead.contact_number.clone(),
            email_address: lead.email_address.clone(),
            address: lead.address.clone(),
            gst_number: lead.gst_number.clone(),
            description: String::new(),
        }
    }
}
