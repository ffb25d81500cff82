//! Lead model for crm-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::{decimal_column, optional_date};

/// Pipeline stage of a lead, in board order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LeadStatus {
    #[default]
    New,
    Proposal,
    Discussion,
    Demo,
    Decided,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown lead status '{0}'")]
pub struct UnknownLeadStatus(pub String);

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Proposal,
        LeadStatus::Discussion,
        LeadStatus::Demo,
        LeadStatus::Decided,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Proposal => "Proposal",
            LeadStatus::Discussion => "Discussion",
            LeadStatus::Demo => "Demo",
            LeadStatus::Decided => "Decided",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = UnknownLeadStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownLeadStatus(s.to_string()))
    }
}

/// Sales prospect tracked through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(rename = "_id")]
    pub lead_id: Uuid,
    pub company_name: String,
    pub customer_name: String,
    pub contact_number: String,
    pub email_address: String,
    pub address: String,
    pub product_name: String,
    pub amount: Decimal,
    pub gst_number: String,
    pub status: LeadStatus,
    pub date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: String,
    pub created_utc: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for Lead {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status.parse().map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            lead_id: row.try_get("lead_id")?,
            company_name: row.try_get("company_name")?,
            customer_name: row.try_get("customer_name")?,
            contact_number: row.try_get("contact_number")?,
            email_address: row.try_get("email_address")?,
            address: row.try_get("address")?,
            product_name: row.try_get("product_name")?,
            amount: decimal_column(row, "amount")?,
            gst_number: row.try_get("gst_number")?,
            status,
            date: row.try_get("date")?,
            end_date: row.try_get("end_date")?,
            notes: row.try_get("notes")?,
            created_utc: row.try_get("created_utc")?,
        })
    }
}

/// Lead form body, used for both create and full-replace update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    #[validate(length(min = 1, message = "Company name is required"))]
    #[serde(default)]
    pub company_name: String,
    #[validate(length(min = 1, message = "Customer name is required"))]
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub contact_number: String,
    #[validate(email(message = "Invalid email address"))]
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub gst_number: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}
