//! Domain models for crm-service.

mod calendar;
mod complaint;
mod contact;
mod invoice;
mod lead;
mod task;

pub use calendar::{CalendarEvent, CalendarEventInput, DeleteCalendarEvent, UpdateCalendarEvent};
pub use complaint::{Complaint, ComplaintInput};
pub use contact::{Contact, ContactInput};
pub use invoice::{GstRate, InvalidGstRate, Invoice, InvoiceInput, InvoiceTotals};
pub use lead::{Lead, LeadInput, LeadStatus, UnknownLeadStatus};
pub use task::{Task, TaskInput};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use sqlx::{sqlite::SqliteRow, Row};

/// Read a TEXT column holding a decimal amount.
pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

/// Form dates arrive as `""`, `"YYYY-MM-DD"` or a full ISO timestamp.
pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let day = value.get(..10).unwrap_or(value);
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

fn default_pending() -> String {
    "Pending".to_string()
}

fn default_medium() -> String {
    "Medium".to_string()
}
