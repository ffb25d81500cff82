//! Invoice model for crm-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::{decimal_column, optional_date};

/// GST slabs offered on invoice forms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GstRate {
    #[default]
    Exempt,
    Five,
    Twelve,
    Eighteen,
    TwentyEight,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("GST rate {0}% is not one of 0, 5, 12, 18, 28")]
pub struct InvalidGstRate(pub Decimal);

impl GstRate {
    pub const ALL: [GstRate; 5] = [
        GstRate::Exempt,
        GstRate::Five,
        GstRate::Twelve,
        GstRate::Eighteen,
        GstRate::TwentyEight,
    ];

    pub fn percent(&self) -> Decimal {
        match self {
            GstRate::Exempt => Decimal::ZERO,
            GstRate::Five => Decimal::from(5),
            GstRate::Twelve => Decimal::from(12),
            GstRate::Eighteen => Decimal::from(18),
            GstRate::TwentyEight => Decimal::from(28),
        }
    }
}

impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl TryFrom<Decimal> for GstRate {
    type Error = InvalidGstRate;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        GstRate::ALL
            .into_iter()
            .find(|rate| rate.percent() == value)
            .ok_or(InvalidGstRate(value))
    }
}

/// Derived amounts of an invoice. Never rounded here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub total_without_gst: Decimal,
    pub total_with_gst: Decimal,
    pub remaining_amount: Decimal,
}

impl InvoiceTotals {
    pub fn gst_amount(&self) -> Decimal {
        self.total_with_gst.saturating_sub(self.total_without_gst)
    }
}

/// Billing record for a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub invoice_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub company_name: String,
    pub customer_name: String,
    pub contact_number: String,
    pub email_address: String,
    pub address: String,
    pub gst_number: String,
    pub product_name: String,
    pub amount: Decimal,
    pub discount: Decimal,
    pub gst_rate: Decimal,
    pub status: String,
    pub date: Option<NaiveDate>,
    pub total_without_gst: Decimal,
    pub total_with_gst: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub custom_message: String,
    pub created_utc: DateTime<Utc>,
}

impl Invoice {
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            total_without_gst: self.total_without_gst,
            total_with_gst: self.total_with_gst,
            remaining_amount: self.remaining_amount,
        }
    }

    pub fn is_unpaid(&self) -> bool {
        self.remaining_amount > Decimal::ZERO
    }
}

impl<'r> FromRow<'r, SqliteRow> for Invoice {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            invoice_id: row.try_get("invoice_id")?,
            lead_id: row.try_get("lead_id")?,
            company_name: row.try_get("company_name")?,
            customer_name: row.try_get("customer_name")?,
            contact_number: row.try_get("contact_number")?,
            email_address: row.try_get("email_address")?,
            address: row.try_get("address")?,
            gst_number: row.try_get("gst_number")?,
            product_name: row.try_get("product_name")?,
            amount: decimal_column(row, "amount")?,
            discount: decimal_column(row, "discount")?,
            gst_rate: decimal_column(row, "gst_rate")?,
            status: row.try_get("status")?,
            date: row.try_get("date")?,
            total_without_gst: decimal_column(row, "total_without_gst")?,
            total_with_gst: decimal_column(row, "total_with_gst")?,
            paid_amount: decimal_column(row, "paid_amount")?,
            remaining_amount: decimal_column(row, "remaining_amount")?,
            custom_message: row.try_get("custom_message")?,
            created_utc: row.try_get("created_utc")?,
        })
    }
}

fn default_invoice_status() -> String {
    "Unpaid".to_string()
}

/// Invoice form body.
///
/// `totalWithoutGst` and `totalWithGst` may be present in the body but are
/// always recomputed. `remainingAmount` is kept only as a manual override.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    #[serde(default)]
    pub lead_id: Option<Uuid>,
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
    pub product_name: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub gst_rate: Decimal,
    #[serde(default = "default_invoice_status")]
    pub status: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub remaining_amount: Option<Decimal>,
}

impl InvoiceInput {
    /// Whether any input of the GST computation differs from `invoice`.
    pub fn changes_totals_of(&self, invoice: &Invoice) -> bool {
        self.amount != invoice.amount
            || self.discount != invoice.discount
            || self.gst_rate != invoice.gst_rate
            || self.paid_amount != invoice.paid_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slabs_parse_from_percent() {
        for rate in GstRate::ALL {
            assert_eq!(GstRate::try_from(rate.percent()), Ok(rate));
        }
        assert_eq!(
            GstRate::try_from(Decimal::from(7)),
            Err(InvalidGstRate(Decimal::from(7)))
        );
    }

    #[test]
    fn slab_lookup_ignores_scale() {
        let eighteen = "18.00".parse::<Decimal>().unwrap();
        assert_eq!(GstRate::try_from(eighteen), Ok(GstRate::Eighteen));
    }

    #[test]
    fn input_accepts_numbers_and_strings() {
        let input: InvoiceInput = serde_json::from_str(
            r#"{"companyName":"Acme","customerName":"Asha","contactNumber":"9876543210",
                "emailAddress":"asha@acme.in","amount":1000,"discount":"10","gstRate":18,
                "paidAmount":500,"totalWithGst":1}"#,
        )
        .unwrap();
        assert_eq!(input.amount, Decimal::from(1000));
        assert_eq!(input.discount, Decimal::from(10));
        assert_eq!(input.status, "Unpaid");
        assert_eq!(input.remaining_amount, None);
    }
}
