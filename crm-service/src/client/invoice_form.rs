//! Invoice form state.
//!
//! The four inputs of [`calculate_gst`] are private so every edit goes
//! through a setter that refreshes the derived totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{InvoiceInput, InvoiceTotals, Lead};
use crate::services::calculate_gst;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceDraft {
    pub lead_id: Option<Uuid>,
    pub company_name: String,
    pub customer_name: String,
    pub contact_number: String,
    pub email_address: String,
    pub address: String,
    pub gst_number: String,
    pub product_name: String,
    pub status: String,
    pub date: Option<NaiveDate>,
    amount: Decimal,
    discount: Decimal,
    gst_rate: Decimal,
    paid_amount: Decimal,
    totals: InvoiceTotals,
}

/// Body of an invoice create or update call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub paid_amount: Decimal,
    pub total_without_gst: Decimal,
    pub total_with_gst: Decimal,
    pub remaining_amount: Decimal,
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self {
            status: "Unpaid".to_string(),
            ..Self::default()
        }
    }

    /// Prefill from a lead, as the lead-to-invoice conversion does.
    pub fn from_lead(lead: &Lead) -> Self {
        let mut draft = Self {
            lead_id: Some(lead.lead_id),
            company_name: lead.company_name.clone(),
            customer_name: lead.customer_name.clone(),
            contact_number: lead.contact_number.clone(),
            email_address: lead.email_address.clone(),
            address: lead.address.clone(),
            gst_number: lead.gst_number.clone(),
            product_name: lead.product_name.clone(),
            ..Self::new()
        };
        draft.set_amount(lead.amount);
        draft
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    pub fn gst_rate(&self) -> Decimal {
        self.gst_rate
    }

    pub fn paid_amount(&self) -> Decimal {
        self.paid_amount
    }

    pub fn totals(&self) -> InvoiceTotals {
        self.totals
    }

    pub fn set_amount(&mut self, amount: Decimal) {
        self.amount = amount;
        self.recompute();
    }

    pub fn set_discount(&mut self, discount_percent: Decimal) {
        self.discount = discount_percent;
        self.recompute();
    }

    pub fn set_gst_rate(&mut self, gst_rate_percent: Decimal) {
        self.gst_rate = gst_rate_percent;
        self.recompute();
    }

    pub fn set_paid_amount(&mut self, paid_amount: Decimal) {
        self.paid_amount = paid_amount;
        self.recompute();
    }

    /// Hand-edited balance. Kept until one of the four inputs changes.
    pub fn override_remaining_amount(&mut self, remaining_amount: Decimal) {
        self.totals.remaining_amount = remaining_amount;
    }

    fn recompute(&mut self) {
        self.totals = calculate_gst(self.amount, self.discount, self.gst_rate, self.paid_amount);
    }

    pub fn into_request(self) -> InvoiceRequest {
        InvoiceRequest {
            lead_id: self.lead_id,
            company_name: self.company_name,
            customer_name: self.customer_name,
            contact_number: self.contact_number,
            email_address: self.email_address,
            address: self.address,
            gst_number: self.gst_number,
            product_name: self.product_name,
            amount: self.amount,
            discount: self.discount,
            gst_rate: self.gst_rate,
            status: self.status,
            date: self.date,
            paid_amount: self.paid_amount,
            total_without_gst: self.totals.total_without_gst,
            total_with_gst: self.totals.total_with_gst,
            remaining_amount: self.totals.remaining_amount,
        }
    }
}

impl From<InvoiceRequest> for InvoiceInput {
    fn from(request: InvoiceRequest) -> Self {
        InvoiceInput {
            lead_id: request.lead_id,
            company_name: request.company_name,
            customer_name: request.customer_name,
            contact_number: request.contact_number,
            email_address: request.email_address,
            address: request.address,
            gst_number: request.gst_number,
            product_name: request.product_name,
            amount: request.amount,
            discount: request.discount,
            gst_rate: request.gst_rate,
            status: request.status,
            date: request.date,
            paid_amount: request.paid_amount,
            remaining_amount: Some(request.remaining_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadStatus;
    use chrono::Utc;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn filled() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.set_amount(dec("1000"));
        draft.set_discount(dec("10"));
        draft.set_gst_rate(dec("18"));
        draft.set_paid_amount(dec("500"));
        draft
    }

    #[test]
    fn numeric_edits_recompute_totals() {
        let mut draft = filled();
        assert_eq!(draft.totals(), calculate_gst(dec("1000"), dec("10"), dec("18"), dec("500")));
        assert_eq!(draft.totals().remaining_amount, dec("562"));

        draft.set_gst_rate(dec("28"));
        assert_eq!(draft.totals().total_with_gst, dec("1152"));
        assert_eq!(draft.totals().remaining_amount, dec("652"));
    }

    #[test]
    fn text_edits_leave_totals_alone() {
        let mut draft = filled();
        let before = draft.totals();
        draft.company_name = "Acme".to_string();
        draft.status = "Paid".to_string();
        draft.date = NaiveDate::from_ymd_opt(2025, 1, 31);
        assert_eq!(draft.totals(), before);
    }

    #[test]
    fn override_survives_until_next_recompute() {
        let mut draft = filled();
        draft.override_remaining_amount(dec("0"));
        draft.customer_name = "Asha".to_string();
        assert_eq!(draft.totals().remaining_amount, Decimal::ZERO);
        assert_eq!(draft.totals().total_with_gst, dec("1062"));

        draft.set_paid_amount(dec("62"));
        assert_eq!(draft.totals().remaining_amount, dec("1000"));
    }

    #[test]
    fn from_lead_copies_fields_and_amount() {
        let lead = Lead {
            lead_id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            customer_name: "Asha".to_string(),
            contact_number: "9876543210".to_string(),
            email_address: "asha@acme.in".to_string(),
            address: "Pune".to_string(),
            product_name: "ERP licence".to_string(),
            amount: dec("2500"),
            gst_number: "27AAAPL1234C1Z5".to_string(),
            status: LeadStatus::Decided,
            date: None,
            end_date: None,
            notes: "VIP".to_string(),
            created_utc: Utc::now(),
        };

        let draft = InvoiceDraft::from_lead(&lead);
        assert_eq!(draft.lead_id, Some(lead.lead_id));
        assert_eq!(draft.product_name, "ERP licence");
        assert_eq!(draft.status, "Unpaid");
        assert_eq!(draft.amount(), dec("2500"));
        assert_eq!(draft.discount(), Decimal::ZERO);
        assert_eq!(draft.totals().total_with_gst, dec("2500"));
        assert_eq!(draft.totals().remaining_amount, dec("2500"));
    }

    #[test]
    fn request_carries_derived_fields() {
        let request = filled().into_request();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["totalWithoutGst"], serde_json::json!(900.0));
        assert_eq!(json["totalWithGst"], serde_json::json!(1062.0));
        assert_eq!(json["remainingAmount"], serde_json::json!(562.0));
        assert!(json.get("leadId").is_none());

        let mut body = json;
        body["companyName"] = "Acme".into();
        body["customerName"] = "Asha".into();
        body["contactNumber"] = "9876543210".into();
        let input: InvoiceInput = serde_json::from_value(body).unwrap();
        assert_eq!(input.remaining_amount, Some(dec("562")));
        assert_eq!(input.gst_rate, dec("18"));
    }
}
