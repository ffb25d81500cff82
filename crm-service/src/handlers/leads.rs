//! Lead pipeline handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{invoices, not_found, validated, ApiResponse};
use crate::client::{BucketSummary, InvoiceDraft, LeadBoard};
use crate::models::{Contact, ContactInput, Invoice, Lead, LeadInput, LeadStatus};
use crate::services::metrics::{LEADS_TOTAL, LEAD_TRANSITIONS_TOTAL};
use crate::services::{record_error, CrmEvent};
use crate::startup::AppState;

pub async fn create_lead(
    State(state): State<AppState>,
    Json(payload): Json<LeadInput>,
) -> Result<(StatusCode, Json<ApiResponse<Lead>>), AppError> {
    let input = validated(payload)?;
    let lead = state.db.create_lead(&input).await?;

    LEADS_TOTAL.with_label_values(&[lead.status.as_str()]).inc();

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Lead created successfully", lead),
    ))
}

pub async fn get_all_leads(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Lead>>>, AppError> {
    Ok(ApiResponse::data(state.db.list_leads().await?))
}

pub async fn get_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let lead = state
        .db
        .get_lead(lead_id)
        .await?
        .ok_or_else(|| not_found("Lead"))?;

    Ok(ApiResponse::data(lead))
}

/// Full replace of the lead's fields.
pub async fn update_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    Json(payload): Json<LeadInput>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let input = validated(payload)?;
    let lead = state
        .db
        .update_lead(lead_id, &input)
        .await?
        .ok_or_else(|| not_found("Lead"))?;

    Ok(ApiResponse::with_message("Lead updated successfully", lead))
}

pub async fn delete_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.db.delete_lead(lead_id).await? {
        return Err(not_found("Lead"));
    }
    Ok(ApiResponse::message("Lead deleted successfully"))
}

/// Body of the status persistence call made after a board move.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadStatusRequest {
    #[serde(default)]
    pub lead_id: String,
    #[serde(default)]
    pub status: String,
}

fn rejected(err: AppError) -> AppError {
    LEAD_TRANSITIONS_TOTAL.with_label_values(&["rejected"]).inc();
    record_error(err.kind());
    err
}

pub async fn update_lead_status(
    State(state): State<AppState>,
    Json(payload): Json<UpdateLeadStatusRequest>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let lead_id: Uuid = payload.lead_id.trim().parse().map_err(|_| {
        rejected(AppError::BadRequest(anyhow::anyhow!(
            "Invalid lead id '{}'",
            payload.lead_id
        )))
    })?;
    let status: LeadStatus = payload
        .status
        .parse()
        .map_err(|e| rejected(AppError::BadRequest(anyhow::Error::new(e))))?;

    let previous = state
        .db
        .get_lead(lead_id)
        .await
        .map_err(rejected)?
        .ok_or_else(|| rejected(not_found("Lead")))?;

    let lead = state
        .db
        .update_lead_status(lead_id, status)
        .await
        .map_err(rejected)?
        .ok_or_else(|| rejected(not_found("Lead")))?;

    LEAD_TRANSITIONS_TOTAL.with_label_values(&["applied"]).inc();
    tracing::info!(lead_id = %lead_id, from = %previous.status, to = %status, "Lead status updated");

    if previous.status != status {
        state.notifier.publish(CrmEvent::LeadStatusChanged {
            lead_id,
            from: previous.status,
            to: status,
        });
    }

    Ok(ApiResponse::with_message("Lead status updated successfully", lead))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub buckets: BTreeMap<LeadStatus, Vec<Lead>>,
    pub summary: Vec<BucketSummary>,
    pub total_leads: usize,
    pub total_deal_amount: Decimal,
}

impl From<LeadBoard> for BoardView {
    fn from(board: LeadBoard) -> Self {
        Self {
            summary: board.summary(),
            total_leads: board.total_leads(),
            total_deal_amount: board.total_deal_amount(),
            buckets: board.buckets().clone(),
        }
    }
}

/// Leads grouped by status, with per-status totals.
pub async fn board(State(state): State<AppState>) -> Result<Json<ApiResponse<BoardView>>, AppError> {
    let leads = state.db.list_leads().await?;
    Ok(ApiResponse::data(LeadBoard::from_leads(leads).into()))
}

/// Extra fields entered on the lead-to-contact form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToContactRequest {
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn convert_to_contact(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    payload: Option<Json<ConvertToContactRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<Contact>>), AppError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let lead = state
        .db
        .get_lead(lead_id)
        .await?
        .ok_or_else(|| not_found("Lead"))?;

    let mut input = ContactInput::from_lead(&lead);
    if let Some(description) = payload.description {
        input.description = description;
    }
    let input = validated(input)?;
    let contact = state.db.create_contact(&input).await?;

    tracing::info!(lead_id = %lead_id, contact_id = %contact.contact_id, "Lead converted to contact");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Contact created from lead", contact),
    ))
}

/// Fields entered on the lead-to-invoice form. Contact details, when given,
/// replace the ones copied from the lead.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToInvoiceRequest {
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub gst_rate: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "crate::models::optional_date")]
    pub date: Option<NaiveDate>,
}

pub async fn convert_to_invoice(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    payload: Option<Json<ConvertToInvoiceRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<Invoice>>), AppError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let lead = state
        .db
        .get_lead(lead_id)
        .await?
        .ok_or_else(|| not_found("Lead"))?;

    let mut draft = InvoiceDraft::from_lead(&lead);
    for (field, value) in [
        (&mut draft.contact_number, payload.contact_number),
        (&mut draft.email_address, payload.email_address),
        (&mut draft.address, payload.address),
        (&mut draft.gst_number, payload.gst_number),
    ] {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            *field = value;
        }
    }
    draft.set_discount(payload.discount);
    draft.set_gst_rate(payload.gst_rate);
    draft.set_paid_amount(payload.paid_amount);
    if let Some(status) = payload.status.filter(|s| !s.trim().is_empty()) {
        draft.status = status;
    }
    draft.date = payload.date;

    let invoice = invoices::store_new(&state, draft.into_request().into()).await?;

    tracing::info!(lead_id = %lead_id, invoice_id = %invoice.invoice_id, "Lead converted to invoice");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Invoice created from lead", invoice),
    ))
}
