//! Invoice and payment reminder handlers.
//!
//! Derived totals sent by a client are never trusted: they are recomputed
//! from amount, discount, GST rate and paid amount on every write.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use super::{not_found, validated, ApiResponse};
use crate::models::{GstRate, Invoice, InvoiceInput};
use crate::services::metrics::{INVOICES_TOTAL, REMINDERS_TOTAL};
use crate::services::reminders::default_email_message;
use crate::services::{calculate_gst, record_error, CrmEvent, EmailMessage, ReminderLinks};
use crate::startup::AppState;

/// The calculator takes any rate; stored invoices must use a GST slab.
fn check_gst_slab(input: &InvoiceInput) -> Result<(), AppError> {
    if let Err(e) = GstRate::try_from(input.gst_rate) {
        record_error("validation");
        let mut error = ValidationError::new("gst_slab");
        error.message = Some(Cow::from(e.to_string()));
        let mut errors = ValidationErrors::new();
        errors.add("gstRate", error);
        return Err(AppError::from(errors));
    }
    Ok(())
}

/// Validate and insert a new invoice with freshly computed totals.
pub(crate) async fn store_new(state: &AppState, input: InvoiceInput) -> Result<Invoice, AppError> {
    let input = validated(input)?;
    check_gst_slab(&input)?;

    let totals = calculate_gst(input.amount, input.discount, input.gst_rate, input.paid_amount);
    let invoice = state.db.create_invoice(&input, &totals).await?;

    INVOICES_TOTAL
        .with_label_values(&[invoice.status.as_str()])
        .inc();

    Ok(invoice)
}

pub async fn invoice_add(
    State(state): State<AppState>,
    Json(payload): Json<InvoiceInput>,
) -> Result<(StatusCode, Json<ApiResponse<Invoice>>), AppError> {
    let invoice = store_new(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Invoice created successfully", invoice),
    ))
}

pub async fn get_all_invoices(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Invoice>>>, AppError> {
    Ok(ApiResponse::data(state.db.list_invoices().await?))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let invoice = state
        .db
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| not_found("Invoice"))?;

    Ok(ApiResponse::data(invoice))
}

/// Full replace. A submitted `remainingAmount` is kept only when amount,
/// discount, GST rate and paid amount all match the stored invoice.
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<InvoiceInput>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let input = validated(payload)?;
    check_gst_slab(&input)?;

    let stored = state
        .db
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| not_found("Invoice"))?;

    let mut totals = calculate_gst(input.amount, input.discount, input.gst_rate, input.paid_amount);
    if let Some(remaining) = input.remaining_amount {
        if !input.changes_totals_of(&stored) {
            totals.remaining_amount = remaining;
        }
    }

    let invoice = state
        .db
        .update_invoice(invoice_id, &input, &totals)
        .await?
        .ok_or_else(|| not_found("Invoice"))?;

    Ok(ApiResponse::with_message("Invoice updated successfully", invoice))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.db.delete_invoice(invoice_id).await? {
        return Err(not_found("Invoice"));
    }
    Ok(ApiResponse::message("Invoice deleted successfully"))
}

pub async fn get_unpaid_invoices(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Invoice>>>, AppError> {
    Ok(ApiResponse::data(state.db.list_unpaid_invoices().await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMessageRequest {
    #[serde(default)]
    pub custom_message: String,
}

pub async fn update_custom_message(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<CustomMessageRequest>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let invoice = state
        .db
        .update_custom_message(invoice_id, &payload.custom_message)
        .await?
        .ok_or_else(|| not_found("Invoice"))?;

    Ok(ApiResponse::with_message("Custom message saved", invoice))
}

/// Optional message override for an email reminder.
#[derive(Debug, Default, Deserialize)]
pub struct ReminderRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ReminderRequest {
    pub(crate) fn text(self) -> Option<String> {
        self.message.filter(|m| !m.trim().is_empty())
    }
}

pub(crate) async fn send_reminder_email(
    state: &AppState,
    to: &str,
    body_text: String,
) -> Result<(), AppError> {
    if to.trim().is_empty() {
        record_error("validation");
        return Err(AppError::BadRequest(anyhow::anyhow!("No email address on record")));
    }

    let email = EmailMessage {
        to: to.to_string(),
        subject: "Payment reminder".to_string(),
        body_text,
    };

    let response = state.email_provider.send(&email).await.map_err(|e| {
        tracing::error!(to = %to, error = %e, "Reminder email failed");
        record_error("email");
        AppError::EmailError(e.to_string())
    })?;
    tracing::debug!(to = %to, provider_id = ?response.provider_id, "Reminder email accepted");

    REMINDERS_TOTAL.with_label_values(&["email"]).inc();
    Ok(())
}

/// Email the customer; the message falls back to the saved custom message
/// and then to the default reminder text.
pub async fn send_email_reminder(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    payload: Option<Json<ReminderRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let invoice = state
        .db
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| not_found("Invoice"))?;

    let requested = payload.and_then(|Json(p)| p.text());
    let message = requested
        .or_else(|| Some(invoice.custom_message.clone()).filter(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| default_email_message(&invoice));

    send_reminder_email(&state, &invoice.email_address, message).await?;

    state.notifier.publish(CrmEvent::InvoiceReminderSent {
        invoice_id,
        customer_name: invoice.customer_name.clone(),
        remaining_amount: invoice.remaining_amount,
    });

    tracing::info!(invoice_id = %invoice_id, "Payment reminder emailed");

    Ok(ApiResponse::message("Email reminder sent successfully"))
}

/// WhatsApp and call links for an unpaid invoice.
pub async fn reminder_links(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReminderLinks>>, AppError> {
    let invoice = state
        .db
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| not_found("Invoice"))?;

    let links = ReminderLinks::for_invoice(&invoice).map_err(|e| {
        record_error("validation");
        AppError::BadRequest(anyhow::Error::new(e))
    })?;

    REMINDERS_TOTAL.with_label_values(&["links"]).inc();

    Ok(ApiResponse::data(links))
}
