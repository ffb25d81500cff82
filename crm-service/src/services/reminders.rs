//! Payment reminder links and messages.
//!
//! Reminders are handed off to the customer's own apps: a `wa.me` link that
//! opens WhatsApp with a prefilled text, and a `tel:` link for a call.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Contact, Invoice};

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReminderError {
    #[error("Invalid phone number '{0}'")]
    InvalidPhoneNumber(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invoice has no outstanding amount")]
    NothingDue,
}

/// Strip everything but digits and check the length.
pub fn normalize_phone(raw: &str) -> Result<String, ReminderError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        Ok(digits)
    } else {
        Err(ReminderError::InvalidPhoneNumber(raw.to_string()))
    }
}

pub fn whatsapp_link(contact_number: &str, message: &str) -> Result<String, ReminderError> {
    let digits = normalize_phone(contact_number)?;
    Ok(format!(
        "https://wa.me/{}?text={}",
        digits,
        urlencoding::encode(message)
    ))
}

pub fn call_link(contact_number: &str) -> Result<String, ReminderError> {
    Ok(format!("tel:{}", normalize_phone(contact_number)?))
}

fn rupees(amount: Decimal) -> String {
    format!("₹{}", amount.round_dp(2).normalize())
}

/// Prefilled WhatsApp text for an unpaid invoice.
pub fn whatsapp_message(invoice: &Invoice) -> String {
    format!(
        "Hello {},\n\nThis is a reminder to pay your outstanding invoice of {}. Please make the payment at your earliest convenience.",
        invoice.customer_name,
        rupees(invoice.remaining_amount)
    )
}

/// Email body used when the invoice carries no custom message.
pub fn default_email_message(invoice: &Invoice) -> String {
    format!(
        "Dear {},\n\nThis is a reminder that a payment of {} is still pending. Kindly clear the dues within 5 days.\n\nBest regards,\n{}",
        invoice.customer_name,
        rupees(invoice.remaining_amount),
        invoice.company_name
    )
}

pub fn contact_message(contact: &Contact) -> String {
    if contact.customer_name.trim().is_empty() {
        "Hello,\n\nThis is a reminder to pay your outstanding invoice.".to_string()
    } else {
        format!(
            "Hello {},\n\nThis is a reminder to pay your outstanding invoice. Please make the payment at your earliest convenience.",
            contact.customer_name
        )
    }
}

/// WhatsApp and call links for an unpaid invoice.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReminderLinks {
    pub whatsapp: String,
    pub call: String,
}

impl ReminderLinks {
    pub fn for_invoice(invoice: &Invoice) -> Result<Self, ReminderError> {
        if invoice.customer_name.trim().is_empty() {
            return Err(ReminderError::MissingField("customerName"));
        }
        if invoice.contact_number.trim().is_empty() {
            return Err(ReminderError::MissingField("contactNumber"));
        }
        if invoice.remaining_amount.is_zero() {
            return Err(ReminderError::NothingDue);
        }

        Ok(Self {
            whatsapp: whatsapp_link(&invoice.contact_number, &whatsapp_message(invoice))?,
            call: call_link(&invoice.contact_number)?,
        })
    }
}
