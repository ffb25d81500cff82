//! In-process publish/subscribe for CRM events.
//!
//! Handlers publish through the `Notifier` trait held in the application
//! state; whoever delivers events onward subscribes to the channel.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::LeadStatus;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CrmEvent {
    #[serde(rename_all = "camelCase")]
    LeadStatusChanged {
        lead_id: Uuid,
        from: LeadStatus,
        to: LeadStatus,
    },
    #[serde(rename_all = "camelCase")]
    InvoiceReminderSent {
        invoice_id: Uuid,
        customer_name: String,
        remaining_amount: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    CalendarEventScheduled {
        event_id: Uuid,
        event: String,
        date: NaiveDate,
    },
}

/// A published event with its timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub event: CrmEvent,
    pub published_utc: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    /// Publish an event. Returns the number of subscribers that received it.
    fn publish(&self, event: CrmEvent) -> usize;

    fn subscribe(&self) -> broadcast::Receiver<Notification>;
}

/// `Notifier` backed by a tokio broadcast channel.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier for BroadcastNotifier {
    fn publish(&self, event: CrmEvent) -> usize {
        let notification = Notification {
            event,
            published_utc: Utc::now(),
        };
        // No subscribers is not an error.
        match self.sender.send(notification) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!("Notification dropped, no subscribers");
                0
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}
