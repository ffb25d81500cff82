pub mod database;
pub mod email;
pub mod gst;
pub mod metrics;
pub mod notifier;
pub mod reminders;

pub use database::Database;
pub use email::{
    EmailMessage, EmailProvider, LogOnlyEmailProvider, MockEmailProvider, ProviderError,
    SmtpProvider,
};
pub use gst::calculate_gst;
pub use metrics::{get_metrics, init_metrics, record_error};
pub use notifier::{BroadcastNotifier, CrmEvent, Notification, Notifier};
pub use reminders::{ReminderError, ReminderLinks};
