//! crm-service: leads, contacts, GST invoicing, tasks, complaints and a
//! shared calendar behind one HTTP API.
pub mod client;
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{AppState, Application};
