//! Prometheus metrics for crm-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

/// Recorder for the `metrics` facade used by the HTTP middleware.
static RECORDER_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "crm_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Leads created, by initial status.
pub static LEADS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "crm_leads_total",
        "Total number of leads created by status",
        &["status"]
    )
    .expect("Failed to register leads_total")
});

/// Lead status transitions persisted or refused.
pub static LEAD_TRANSITIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "crm_lead_transitions_total",
        "Lead status transitions by result",
        &["result"] // applied, rejected
    )
    .expect("Failed to register lead_transitions_total")
});

/// Invoice counter by status.
pub static INVOICES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "crm_invoices_total",
        "Total number of invoices by status",
        &["status"]
    )
    .expect("Failed to register invoices_total")
});

/// Payment reminders by channel.
pub static REMINDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "crm_reminders_total",
        "Payment reminders issued by channel",
        &["channel"] // email, links
    )
    .expect("Failed to register reminders_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "crm_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization) and install the
/// process-wide recorder. Safe to call more than once.
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&LEADS_TOTAL);
    Lazy::force(&LEAD_TRANSITIONS_TOTAL);
    Lazy::force(&INVOICES_TOTAL);
    Lazy::force(&REMINDERS_TOTAL);
    Lazy::force(&ERRORS_TOTAL);

    if RECORDER_HANDLE.get().is_none() {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = RECORDER_HANDLE.set(handle);
            }
            Err(e) => tracing::warn!(error = %e, "Metrics recorder not installed"),
        }
    }
}

/// Record an error by its kind.
pub fn record_error(error_type: &str) {
    ERRORS_TOTAL.with_label_values(&[error_type]).inc();
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut output = encoder
        .encode_to_string(&prometheus::gather())
        .unwrap_or_default();

    if let Some(handle) = RECORDER_HANDLE.get() {
        output.push_str(&handle.render());
    }

    output
}
