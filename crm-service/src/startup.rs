//! Application startup and lifecycle management.

use crate::config::CrmConfig;
use crate::handlers::{self, calendar, complaints, contacts, invoices, leads, tasks};
use crate::services::{
    BroadcastNotifier, Database, EmailProvider, LogOnlyEmailProvider, Notifier, SmtpProvider,
};
use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use service_core::observability::REQUEST_ID_HEADER;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: CrmConfig,
    pub db: Database,
    pub email_provider: Arc<dyn EmailProvider>,
    pub notifier: Arc<dyn Notifier>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: CrmConfig) -> Result<Self, AppError> {
        let db = Database::new(&config.database.url, config.database.max_connections)
            .await
            .map_err(|e| {
                tracing::error!("Failed to open database: {}", e);
                e
            })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            e
        })?;

        let email_provider = email_provider_for(&config);

        Self::build_with(config, db, email_provider, Arc::new(BroadcastNotifier::default())).await
    }

    /// Build around an open database and the given collaborators.
    pub async fn build_with(
        config: CrmConfig,
        db: Database,
        email_provider: Arc<dyn EmailProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        let addr = format!("{}:{}", config.common.host, config.common.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            email_delivery = email_provider.is_enabled(),
            "CRM service: HTTP on port {}",
            port
        );

        Ok(Self {
            port,
            listener,
            state: AppState {
                config,
                db,
                email_provider,
                notifier,
            },
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

/// SMTP when enabled and valid, otherwise a provider that only logs.
pub fn email_provider_for(config: &CrmConfig) -> Arc<dyn EmailProvider> {
    if config.smtp.enabled {
        match SmtpProvider::new(config.smtp.clone()) {
            Ok(provider) => {
                tracing::info!("SMTP email provider initialized");
                return Arc::new(provider);
            }
            Err(e) => {
                tracing::warn!("Failed to initialize SMTP provider: {}. Logging emails only.", e);
            }
        }
    } else {
        tracing::info!("SMTP provider disabled, logging emails only");
    }
    Arc::new(LogOnlyEmailProvider::new())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Leads
        .route("/lead/createLead", post(leads::create_lead))
        .route("/lead/getAllLeads", get(leads::get_all_leads))
        .route("/lead/getLead/:id", get(leads::get_lead))
        .route("/lead/updateLead/:id", put(leads::update_lead))
        .route("/lead/deleteLead/:id", delete(leads::delete_lead))
        .route("/lead/updateLeadStatus", post(leads::update_lead_status))
        .route("/lead/board", get(leads::board))
        .route("/lead/convertToContact/:id", post(leads::convert_to_contact))
        .route("/lead/convertToInvoice/:id", post(leads::convert_to_invoice))
        // Contacts
        .route("/contact/createContact", post(contacts::create_contact))
        .route("/contact/getAllContacts", get(contacts::get_all_contacts))
        .route("/contact/getContact/:id", get(contacts::get_contact))
        .route("/contact/updateContact/:id", put(contacts::update_contact))
        .route("/contact/deleteContact/:id", delete(contacts::delete_contact))
        .route(
            "/contact/sendEmailReminder/:id",
            post(contacts::send_email_reminder),
        )
        // Invoices
        .route("/invoice/invoiceAdd", post(invoices::invoice_add))
        .route("/invoice/getAllInvoices", get(invoices::get_all_invoices))
        .route("/invoice/getInvoice/:id", get(invoices::get_invoice))
        .route("/invoice/updateInvoice/:id", put(invoices::update_invoice))
        .route("/invoice/deleteInvoice/:id", delete(invoices::delete_invoice))
        .route(
            "/invoice/getUnpaidInvoices",
            get(invoices::get_unpaid_invoices),
        )
        .route(
            "/invoice/updateCustomeMessage/:id",
            put(invoices::update_custom_message),
        )
        .route(
            "/invoice/sendEmailReminder/:id",
            post(invoices::send_email_reminder),
        )
        .route("/invoice/reminderLinks/:id", get(invoices::reminder_links))
        // Tasks
        .route("/task/createTask", post(tasks::create_task))
        .route("/task/getAllTasks", get(tasks::get_all_tasks))
        .route("/task/getTask/:id", get(tasks::get_task))
        .route("/task/updateTask/:id", put(tasks::update_task))
        .route("/task/deleteTask/:id", delete(tasks::delete_task))
        // Complaints
        .route("/complaint/createComplaint", post(complaints::create_complaint))
        .route(
            "/complaint/getAllComplaints",
            get(complaints::get_all_complaints),
        )
        .route("/complaint/getComplaint/:id", get(complaints::get_complaint))
        .route(
            "/complaint/updateComplaint/:id",
            put(complaints::update_complaint),
        )
        .route(
            "/complaint/deleteComplaint/:id",
            delete(complaints::delete_complaint),
        )
        // Calendar
        .route("/calender/createData", post(calendar::create_data))
        .route("/calender/getAllData", get(calendar::get_all_data))
        .route("/calender/updateData/:id", put(calendar::update_data))
        .route("/calender/deleteData", delete(calendar::delete_data))
}

/// Full HTTP surface: probes, metrics and `/api/v1`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/api/v1", api_routes())
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_smtp_falls_back_to_log_only_provider() {
        let config = CrmConfig::local("sqlite::memory:");
        assert!(!email_provider_for(&config).is_enabled());
    }

    #[tokio::test]
    async fn enabled_smtp_uses_real_delivery() {
        let mut config = CrmConfig::local("sqlite::memory:");
        config.smtp.enabled = true;
        config.smtp.host = "smtp.example.com".to_string();
        assert!(email_provider_for(&config).is_enabled());
    }
}
