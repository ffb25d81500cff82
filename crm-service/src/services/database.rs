//! Database service for crm-service.

use crate::models::{
    CalendarEvent, CalendarEventInput, Complaint, ComplaintInput, Contact, ContactInput, Invoice,
    InvoiceInput, InvoiceTotals, Lead, LeadInput, LeadStatus, Task, TaskInput,
};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::Utc;
use service_core::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

fn query_failed(action: &str, e: sqlx::Error) -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("Failed to {}: {}", action, e))
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool, creating the database file if needed.
    #[instrument(skip(database_url), fields(service = "crm-service"))]
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        info!(max_connections = max_connections, "Connecting to SQLite");

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("SQLite connection pool established");

        Ok(Self { pool })
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Lead Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(company = %input.company_name))]
    pub async fn create_lead(&self, input: &LeadInput) -> Result<Lead, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_lead"])
            .start_timer();

        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (lead_id, company_name, customer_name, contact_number, email_address,
                               address, product_name, amount, gst_number, status, date, end_date,
                               notes, created_utc)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.company_name)
        .bind(&input.customer_name)
        .bind(&input.contact_number)
        .bind(&input.email_address)
        .bind(&input.address)
        .bind(&input.product_name)
        .bind(input.amount.to_string())
        .bind(&input.gst_number)
        .bind(input.status.as_str())
        .bind(input.date)
        .bind(input.end_date)
        .bind(&input.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("create lead", e))?;

        timer.observe_duration();

        info!(lead_id = %lead.lead_id, status = %lead.status, "Lead created");

        Ok(lead)
    }

    #[instrument(skip(self))]
    pub async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_leads"])
            .start_timer();

        let leads = sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY created_utc, rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("list leads", e))?;

        timer.observe_duration();

        Ok(leads)
    }

    #[instrument(skip(self), fields(lead_id = %lead_id))]
    pub async fn get_lead(&self, lead_id: Uuid) -> Result<Option<Lead>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_lead"])
            .start_timer();

        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE lead_id = ?")
            .bind(lead_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("get lead", e))?;

        timer.observe_duration();

        Ok(lead)
    }

    /// Replace every editable field of a lead.
    #[instrument(skip(self, input), fields(lead_id = %lead_id))]
    pub async fn update_lead(
        &self,
        lead_id: Uuid,
        input: &LeadInput,
    ) -> Result<Option<Lead>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_lead"])
            .start_timer();

        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET company_name = ?, customer_name = ?, contact_number = ?, email_address = ?,
                address = ?, product_name = ?, amount = ?, gst_number = ?, status = ?,
                date = ?, end_date = ?, notes = ?
            WHERE lead_id = ?
            RETURNING *
            "#,
        )
        .bind(&input.company_name)
        .bind(&input.customer_name)
        .bind(&input.contact_number)
        .bind(&input.email_address)
        .bind(&input.address)
        .bind(&input.product_name)
        .bind(input.amount.to_string())
        .bind(&input.gst_number)
        .bind(input.status.as_str())
        .bind(input.date)
        .bind(input.end_date)
        .bind(&input.notes)
        .bind(lead_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update lead", e))?;

        timer.observe_duration();

        Ok(lead)
    }

    #[instrument(skip(self), fields(lead_id = %lead_id, status = %status))]
    pub async fn update_lead_status(
        &self,
        lead_id: Uuid,
        status: LeadStatus,
    ) -> Result<Option<Lead>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_lead_status"])
            .start_timer();

        let lead = sqlx::query_as::<_, Lead>(
            "UPDATE leads SET status = ? WHERE lead_id = ? RETURNING *",
        )
        .bind(status.as_str())
        .bind(lead_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update lead status", e))?;

        timer.observe_duration();

        Ok(lead)
    }

    /// Returns `false` when no lead had this id.
    #[instrument(skip(self), fields(lead_id = %lead_id))]
    pub async fn delete_lead(&self, lead_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_lead"])
            .start_timer();

        let result = sqlx::query("DELETE FROM leads WHERE lead_id = ?")
            .bind(lead_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete lead", e))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Contact Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(company = %input.company_name))]
    pub async fn create_contact(&self, input: &ContactInput) -> Result<Contact, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_contact"])
            .start_timer();

        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (contact_id, company_name, customer_name, contact_number,
                                  email_address, address, gst_number, description, created_utc)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.company_name)
        .bind(&input.customer_name)
        .bind(&input.contact_number)
        .bind(&input.email_address)
        .bind(&input.address)
        .bind(&input.gst_number)
        .bind(&input.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("create contact", e))?;

        timer.observe_duration();

        info!(contact_id = %contact.contact_id, "Contact created");

        Ok(contact)
    }

    #[instrument(skip(self))]
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_contacts"])
            .start_timer();

        let contacts =
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts ORDER BY created_utc, rowid")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| query_failed("list contacts", e))?;

        timer.observe_duration();

        Ok(contacts)
    }

    #[instrument(skip(self), fields(contact_id = %contact_id))]
    pub async fn get_contact(&self, contact_id: Uuid) -> Result<Option<Contact>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_contact"])
            .start_timer();

        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE contact_id = ?")
            .bind(contact_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("get contact", e))?;

        timer.observe_duration();

        Ok(contact)
    }

    #[instrument(skip(self, input), fields(contact_id = %contact_id))]
    pub async fn update_contact(
        &self,
        contact_id: Uuid,
        input: &ContactInput,
    ) -> Result<Option<Contact>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_contact"])
            .start_timer();

        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET company_name = ?, customer_name = ?, contact_number = ?, email_address = ?,
                address = ?, gst_number = ?, description = ?
            WHERE contact_id = ?
            RETURNING *
            "#,
        )
        .bind(&input.company_name)
        .bind(&input.customer_name)
        .bind(&input.contact_number)
        .bind(&input.email_address)
        .bind(&input.address)
        .bind(&input.gst_number)
        .bind(&input.description)
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update contact", e))?;

        timer.observe_duration();

        Ok(contact)
    }

    #[instrument(skip(self), fields(contact_id = %contact_id))]
    pub async fn delete_contact(&self, contact_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_contact"])
            .start_timer();

        let result = sqlx::query("DELETE FROM contacts WHERE contact_id = ?")
            .bind(contact_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete contact", e))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    /// Insert an invoice with totals already computed by the caller.
    #[instrument(skip(self, input, totals), fields(company = %input.company_name))]
    pub async fn create_invoice(
        &self,
        input: &InvoiceInput,
        totals: &InvoiceTotals,
    ) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (invoice_id, lead_id, company_name, customer_name, contact_number,
                                  email_address, address, gst_number, product_name, amount,
                                  discount, gst_rate, status, date, total_without_gst,
                                  total_with_gst, paid_amount, remaining_amount, custom_message,
                                  created_utc)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, '', ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.lead_id)
        .bind(&input.company_name)
        .bind(&input.customer_name)
        .bind(&input.contact_number)
        .bind(&input.email_address)
        .bind(&input.address)
        .bind(&input.gst_number)
        .bind(&input.product_name)
        .bind(input.amount.to_string())
        .bind(input.discount.to_string())
        .bind(input.gst_rate.to_string())
        .bind(&input.status)
        .bind(input.date)
        .bind(totals.total_without_gst.to_string())
        .bind(totals.total_with_gst.to_string())
        .bind(input.paid_amount.to_string())
        .bind(totals.remaining_amount.to_string())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("create invoice", e))?;

        timer.observe_duration();

        info!(
            invoice_id = %invoice.invoice_id,
            total_with_gst = %invoice.total_with_gst,
            "Invoice created"
        );

        Ok(invoice)
    }

    #[instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices =
            sqlx::query_as::<_, Invoice>("SELECT * FROM invoices ORDER BY created_utc, rowid")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| query_failed("list invoices", e))?;

        timer.observe_duration();

        Ok(invoices)
    }

    /// Invoices with an outstanding balance.
    #[instrument(skip(self))]
    pub async fn list_unpaid_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_unpaid_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT * FROM invoices
            WHERE CAST(remaining_amount AS REAL) > 0
            ORDER BY created_utc, rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_failed("list unpaid invoices", e))?;

        timer.observe_duration();

        // The REAL cast is only a prefilter; the decimal value decides.
        Ok(invoices.into_iter().filter(Invoice::is_unpaid).collect())
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE invoice_id = ?")
            .bind(invoice_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("get invoice", e))?;

        timer.observe_duration();

        Ok(invoice)
    }

    #[instrument(skip(self, input, totals), fields(invoice_id = %invoice_id))]
    pub async fn update_invoice(
        &self,
        invoice_id: Uuid,
        input: &InvoiceInput,
        totals: &InvoiceTotals,
    ) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET lead_id = ?, company_name = ?, customer_name = ?, contact_number = ?,
                email_address = ?, address = ?, gst_number = ?, product_name = ?, amount = ?,
                discount = ?, gst_rate = ?, status = ?, date = ?, total_without_gst = ?,
                total_with_gst = ?, paid_amount = ?, remaining_amount = ?
            WHERE invoice_id = ?
            RETURNING *
            "#,
        )
        .bind(input.lead_id)
        .bind(&input.company_name)
        .bind(&input.customer_name)
        .bind(&input.contact_number)
        .bind(&input.email_address)
        .bind(&input.address)
        .bind(&input.gst_number)
        .bind(&input.product_name)
        .bind(input.amount.to_string())
        .bind(input.discount.to_string())
        .bind(input.gst_rate.to_string())
        .bind(&input.status)
        .bind(input.date)
        .bind(totals.total_without_gst.to_string())
        .bind(totals.total_with_gst.to_string())
        .bind(input.paid_amount.to_string())
        .bind(totals.remaining_amount.to_string())
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update invoice", e))?;

        timer.observe_duration();

        Ok(invoice)
    }

    #[instrument(skip(self, message), fields(invoice_id = %invoice_id))]
    pub async fn update_custom_message(
        &self,
        invoice_id: Uuid,
        message: &str,
    ) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_custom_message"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET custom_message = ? WHERE invoice_id = ? RETURNING *",
        )
        .bind(message)
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update custom message", e))?;

        timer.observe_duration();

        Ok(invoice)
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn delete_invoice(&self, invoice_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query("DELETE FROM invoices WHERE invoice_id = ?")
            .bind(invoice_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete invoice", e))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Task Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(subject = %input.subject))]
    pub async fn create_task(&self, input: &TaskInput) -> Result<Task, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_task"])
            .start_timer();

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (task_id, subject, name, related_to, due_date, status, priority,
                               assigned, last_reminder_date, last_reminder, created_utc)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.subject)
        .bind(&input.name)
        .bind(&input.related_to)
        .bind(input.due_date)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(&input.assigned)
        .bind(input.last_reminder_date)
        .bind(&input.last_reminder)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("create task", e))?;

        timer.observe_duration();

        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_tasks"])
            .start_timer();

        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_utc, rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("list tasks", e))?;

        timer.observe_duration();

        Ok(tasks)
    }

    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn get_task(&self, task_id: Uuid) -> Result<Option<Task>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_task"])
            .start_timer();

        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE task_id = ?")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("get task", e))?;

        timer.observe_duration();

        Ok(task)
    }

    #[instrument(skip(self, input), fields(task_id = %task_id))]
    pub async fn update_task(
        &self,
        task_id: Uuid,
        input: &TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_task"])
            .start_timer();

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET subject = ?, name = ?, related_to = ?, due_date = ?, status = ?, priority = ?,
                assigned = ?, last_reminder_date = ?, last_reminder = ?
            WHERE task_id = ?
            RETURNING *
            "#,
        )
        .bind(&input.subject)
        .bind(&input.name)
        .bind(&input.related_to)
        .bind(input.due_date)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(&input.assigned)
        .bind(input.last_reminder_date)
        .bind(&input.last_reminder)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update task", e))?;

        timer.observe_duration();

        Ok(task)
    }

    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn delete_task(&self, task_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_task"])
            .start_timer();

        let result = sqlx::query("DELETE FROM tasks WHERE task_id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete task", e))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Complaint Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(subject = %input.subject))]
    pub async fn create_complaint(&self, input: &ComplaintInput) -> Result<Complaint, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_complaint"])
            .start_timer();

        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (complaint_id, complainer_name, contact_number, subject,
                                    case_origin, date, time, case_status, priority, created_utc)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.complainer_name)
        .bind(&input.contact_number)
        .bind(&input.subject)
        .bind(&input.case_origin)
        .bind(&input.date)
        .bind(&input.time)
        .bind(&input.case_status)
        .bind(&input.priority)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("create complaint", e))?;

        timer.observe_duration();

        Ok(complaint)
    }

    #[instrument(skip(self))]
    pub async fn list_complaints(&self) -> Result<Vec<Complaint>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_complaints"])
            .start_timer();

        let complaints =
            sqlx::query_as::<_, Complaint>("SELECT * FROM complaints ORDER BY created_utc, rowid")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| query_failed("list complaints", e))?;

        timer.observe_duration();

        Ok(complaints)
    }

    #[instrument(skip(self), fields(complaint_id = %complaint_id))]
    pub async fn get_complaint(&self, complaint_id: Uuid) -> Result<Option<Complaint>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_complaint"])
            .start_timer();

        let complaint =
            sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE complaint_id = ?")
                .bind(complaint_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| query_failed("get complaint", e))?;

        timer.observe_duration();

        Ok(complaint)
    }

    #[instrument(skip(self, input), fields(complaint_id = %complaint_id))]
    pub async fn update_complaint(
        &self,
        complaint_id: Uuid,
        input: &ComplaintInput,
    ) -> Result<Option<Complaint>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_complaint"])
            .start_timer();

        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints
            SET complainer_name = ?, contact_number = ?, subject = ?, case_origin = ?, date = ?,
                time = ?, case_status = ?, priority = ?
            WHERE complaint_id = ?
            RETURNING *
            "#,
        )
        .bind(&input.complainer_name)
        .bind(&input.contact_number)
        .bind(&input.subject)
        .bind(&input.case_origin)
        .bind(&input.date)
        .bind(&input.time)
        .bind(&input.case_status)
        .bind(&input.priority)
        .bind(complaint_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update complaint", e))?;

        timer.observe_duration();

        Ok(complaint)
    }

    #[instrument(skip(self), fields(complaint_id = %complaint_id))]
    pub async fn delete_complaint(&self, complaint_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_complaint"])
            .start_timer();

        let result = sqlx::query("DELETE FROM complaints WHERE complaint_id = ?")
            .bind(complaint_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete complaint", e))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Calendar Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(date = %input.date))]
    pub async fn create_event(&self, input: &CalendarEventInput) -> Result<CalendarEvent, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_event"])
            .start_timer();

        let event = sqlx::query_as::<_, CalendarEvent>(
            r#"
            INSERT INTO calendar_events (event_id, event, date, created_utc)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.event)
        .bind(input.date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("create calendar event", e))?;

        timer.observe_duration();

        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Vec<CalendarEvent>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_events"])
            .start_timer();

        let events = sqlx::query_as::<_, CalendarEvent>(
            "SELECT * FROM calendar_events ORDER BY date, created_utc, rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_failed("list calendar events", e))?;

        timer.observe_duration();

        Ok(events)
    }

    #[instrument(skip(self, event), fields(event_id = %event_id))]
    pub async fn update_event(
        &self,
        event_id: Uuid,
        event: &str,
    ) -> Result<Option<CalendarEvent>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_event"])
            .start_timer();

        let updated = sqlx::query_as::<_, CalendarEvent>(
            "UPDATE calendar_events SET event = ? WHERE event_id = ? RETURNING *",
        )
        .bind(event)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update calendar event", e))?;

        timer.observe_duration();

        Ok(updated)
    }

    #[instrument(skip(self), fields(event_id = %event_id))]
    pub async fn delete_event(&self, event_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_event"])
            .start_timer();

        let result = sqlx::query("DELETE FROM calendar_events WHERE event_id = ?")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete calendar event", e))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }
}
