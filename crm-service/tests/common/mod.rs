#![allow(dead_code)]

use crm_service::config::CrmConfig;
use crm_service::services::{BroadcastNotifier, Database, MockEmailProvider, Notifier};
use crm_service::Application;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub email: Arc<MockEmailProvider>,
    pub notifier: Arc<BroadcastNotifier>,
    // Keeps the database file alive for the lifetime of the app.
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let database_url = format!("sqlite://{}?mode=rwc", dir.path().join("crm.db").display());
        let config = CrmConfig::local(&database_url);

        let db = Database::new(&config.database.url, config.database.max_connections)
            .await
            .expect("Failed to open test database");
        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let email = Arc::new(MockEmailProvider::new());
        let notifier = Arc::new(BroadcastNotifier::default());

        let app = Application::build_with(config, db, email.clone(), notifier.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            email,
            notifier,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request");
        decode(response).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request");
        decode(response).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request");
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request");
        decode(response).await
    }

    pub async fn delete_with_body(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .delete(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request");
        decode(response).await
    }

    /// Create a lead and return its id.
    pub async fn create_lead(&self, body: &Value) -> String {
        let (status, json) = self.post("/lead/createLead", body).await;
        assert_eq!(status, 201, "createLead failed: {}", json);
        id_of(&json)
    }

    pub async fn create_invoice(&self, body: &Value) -> String {
        let (status, json) = self.post("/invoice/invoiceAdd", body).await;
        assert_eq!(status, 201, "invoiceAdd failed: {}", json);
        id_of(&json)
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crm_service::services::Notification> {
        self.notifier.subscribe()
    }
}

async fn decode(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

pub fn id_of(body: &Value) -> String {
    body["data"]["_id"]
        .as_str()
        .expect("response has no data._id")
        .to_string()
}

pub fn lead_body(company: &str, customer: &str, amount: f64) -> Value {
    serde_json::json!({
        "companyName": company,
        "customerName": customer,
        "contactNumber": "98765 43210",
        "emailAddress": format!("{}@example.in", customer.to_lowercase()),
        "address": "12 MG Road, Pune",
        "productName": "Billing Suite",
        "amount": amount,
        "gstNumber": "27AAPFU0939F1ZV"
    })
}

pub fn invoice_body(amount: f64, discount: f64, gst_rate: f64, paid: f64) -> Value {
    serde_json::json!({
        "companyName": "Acme Traders",
        "customerName": "Asha",
        "contactNumber": "+91 98765 43210",
        "emailAddress": "asha@acme.in",
        "address": "12 MG Road, Pune",
        "gstNumber": "27AAPFU0939F1ZV",
        "productName": "Billing Suite",
        "amount": amount,
        "discount": discount,
        "gstRate": gst_rate,
        "paidAmount": paid,
        "status": "Unpaid",
        "date": "2024-03-15"
    })
}
