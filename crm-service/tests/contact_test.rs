mod common;

use common::{id_of, TestApp};
use serde_json::{json, Value};

fn contact_body(customer: &str) -> Value {
    json!({
        "companyName": "Acme Traders",
        "customerName": customer,
        "contactNumber": "9876543210",
        "emailAddress": "asha@acme.in",
        "address": "12 MG Road, Pune",
        "gstNumber": "27AAPFU0939F1ZV",
        "description": "Wholesale buyer"
    })
}

#[tokio::test]
async fn contact_crud() {
    let app = TestApp::spawn().await;

    let (status, body) = app.post("/contact/createContact", &contact_body("Asha")).await;
    assert_eq!(status, 201);
    let id = id_of(&body);

    let (status, body) = app
        .put(&format!("/contact/updateContact/{}", id), &contact_body("Asha Rao"))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["customerName"], "Asha Rao");

    let (_, body) = app.get("/contact/getAllContacts").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&format!("/contact/deleteContact/{}", id)).await;
    assert_eq!(status, 200);

    let (status, body) = app.get(&format!("/contact/getContact/{}", id)).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Contact not found");
}

#[tokio::test]
async fn contact_with_bad_email_is_rejected() {
    let app = TestApp::spawn().await;

    let mut body = contact_body("Asha");
    body["emailAddress"] = json!("not-an-email");
    let (status, body) = app.post("/contact/createContact", &body).await;

    assert_eq!(status, 422);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn contact_reminder_is_emailed() {
    let app = TestApp::spawn().await;
    let (_, body) = app.post("/contact/createContact", &contact_body("Asha")).await;
    let id = id_of(&body);

    let (status, body) = app
        .post(&format!("/contact/sendEmailReminder/{}", id), &json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let sent = app.email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "asha@acme.in");
    assert!(sent[0].body_text.starts_with("Hello Asha,"));
}
