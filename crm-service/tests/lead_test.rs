mod common;

use common::{id_of, lead_body, TestApp};
use crm_service::models::LeadStatus;
use crm_service::services::CrmEvent;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn create_and_fetch_lead() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/lead/createLead", &lead_body("Acme Traders", "Asha", 2500.0))
        .await;
    assert_eq!(status, 201);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "New");
    assert_eq!(body["data"]["companyName"], "Acme Traders");

    let id = id_of(&body);
    let (status, body) = app.get(&format!("/lead/getLead/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["customerName"], "Asha");
    assert_eq!(body["data"]["amount"].as_f64(), Some(2500.0));
}

#[tokio::test]
async fn create_lead_without_company_is_rejected() {
    let app = TestApp::spawn().await;

    let mut body = lead_body("", "Asha", 100.0);
    body["companyName"] = json!("");
    let (status, body) = app.post("/lead/createLead", &body).await;

    assert_eq!(status, 422);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn list_returns_leads_in_creation_order() {
    let app = TestApp::spawn().await;

    app.create_lead(&lead_body("First Co", "Asha", 100.0)).await;
    app.create_lead(&lead_body("Second Co", "Ravi", 200.0)).await;

    let (status, body) = app.get("/lead/getAllLeads").await;
    assert_eq!(status, 200);
    let leads = body["data"].as_array().unwrap();
    assert_eq!(leads.len(), 2);
    assert_eq!(leads[0]["companyName"], "First Co");
    assert_eq!(leads[1]["companyName"], "Second Co");
}

#[tokio::test]
async fn update_and_delete_lead() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 100.0)).await;

    let mut changed = lead_body("Acme Traders Pvt Ltd", "Asha", 150.0);
    changed["status"] = json!("Proposal");
    changed["notes"] = json!("Asked for a demo next week");
    let (status, body) = app.put(&format!("/lead/updateLead/{}", id), &changed).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["companyName"], "Acme Traders Pvt Ltd");
    assert_eq!(body["data"]["status"], "Proposal");
    assert_eq!(body["data"]["notes"], "Asked for a demo next week");

    let (status, _) = app.delete(&format!("/lead/deleteLead/{}", id)).await;
    assert_eq!(status, 200);

    let (status, body) = app.get(&format!("/lead/getLead/{}", id)).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Lead not found");
}

#[tokio::test]
async fn update_lead_status_persists_and_publishes() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 100.0)).await;
    let mut events = app.subscribe();

    let (status, body) = app
        .post(
            "/lead/updateLeadStatus",
            &json!({ "leadId": id, "status": "Demo" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Lead status updated successfully");
    assert_eq!(body["data"]["status"], "Demo");

    let notification = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("no event published")
        .unwrap();
    match notification.event {
        CrmEvent::LeadStatusChanged { lead_id, from, to } => {
            assert_eq!(lead_id.to_string(), id);
            assert_eq!(from, LeadStatus::New);
            assert_eq!(to, LeadStatus::Demo);
        }
        other => panic!("unexpected event {:?}", other),
    }

    let (_, body) = app.get(&format!("/lead/getLead/{}", id)).await;
    assert_eq!(body["data"]["status"], "Demo");
}

#[tokio::test]
async fn update_lead_status_rejects_unknown_status() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 100.0)).await;

    let (status, body) = app
        .post(
            "/lead/updateLeadStatus",
            &json!({ "leadId": id, "status": "Won" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);

    let (_, body) = app.get(&format!("/lead/getLead/{}", id)).await;
    assert_eq!(body["data"]["status"], "New");
}

#[tokio::test]
async fn update_lead_status_rejects_bad_or_unknown_ids() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/lead/updateLeadStatus",
            &json!({ "leadId": "not-a-uuid", "status": "Demo" }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, body) = app
        .post(
            "/lead/updateLeadStatus",
            &json!({ "leadId": uuid::Uuid::new_v4().to_string(), "status": "Demo" }),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn board_groups_leads_by_status() {
    let app = TestApp::spawn().await;
    app.create_lead(&lead_body("First Co", "Asha", 1000.0)).await;
    let second = app.create_lead(&lead_body("Second Co", "Ravi", 250.5)).await;
    app.post(
        "/lead/updateLeadStatus",
        &json!({ "leadId": second, "status": "Decided" }),
    )
    .await;

    let (status, body) = app.get("/lead/board").await;
    assert_eq!(status, 200);

    let board = &body["data"];
    assert_eq!(board["totalLeads"], 2);
    assert_eq!(board["totalDealAmount"].as_f64(), Some(1250.5));
    assert_eq!(board["buckets"]["New"].as_array().unwrap().len(), 1);
    assert_eq!(board["buckets"]["Decided"].as_array().unwrap().len(), 1);
    assert_eq!(board["buckets"]["Demo"].as_array().unwrap().len(), 0);

    let summary = board["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 5);
    assert_eq!(summary[0]["status"], "New");
    assert_eq!(summary[4]["status"], "Decided");
    assert_eq!(summary[4]["amount"].as_f64(), Some(250.5));
}

#[tokio::test]
async fn convert_lead_to_contact_copies_details() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 100.0)).await;

    let (status, body) = app
        .post(&format!("/lead/convertToContact/{}", id), &json!({}))
        .await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["companyName"], "Acme Traders");
    assert_eq!(body["data"]["customerName"], "Asha");
    assert_eq!(body["data"]["gstNumber"], "27AAPFU0939F1ZV");

    let (_, contacts) = app.get("/contact/getAllContacts").await;
    assert_eq!(contacts["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn convert_lead_to_invoice_computes_gst() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 1000.0)).await;

    let (status, body) = app
        .post(
            &format!("/lead/convertToInvoice/{}", id),
            &json!({ "discount": 10, "gstRate": 18, "paidAmount": 500 }),
        )
        .await;
    assert_eq!(status, 201);

    let invoice = &body["data"];
    assert_eq!(invoice["leadId"], id.as_str());
    assert_eq!(invoice["productName"], "Billing Suite");
    assert_eq!(invoice["totalWithoutGst"].as_f64(), Some(900.0));
    assert_eq!(invoice["totalWithGst"].as_f64(), Some(1062.0));
    assert_eq!(invoice["remainingAmount"].as_f64(), Some(562.0));
}

#[tokio::test]
async fn convert_lead_to_invoice_without_body_uses_zero_rates() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 1000.0)).await;

    let response = app
        .client
        .post(app.url(&format!("/lead/convertToInvoice/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["totalWithGst"].as_f64(), Some(1000.0));
    assert_eq!(body["data"]["remainingAmount"].as_f64(), Some(1000.0));
}

#[tokio::test]
async fn convert_unknown_lead_is_not_found() {
    let app = TestApp::spawn().await;
    let missing = uuid::Uuid::new_v4();

    let (status, _) = app
        .post(&format!("/lead/convertToContact/{}", missing), &json!({}))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn convert_lead_without_phone_takes_contact_details_from_form() {
    let app = TestApp::spawn().await;
    let mut body = lead_body("Acme Traders", "Asha", 1000.0);
    body.as_object_mut().unwrap().remove("contactNumber");
    let id = app.create_lead(&body).await;

    let (status, body) = app
        .post(
            &format!("/lead/convertToInvoice/{}", id),
            &json!({
                "gstRate": 18,
                "contactNumber": "98765 43210",
                "address": "7 FC Road, Pune"
            }),
        )
        .await;
    assert_eq!(status, 201, "conversion failed: {}", body);

    let invoice = &body["data"];
    assert_eq!(invoice["contactNumber"], "98765 43210");
    assert_eq!(invoice["address"], "7 FC Road, Pune");
    assert_eq!(invoice["emailAddress"], "asha@example.in");
    assert_eq!(invoice["totalWithGst"].as_f64(), Some(1180.0));
}

#[tokio::test]
async fn convert_lead_without_phone_and_no_form_value_is_rejected() {
    let app = TestApp::spawn().await;
    let mut body = lead_body("Acme Traders", "Asha", 1000.0);
    body.as_object_mut().unwrap().remove("contactNumber");
    let id = app.create_lead(&body).await;

    let (status, body) = app
        .post(
            &format!("/lead/convertToInvoice/{}", id),
            &json!({ "gstRate": 18 }),
        )
        .await;
    assert_eq!(status, 422);
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("Contact number is required"));
}

#[tokio::test]
async fn convert_lead_to_contact_keeps_form_description() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 100.0)).await;

    let (status, body) = app
        .post(
            &format!("/lead/convertToContact/{}", id),
            &json!({ "description": "Signed annual plan" }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["description"], "Signed annual plan");

    let contact_id = id_of(&body);
    let (_, body) = app.get(&format!("/contact/getContact/{}", contact_id)).await;
    assert_eq!(body["data"]["description"], "Signed annual plan");
}
