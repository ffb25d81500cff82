mod common;

use common::{lead_body, TestApp};
use crm_service::client::{
    move_lead, GatewayError, HttpLeadStatusGateway, LeadBoard, LeadStatusGateway,
    TransitionOutcome, TransitionRejected, TransitionState, UPDATE_LEAD_STATUS_PATH,
};
use crm_service::models::{Lead, LeadStatus};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn fetch_lead(app: &TestApp, id: &str) -> Lead {
    let (status, body) = app.get(&format!("/lead/getLead/{}", id)).await;
    assert_eq!(status, 200);
    serde_json::from_value(body["data"].clone()).expect("lead did not decode")
}

#[tokio::test]
async fn gateway_posts_id_and_status() {
    let server = MockServer::start().await;
    let lead_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(UPDATE_LEAD_STATUS_PATH))
        .and(body_json(json!({ "leadId": lead_id.to_string(), "status": "Proposal" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpLeadStatusGateway::new(server.uri());
    let response = gateway
        .update_status(lead_id, LeadStatus::Proposal)
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.message, None);
}

#[tokio::test]
async fn gateway_decodes_refusals() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPDATE_LEAD_STATUS_PATH))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "message": "Lead not found" })),
        )
        .mount(&server)
        .await;

    let gateway = HttpLeadStatusGateway::new(format!("{}/", server.uri()));
    let response = gateway
        .update_status(Uuid::new_v4(), LeadStatus::Demo)
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Lead not found"));
}

#[tokio::test]
async fn gateway_reports_unreadable_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let gateway = HttpLeadStatusGateway::new(server.uri());
    let err = gateway
        .update_status(Uuid::new_v4(), LeadStatus::Demo)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn gateway_reports_unreachable_server() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let gateway = HttpLeadStatusGateway::new(format!("http://127.0.0.1:{}", port));
    let err = gateway
        .update_status(Uuid::new_v4(), LeadStatus::Demo)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
}

#[tokio::test]
async fn board_move_is_persisted_by_the_service() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 1000.0)).await;
    let lead = fetch_lead(&app, &id).await;

    let mut board = LeadBoard::from_leads(vec![lead.clone()]);
    let gateway = HttpLeadStatusGateway::new(app.address.clone());

    let outcome = move_lead(&mut board, &gateway, &lead, LeadStatus::New, LeadStatus::Discussion).await;

    assert_eq!(outcome, TransitionOutcome::Committed);
    assert!(board.bucket(LeadStatus::New).is_empty());
    assert_eq!(board.bucket(LeadStatus::Discussion)[0].lead_id, lead.lead_id);
    assert_eq!(board.state_of(lead.lead_id), TransitionState::Settled);
    assert_eq!(fetch_lead(&app, &id).await.status, LeadStatus::Discussion);
}

#[tokio::test]
async fn board_move_of_deleted_lead_rolls_back() {
    let app = TestApp::spawn().await;
    let id = app.create_lead(&lead_body("Acme Traders", "Asha", 1000.0)).await;
    let lead = fetch_lead(&app, &id).await;
    app.delete(&format!("/lead/deleteLead/{}", id)).await;

    let mut board = LeadBoard::from_leads(vec![lead.clone()]);
    let gateway = HttpLeadStatusGateway::new(app.address.clone());

    let outcome = move_lead(&mut board, &gateway, &lead, LeadStatus::New, LeadStatus::Demo).await;

    assert_eq!(
        outcome,
        TransitionOutcome::RolledBack(TransitionRejected::Refused("Lead not found".to_string()))
    );
    assert_eq!(board.bucket(LeadStatus::New), &[lead][..]);
    assert!(board.bucket(LeadStatus::Demo).is_empty());
}
