mod common;

use common::TestApp;

#[tokio::test]
async fn health_reports_database_ok() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "crm-service");
}

#[tokio::test]
async fn ready_and_metrics_respond() {
    let app = TestApp::spawn().await;

    let ready = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(ready.status().as_u16(), 200);

    app.create_lead(&common::lead_body("Acme Traders", "Asha", 10.0))
        .await;

    let metrics = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("crm_leads_total"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get("/lead/nothingHere").await;
    assert_eq!(status, 404);
}
