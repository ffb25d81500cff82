mod common;

use common::{id_of, TestApp};
use crm_service::services::CrmEvent;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn events_are_listed_by_date() {
    let app = TestApp::spawn().await;

    app.post(
        "/calender/createData",
        &json!({ "event": "Quarterly review", "date": "2024-06-30" }),
    )
    .await;
    let (status, _) = app
        .post(
            "/calender/createData",
            &json!({ "event": "Demo for Acme", "date": "2024-04-02" }),
        )
        .await;
    assert_eq!(status, 201);

    let (status, body) = app.get("/calender/getAllData").await;
    assert_eq!(status, 200);
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "Demo for Acme");
    assert_eq!(events[1]["date"], "2024-06-30");
}

#[tokio::test]
async fn scheduling_publishes_an_event() {
    let app = TestApp::spawn().await;
    let mut events = app.subscribe();

    app.post(
        "/calender/createData",
        &json!({ "event": "Demo for Acme", "date": "2024-04-02" }),
    )
    .await;

    let notification = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("no event published")
        .unwrap();
    assert!(matches!(
        notification.event,
        CrmEvent::CalendarEventScheduled { ref event, .. } if event == "Demo for Acme"
    ));
}

#[tokio::test]
async fn rename_and_delete_event() {
    let app = TestApp::spawn().await;
    let (_, body) = app
        .post(
            "/calender/createData",
            &json!({ "event": "Demo", "date": "2024-04-02" }),
        )
        .await;
    let id = id_of(&body);

    let (status, body) = app
        .put(
            &format!("/calender/updateData/{}", id),
            &json!({ "event": "Demo for Acme" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["event"], "Demo for Acme");
    assert_eq!(body["data"]["date"], "2024-04-02");

    let (status, _) = app
        .delete_with_body("/calender/deleteData", &json!({ "id": id }))
        .await;
    assert_eq!(status, 200);

    let (status, body) = app
        .delete_with_body("/calender/deleteData", &json!({ "id": id }))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Event not found");
}
