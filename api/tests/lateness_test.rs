mod helpers;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;

use db::models::leave_record::Model as LeaveModel;
use helpers::app::{authed_request, make_test_app, response_json, seed_user, token_for};
use util::timezone;

async fn seed_late_leave(db: &sea_orm::DatabaseConnection, user_id: i64) -> LeaveModel {
    let depart = Utc::now() - Duration::minutes(30);
    let leave = LeaveModel::create(db, user_id, timezone::local_today(), Some(depart), None)
        .await
        .unwrap();
    LeaveModel::record_return(db, leave.id, depart + Duration::minutes(20), None)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_case_validates_references() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "lat1@test.com", false).await;
    let token = token_for(&user);

    // Unknown leave.
    let req = authed_request(
        Method::POST,
        "/api/lateness",
        &token,
        Some(json!({ "leave_id": 40404, "user_id": user.id })),
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::NOT_FOUND
    );

    // Unknown user.
    let leave = seed_late_leave(&db, user.id).await;
    let req = authed_request(
        Method::POST,
        "/api/lateness",
        &token,
        Some(json!({ "leave_id": leave.id, "user_id": 40404 })),
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::BAD_REQUEST
    );

    // Happy path, then duplicate.
    let req = authed_request(
        Method::POST,
        "/api/lateness",
        &token,
        Some(json!({ "leave_id": leave.id, "user_id": user.id })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = response_json(resp).await;
    assert_eq!(body["data"]["status"], "Pending");

    let req = authed_request(
        Method::POST,
        "/api/lateness",
        &token,
        Some(json!({ "leave_id": leave.id, "user_id": user.id })),
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn update_applies_the_approval_workflow() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "lat2@test.com", false).await;
    let admin = seed_user(&db, "lat2-admin@test.com", true).await;
    let admin_token = token_for(&admin);

    let leave = seed_late_leave(&db, user.id).await;
    let req = authed_request(
        Method::POST,
        "/api/lateness",
        &admin_token,
        Some(json!({ "leave_id": leave.id, "user_id": user.id })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    let case_id = response_json(resp).await["data"]["id"].as_i64().unwrap();

    // Excused status without remarks is a validation error.
    let req = authed_request(
        Method::PUT,
        &format!("/api/lateness/{case_id}"),
        &admin_token,
        Some(json!({ "status": "Izin" })),
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::BAD_REQUEST
    );

    // With remarks the transition goes through and records the approver.
    let req = authed_request(
        Method::PUT,
        &format!("/api/lateness/{case_id}"),
        &admin_token,
        Some(json!({ "status": "Izin", "remarks": "Cleared by supervisor" })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = response_json(resp).await;
    assert_eq!(body["data"]["status"], "Izin");
    assert_eq!(body["data"]["remarks"], "Cleared by supervisor");
    assert_eq!(body["data"]["approved_by"], admin.id);
    assert!(body["data"]["time_of_day"].as_str().is_some());
}

#[tokio::test]
async fn list_and_detail_attach_relations() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "lat3@test.com", false).await;
    let token = token_for(&user);

    let leave = seed_late_leave(&db, user.id).await;
    let req = authed_request(
        Method::POST,
        "/api/lateness",
        &token,
        Some(json!({ "leave_id": leave.id, "user_id": user.id })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    let case_id = response_json(resp).await["data"]["id"].as_i64().unwrap();

    let req = authed_request(Method::GET, "/api/lateness", &token, None);
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = response_json(resp).await;
    let cases = body["data"].as_array().expect("case list");
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["case"]["id"], case_id);
    assert_eq!(cases[0]["leave"]["id"], leave.id);
    assert_eq!(cases[0]["user"]["id"], user.id);

    // The year filter keys off the parent leave's date.
    let req = authed_request(Method::GET, "/api/lateness?year=1999", &token, None);
    let resp = app.clone().oneshot(req).await.unwrap();
    let body = response_json(resp).await;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(0));

    let req = authed_request(Method::GET, &format!("/api/lateness/{case_id}"), &token, None);
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = response_json(resp).await;
    assert_eq!(body["data"]["case"]["id"], case_id);
    assert_eq!(body["data"]["leave"]["id"], leave.id);

    // Delete and confirm it is gone.
    let req = authed_request(
        Method::DELETE,
        &format!("/api/lateness/{case_id}"),
        &token,
        None,
    );
    assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::OK);
    let req = authed_request(Method::GET, &format!("/api/lateness/{case_id}"), &token, None);
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::NOT_FOUND
    );
}
