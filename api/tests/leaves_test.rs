mod helpers;

use axum::http::{Method, StatusCode};
use chrono::{Datelike, Duration, Utc};
use serde_json::json;
use tower::ServiceExt;

use db::models::lateness_case::Model as CaseModel;
use db::models::leave_record::daily_quota;
use helpers::app::{authed_request, make_test_app, response_json, seed_user, token_for};
use util::timezone;

#[tokio::test]
async fn create_leave_happy_path() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "leave1@test.com", false).await;
    let token = token_for(&user);

    let req = authed_request(
        Method::POST,
        "/api/leaves",
        &token,
        Some(json!({ "user_id": user.id })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = response_json(resp).await;
    assert_eq!(body["data"]["leave"]["status"], "Pending");
    assert_eq!(body["data"]["user"]["id"], user.id);
}

#[tokio::test]
async fn create_leave_rejects_unknown_user_and_open_leave() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "leave2@test.com", false).await;
    let token = token_for(&user);

    let req = authed_request(
        Method::POST,
        "/api/leaves",
        &token,
        Some(json!({ "user_id": 40404 })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = authed_request(
        Method::POST,
        "/api/leaves",
        &token,
        Some(json!({ "user_id": user.id })),
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::CREATED
    );

    let req = authed_request(
        Method::POST,
        "/api/leaves",
        &token,
        Some(json!({ "user_id": user.id })),
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn late_return_opens_a_case() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "leave3@test.com", false).await;
    let token = token_for(&user);

    let depart = Utc::now() - Duration::minutes(30);
    let req = authed_request(
        Method::POST,
        "/api/leaves",
        &token,
        Some(json!({ "user_id": user.id, "depart_at": depart.to_rfc3339() })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let leave_id = response_json(resp).await["data"]["leave"]["id"]
        .as_i64()
        .expect("leave id");

    // Exactly 20 minutes away: 5 minutes past the grace window.
    let return_at = depart + Duration::minutes(20);
    let req = authed_request(
        Method::POST,
        &format!("/api/leaves/{leave_id}/return"),
        &token,
        Some(json!({ "return_at": return_at.to_rfc3339() })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = response_json(resp).await;
    assert_eq!(body["data"]["leave"]["status"], "Lewat Waktu");
    assert_eq!(body["data"]["leave"]["duration"], "20 Menit");

    let case = CaseModel::find_by_leave_id(&db, leave_id)
        .await
        .unwrap()
        .expect("auto-created case");
    assert_eq!(case.status, "Pending");
    assert_eq!(
        case.sanction.as_deref(),
        Some("Kutip sampah / Bersihkan PC / Bersihkan meja")
    );
    assert_eq!(case.fine.as_deref(), Some("300"));

    // A second return on the closed leave is rejected.
    let req = authed_request(
        Method::POST,
        &format!("/api/leaves/{leave_id}/return"),
        &token,
        Some(json!({})),
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn on_time_return_opens_no_case() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "leave4@test.com", false).await;
    let token = token_for(&user);

    let depart = Utc::now() - Duration::minutes(30);
    let req = authed_request(
        Method::POST,
        "/api/leaves",
        &token,
        Some(json!({ "user_id": user.id, "depart_at": depart.to_rfc3339() })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    let leave_id = response_json(resp).await["data"]["leave"]["id"]
        .as_i64()
        .expect("leave id");

    let return_at = depart + Duration::minutes(10);
    let req = authed_request(
        Method::POST,
        &format!("/api/leaves/{leave_id}/return"),
        &token,
        Some(json!({ "return_at": return_at.to_rfc3339() })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = response_json(resp).await;
    assert_eq!(body["data"]["leave"]["status"], "Tepat Waktu");
    assert!(CaseModel::find_by_leave_id(&db, leave_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn daily_quota_is_enforced() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "leave5@test.com", false).await;
    let token = token_for(&user);

    let quota = daily_quota(timezone::now_local().weekday());

    for i in 0..quota {
        let depart = Utc::now() - Duration::minutes(30);
        let req = authed_request(
            Method::POST,
            "/api/leaves",
            &token,
            Some(json!({ "user_id": user.id, "depart_at": depart.to_rfc3339() })),
        );
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED, "create #{i}");
        let leave_id = response_json(resp).await["data"]["leave"]["id"]
            .as_i64()
            .unwrap();

        // Close it so the next create passes the pending check.
        let req = authed_request(
            Method::POST,
            &format!("/api/leaves/{leave_id}/return"),
            &token,
            Some(json!({ "return_at": (depart + Duration::minutes(5)).to_rfc3339() })),
        );
        assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::OK);
    }

    let req = authed_request(
        Method::POST,
        "/api/leaves",
        &token,
        Some(json!({ "user_id": user.id })),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = response_json(resp).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains(&quota.to_string()),
        "message should carry the limit"
    );
}

#[tokio::test]
async fn archive_endpoints_are_admin_only() {
    let (app, db) = make_test_app().await;
    let staff = seed_user(&db, "leave6@test.com", false).await;
    let admin = seed_user(&db, "leave6-admin@test.com", true).await;

    let req = authed_request(Method::POST, "/api/leaves/archive", &token_for(&staff), None);
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::FORBIDDEN
    );

    let req = authed_request(Method::POST, "/api/leaves/archive", &token_for(&admin), None);
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::ACCEPTED
    );

    // No archive table exists yet for an arbitrary old year.
    let req = authed_request(
        Method::GET,
        "/api/leaves/archive/1999",
        &token_for(&admin),
        None,
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn history_and_pending_queries_round_trip() {
    let (app, db) = make_test_app().await;
    let user = seed_user(&db, "leave7@test.com", false).await;
    let token = token_for(&user);

    let req = authed_request(
        Method::POST,
        "/api/leaves",
        &token,
        Some(json!({ "user_id": user.id })),
    );
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::CREATED
    );

    let req = authed_request(
        Method::GET,
        &format!("/api/leaves/pending?user_id={}", user.id),
        &token,
        None,
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = response_json(resp).await;
    assert_eq!(body["data"]["leave"]["user_id"], user.id);

    let req = authed_request(
        Method::GET,
        &format!("/api/leaves?user_id={}", user.id),
        &token,
        None,
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = response_json(resp).await;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
}
