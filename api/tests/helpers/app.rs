use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, header},
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::net::SocketAddr;

use db::models::role::Model as RoleModel;
use db::models::user::{Model as UserModel, NewUser};
use util::{config::AppConfig, state::AppState};

/// Fresh in-memory application: migrated database + the full router.
pub async fn make_test_app() -> (Router, DatabaseConnection) {
    AppConfig::set_jwt_secret("test-secret");

    let db = db::test_utils::setup_test_db().await;
    let state = AppState::new(db.clone());
    let app = Router::new().nest("/api", api::routes::routes(state));
    (app, db)
}

pub async fn seed_user(db: &DatabaseConnection, email: &str, admin: bool) -> UserModel {
    let role = match RoleModel::find_by_name(db, "Staff").await.expect("query role") {
        Some(role) => role,
        None => RoleModel::create(db, "Staff").await.expect("create role"),
    };
    UserModel::create(
        db,
        NewUser {
            email: email.to_string(),
            password: "password123".to_string(),
            fullname: "Test Staff".to_string(),
            nickname: None,
            gender: None,
            image_url: None,
            join_date: None,
            group_date: None,
            role_id: role.id,
            status: None,
            fcm_token: None,
            admin,
        },
    )
    .await
    .expect("create user")
}

pub fn token_for(user: &UserModel) -> String {
    let (token, _) = api::auth::generate_jwt(user.id, user.admin);
    token
}

/// Request with a bearer token and the connect-info extension the handlers
/// expect.
pub fn authed_request(method: Method, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));

    let mut req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 5173))));
    req
}

pub fn anonymous_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let mut req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 5173))));
    req
}

pub async fn response_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
