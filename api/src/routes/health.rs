use crate::response::ApiResponse;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use util::{config, state::AppState};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET /api/health
async fn health() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(
        json!({ "project": config::project_name() }),
        "API is running",
    ))
}
