use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use db::models::lateness_case::Model as CaseModel;
use util::state::AppState;

/// DELETE /api/lateness/{case_id}
pub async fn delete_case(
    State(state): State<AppState>,
    Path(case_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match CaseModel::delete(state.db(), case_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Lateness case deleted")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Lateness case not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, case_id, "failed to delete lateness case");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to delete lateness case")),
            )
        }
    }
}
