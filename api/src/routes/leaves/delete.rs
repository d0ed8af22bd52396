use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use db::models::lateness_case::Model as CaseModel;
use db::models::leave_record::Model as LeaveModel;
use util::state::AppState;

/// DELETE /api/leaves/{leave_id}
///
/// Removes the leave and any lateness case hanging off it.
pub async fn delete_leave(
    State(state): State<AppState>,
    Path(leave_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    let db = state.db();

    if let Err(e) = CaseModel::delete_by_leave_id(db, leave_id).await {
        tracing::error!(error = %e, leave_id, "failed to delete associated lateness case");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to delete leave record")),
        );
    }

    match LeaveModel::delete(db, leave_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Leave record deleted")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Leave record not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, leave_id, "failed to delete leave record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to delete leave record")),
            )
        }
    }
}
