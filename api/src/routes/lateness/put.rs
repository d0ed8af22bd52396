use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, from_domain_error};
use crate::services::notify;
use db::models::lateness_case::{Model as CaseModel, UpdateLatenessCase};
use util::state::AppState;

/// PUT /api/lateness/{case_id}
///
/// Approval-workflow update. The bearer of the token becomes the approver
/// when the status changes; remarks rules depend on the target status. The
/// case owner is notified of status changes in the background.
pub async fn update_case(
    State(state): State<AppState>,
    Path(case_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<UpdateLatenessCase>,
) -> (StatusCode, Json<ApiResponse<Option<CaseModel>>>) {
    let status_changed = body.status.is_some();

    match CaseModel::update(state.db(), case_id, body, Some(claims.sub)).await {
        Ok(case) => {
            if status_changed {
                notify::notify_user_in_background(
                    state.db_clone(),
                    case.user_id,
                    "Status Sanksi Diperbarui".to_string(),
                    format!("Status sanksi keterlambatan Anda sekarang '{}'.", case.status),
                    json!({
                        "type": "lateness_case_updated",
                        "case_id": case.id.to_string(),
                        "status": case.status.clone(),
                    }),
                );
            }
            (
                StatusCode::OK,
                Json(ApiResponse::success(Some(case), "Lateness case updated")),
            )
        }
        Err(e) => from_domain_error(e),
    }
}
