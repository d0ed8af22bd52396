use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::auth::guards::Empty;
use crate::response::{ApiResponse, from_domain_error};
use db::archive::archive_lateness_cases;
use db::error::DomainError;
use db::models::lateness_case::Model as CaseModel;
use db::models::user::Model as UserModel;
use util::state::AppState;

#[derive(Deserialize)]
pub struct CreateCaseReq {
    pub leave_id: i64,
    pub user_id: i64,
}

/// POST /api/lateness
///
/// Opens a case manually for a leave that was marked late. The sanction and
/// fine are seeded from the leave's depart/return pair when both are set.
pub async fn create_case(
    State(state): State<AppState>,
    Json(body): Json<CreateCaseReq>,
) -> (StatusCode, Json<ApiResponse<Option<CaseModel>>>) {
    let db = state.db();

    match UserModel::exists(db, body.user_id).await {
        Ok(true) => {}
        Ok(false) => {
            return from_domain_error(DomainError::Validation(format!(
                "User {} does not exist",
                body.user_id
            )));
        }
        Err(e) => return from_domain_error(e.into()),
    }

    match CaseModel::create(db, body.leave_id, body.user_id).await {
        Ok(case) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(case), "Lateness case created")),
        ),
        Err(e) => from_domain_error(e),
    }
}

/// POST /api/lateness/archive
///
/// Admin-only. Kicks the lateness archival engine off in the background and
/// acknowledges immediately.
pub async fn trigger_archive(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    if !claims.admin {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        );
    }

    info!(user = claims.sub, "manual lateness archival requested");
    let conn = state.db_clone();
    tokio::spawn(async move {
        match archive_lateness_cases(&conn).await {
            Ok(summary) => info!(
                moved = summary.total_moved(),
                skipped = summary.skipped,
                "manual lateness archival finished"
            ),
            Err(e) => error!(error = %e, "manual lateness archival failed"),
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(
            Empty,
            "Lateness archival started in the background",
        )),
    )
}
