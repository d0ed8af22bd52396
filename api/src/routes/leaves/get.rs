use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::common::{ArchivedLeaveResponse, LeaveResponse};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use db::archive::archived_leave_records;
use db::models::leave_record::Model as LeaveModel;
use util::state::AppState;

#[derive(Deserialize)]
pub struct PendingReq {
    pub user_id: i64,
}

/// GET /api/leaves/pending?user_id=
///
/// The user's open leave, or `null` when there is none.
pub async fn pending_leave(
    State(state): State<AppState>,
    Query(params): Query<PendingReq>,
) -> (StatusCode, Json<ApiResponse<Option<LeaveResponse>>>) {
    match LeaveModel::pending_for_user(state.db(), params.user_id).await {
        Ok(found) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                found.map(LeaveResponse::from_pair),
                "Pending leave retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch pending leave");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve pending leave")),
            )
        }
    }
}

#[derive(Deserialize)]
pub struct HistoryReq {
    pub user_id: i64,
    pub date: Option<NaiveDate>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/leaves?user_id=&date=
///
/// One user's leave history; the optional date filters on the local
/// calendar day.
pub async fn leave_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryReq>,
) -> (StatusCode, Json<ApiResponse<Vec<LeaveResponse>>>) {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(100).clamp(1, 200);

    match LeaveModel::history(state.db(), Some(params.user_id), params.date, page, per_page).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(LeaveResponse::from_pair).collect(),
                "Leave history retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch leave history");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve leave history")),
            )
        }
    }
}

#[derive(Deserialize)]
pub struct PageReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/leaves/all-pending
pub async fn all_pending(
    State(state): State<AppState>,
    Query(params): Query<PageReq>,
) -> (StatusCode, Json<ApiResponse<Vec<LeaveResponse>>>) {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(100).clamp(1, 200);

    match LeaveModel::all_pending(state.db(), page, per_page).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(LeaveResponse::from_pair).collect(),
                "Pending leaves retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch pending leaves");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve pending leaves")),
            )
        }
    }
}

#[derive(Deserialize)]
pub struct AllHistoryReq {
    pub date: Option<NaiveDate>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/leaves/all-history?date=
pub async fn all_history(
    State(state): State<AppState>,
    Query(params): Query<AllHistoryReq>,
) -> (StatusCode, Json<ApiResponse<Vec<LeaveResponse>>>) {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(100).clamp(1, 200);

    match LeaveModel::history(state.db(), None, params.date, page, per_page).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(LeaveResponse::from_pair).collect(),
                "Leave history retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch leave history");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve leave history")),
            )
        }
    }
}

/// GET /api/leaves/{leave_id}
pub async fn get_leave(
    State(state): State<AppState>,
    Path(leave_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<LeaveResponse>>>) {
    match LeaveModel::get_with_user(state.db(), leave_id).await {
        Ok(Some(pair)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(LeaveResponse::from_pair(pair)),
                "Leave record retrieved",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Leave record not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch leave record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve leave record")),
            )
        }
    }
}

/// GET /api/leaves/archive/{year}
///
/// Admin-only. Rows from one year's archive table, with depart/return
/// rendered in local time.
pub async fn archived_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<PageReq>,
) -> (StatusCode, Json<ApiResponse<Vec<ArchivedLeaveResponse>>>) {
    if !claims.admin {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        );
    }

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(100).clamp(1, 200);

    match archived_leave_records(state.db(), year, page, per_page).await {
        Ok(Some(rows)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(ArchivedLeaveResponse::from).collect(),
                "Archived leave records retrieved",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "No leave archive exists for year {year}"
            ))),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch archived leave records");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve archived leave records")),
            )
        }
    }
}
