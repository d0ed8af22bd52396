use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;

use super::common::{ArchivedCaseResponse, CaseResponse, MinimalUser};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use db::archive::archived_lateness_cases;
use db::models::lateness_case::Model as CaseModel;
use db::models::user::{Column as UserColumn, Entity as UserEntity, Model as UserModel};
use util::state::AppState;

#[derive(Deserialize)]
pub struct ListReq {
    pub year: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/lateness?year=
///
/// Cases joined with their leave, newest leave date first. The year filter
/// matches the parent leave's calendar year.
pub async fn list_cases(
    State(state): State<AppState>,
    Query(params): Query<ListReq>,
) -> (StatusCode, Json<ApiResponse<Vec<CaseResponse>>>) {
    let db = state.db();
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(100).clamp(1, 200);

    let rows = match CaseModel::list(db, params.year, page, per_page).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch lateness cases");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve lateness cases")),
            );
        }
    };

    // One batched lookup covers both the owners and the approvers.
    let mut user_ids: Vec<i64> = rows.iter().map(|(case, _)| case.user_id).collect();
    user_ids.extend(rows.iter().filter_map(|(case, _)| case.approved_by));
    user_ids.sort_unstable();
    user_ids.dedup();

    let users: HashMap<i64, UserModel> = match UserEntity::find()
        .filter(UserColumn::Id.is_in(user_ids))
        .all(db)
        .await
    {
        Ok(users) => users.into_iter().map(|u| (u.id, u)).collect(),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch case users");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve lateness cases")),
            );
        }
    };

    let cases = rows
        .into_iter()
        .map(|(case, leave)| {
            let user = users.get(&case.user_id).cloned().map(MinimalUser::from);
            let approved_by = case
                .approved_by
                .and_then(|id| users.get(&id).cloned())
                .map(MinimalUser::from);
            CaseResponse {
                case,
                leave,
                user,
                approved_by,
            }
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(cases, "Lateness cases retrieved")),
    )
}

/// GET /api/lateness/{case_id}
pub async fn get_case(
    State(state): State<AppState>,
    Path(case_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<CaseResponse>>>) {
    match CaseModel::get_detail(state.db(), case_id).await {
        Ok(Some(detail)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(CaseResponse::from(detail)),
                "Lateness case retrieved",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Lateness case not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch lateness case");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve lateness case")),
            )
        }
    }
}

#[derive(Deserialize)]
pub struct PageReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/lateness/archive/{year}
///
/// Admin-only. Rows from one year's archive table, bookkeeping instants in
/// local time.
pub async fn archived_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<PageReq>,
) -> (StatusCode, Json<ApiResponse<Vec<ArchivedCaseResponse>>>) {
    if !claims.admin {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        );
    }

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(100).clamp(1, 200);

    match archived_lateness_cases(state.db(), year, page, per_page).await {
        Ok(Some(rows)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(ArchivedCaseResponse::from).collect(),
                "Archived lateness cases retrieved",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "No lateness archive exists for year {year}"
            ))),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch archived lateness cases");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "Failed to retrieve archived lateness cases",
                )),
            )
        }
    }
}
