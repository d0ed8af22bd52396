use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;
use db::models::user::{Column as UserColumn, Entity as UserEntity, Model as UserModel};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FilterReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize, Default)]
pub struct FilterResponse {
    pub users: Vec<UserModel>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<FilterReq>,
) -> (StatusCode, Json<ApiResponse<FilterResponse>>) {
    let db = state.db();
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    let paginator = UserEntity::find()
        .order_by_asc(UserColumn::Fullname)
        .paginate(db, per_page);

    let total = match paginator.num_items().await {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(error = %e, "failed to count users");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve users")),
            );
        }
    };

    match paginator.fetch_page(page - 1).await {
        Ok(users) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                FilterResponse {
                    users,
                    page,
                    per_page,
                    total,
                },
                "Users retrieved successfully",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch users");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve users")),
            )
        }
    }
}

/// GET /api/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<UserModel>>>) {
    match UserEntity::find_by_id(user_id).one(state.db()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(user), "User retrieved successfully")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve user")),
            )
        }
    }
}
