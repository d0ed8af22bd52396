//! Role management. Thin persistence wrappers, admin-only.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder};
use serde::Deserialize;

use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use db::models::role::{
    ActiveModel as RoleActiveModel, Column as RoleColumn, Entity as RoleEntity, Model as RoleModel,
};
use util::state::AppState;

pub fn roles_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/{role_id}", put(update_role).delete(delete_role))
}

#[derive(Deserialize)]
pub struct RoleReq {
    pub name: String,
}

/// GET /api/roles
async fn list_roles(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<RoleModel>>>) {
    match RoleEntity::find()
        .order_by_asc(RoleColumn::Name)
        .all(state.db())
        .await
    {
        Ok(roles) => (
            StatusCode::OK,
            Json(ApiResponse::success(roles, "Roles retrieved successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch roles");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve roles")),
            )
        }
    }
}

/// POST /api/roles
async fn create_role(
    State(state): State<AppState>,
    Json(body): Json<RoleReq>,
) -> (StatusCode, Json<ApiResponse<Option<RoleModel>>>) {
    let db = state.db();
    if body.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Role name is required")),
        );
    }
    match RoleModel::find_by_name(db, &body.name).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error(format!(
                    "Role '{}' already exists",
                    body.name
                ))),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "failed to check role name");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create role")),
            );
        }
    }

    match RoleModel::create(db, &body.name).await {
        Ok(role) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(role), "Role created successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to create role");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create role")),
            )
        }
    }
}

/// PUT /api/roles/{role_id}
async fn update_role(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(body): Json<RoleReq>,
) -> (StatusCode, Json<ApiResponse<Option<RoleModel>>>) {
    let db = state.db();
    let Ok(found) = RoleEntity::find_by_id(role_id).one(db).await else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to retrieve role")),
        );
    };
    let Some(role) = found else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Role not found")),
        );
    };

    let mut active_model: RoleActiveModel = role.into();
    active_model.name = Set(body.name);
    active_model.updated_at = Set(Utc::now());
    match active_model.update(db).await {
        Ok(role) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(role), "Role updated successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to update role");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update role")),
            )
        }
    }
}

/// DELETE /api/roles/{role_id}
async fn delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match RoleEntity::delete_by_id(role_id).exec(state.db()).await {
        Ok(res) if res.rows_affected > 0 => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Role deleted successfully")),
        ),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Role not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to delete role");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to delete role")),
            )
        }
    }
}
