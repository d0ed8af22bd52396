use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde::Deserialize;

use crate::response::ApiResponse;
use db::models::role::Model as RoleModel;
use db::models::user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
use util::state::AppState;

#[derive(Deserialize)]
pub struct UpdateUserReq {
    pub fullname: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub group_date: Option<NaiveDate>,
    pub role_id: Option<i64>,
    pub status: Option<String>,
    pub fcm_token: Option<String>,
    pub admin: Option<bool>,
}

/// PUT /api/users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(body): Json<UpdateUserReq>,
) -> (StatusCode, Json<ApiResponse<Option<UserModel>>>) {
    let db = state.db();

    let Ok(found) = UserEntity::find_by_id(user_id).one(db).await else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to retrieve user")),
        );
    };
    let Some(user) = found else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        );
    };

    if let Some(role_id) = body.role_id {
        match RoleModel::exists(db, role_id).await {
            Ok(true) => {}
            Ok(false) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!("Role {role_id} does not exist"))),
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to check role");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("Failed to update user")),
                );
            }
        }
    }

    let mut active_model: UserActiveModel = user.into();
    if let Some(v) = body.fullname {
        active_model.fullname = Set(v);
    }
    if let Some(v) = body.nickname {
        active_model.nickname = Set(Some(v));
    }
    if let Some(v) = body.gender {
        active_model.gender = Set(Some(v));
    }
    if let Some(v) = body.image_url {
        active_model.image_url = Set(Some(v));
    }
    if let Some(v) = body.join_date {
        active_model.join_date = Set(v);
    }
    if let Some(v) = body.group_date {
        active_model.group_date = Set(v);
    }
    if let Some(v) = body.role_id {
        active_model.role_id = Set(v);
    }
    if let Some(v) = body.status {
        active_model.status = Set(v);
    }
    if let Some(v) = body.fcm_token {
        active_model.fcm_token = Set(Some(v));
    }
    if let Some(v) = body.admin {
        active_model.admin = Set(v);
    }
    active_model.updated_at = Set(Utc::now());

    match active_model.update(db).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(user), "User updated successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to update user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update user")),
            )
        }
    }
}
