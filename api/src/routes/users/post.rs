use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::response::{ApiResponse, from_domain_error};
use common::format_validation_errors;
use db::models::user::{Model as UserModel, NewUser};
use util::state::AppState;

#[derive(Deserialize, Validate)]
pub struct CreateUserReq {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Fullname is required"))]
    pub fullname: String,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub group_date: Option<NaiveDate>,
    pub role_id: i64,
    pub status: Option<String>,
    pub fcm_token: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

/// POST /api/users
///
/// Registers a staff account. A duplicate email answers 409; an unknown
/// role answers 400.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserReq>,
) -> (StatusCode, Json<ApiResponse<Option<UserModel>>>) {
    if let Err(errors) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&errors))),
        );
    }

    let new_user = NewUser {
        email: body.email,
        password: body.password,
        fullname: body.fullname,
        nickname: body.nickname,
        gender: body.gender,
        image_url: body.image_url,
        join_date: body.join_date,
        group_date: body.group_date,
        role_id: body.role_id,
        status: body.status,
        fcm_token: body.fcm_token,
        admin: body.admin,
    };

    match UserModel::create(state.db(), new_user).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(user), "User created successfully")),
        ),
        Err(e) => from_domain_error(e),
    }
}
