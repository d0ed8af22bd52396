use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::{ApiResponse, from_domain_error};
use common::format_validation_errors;
use db::error::DomainError;
use db::models::user::Model as UserModel;
use util::state::AppState;

#[derive(Deserialize, Validate)]
pub struct LoginReq {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize, Default)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: Option<UserModel>,
}

/// POST /api/auth/login
///
/// Verifies the credentials and issues a bearer token carrying the user id
/// and admin flag.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginReq>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    if let Err(errors) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&errors))),
        );
    }

    match UserModel::verify_credentials(state.db(), &body.email, &body.password).await {
        Ok(user) => {
            let (token, expires_at) = generate_jwt(user.id, user.admin);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    LoginResponse {
                        token,
                        expires_at,
                        user: Some(user),
                    },
                    "Login successful",
                )),
            )
        }
        Err(DomainError::Validation(_)) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid email or password")),
        ),
        Err(e) => from_domain_error(e),
    }
}
