//! Work shift roster endpoints. Thin persistence wrappers over the shift
//! store; the creating user is taken from the bearer token.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::auth::guards::Empty;
use crate::response::{ApiResponse, from_domain_error};
use db::error::DomainError;
use db::models::user::Model as UserModel;
use db::models::work_shift::{Model as ShiftModel, NewWorkShift, UpdateWorkShift};
use util::state::AppState;

pub fn shifts_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shifts).post(create_shift))
        .route("/{shift_id}", put(update_shift).delete(delete_shift))
}

#[derive(Serialize)]
pub struct ShiftResponse {
    pub shift: ShiftModel,
    pub user: Option<MinimalUser>,
}

#[derive(Serialize)]
pub struct MinimalUser {
    pub id: i64,
    pub fullname: String,
    pub email: String,
}

impl From<UserModel> for MinimalUser {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
        }
    }
}

#[derive(Deserialize)]
pub struct ListReq {
    pub user_id: Option<i64>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/shifts
async fn list_shifts(
    State(state): State<AppState>,
    Query(params): Query<ListReq>,
) -> (StatusCode, Json<ApiResponse<Vec<ShiftResponse>>>) {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    match ShiftModel::list(state.db(), params.user_id, page, per_page).await {
        Ok(rows) => {
            let shifts = rows
                .into_iter()
                .map(|(shift, user)| ShiftResponse {
                    shift,
                    user: user.map(MinimalUser::from),
                })
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(shifts, "Shifts retrieved successfully")),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch shifts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve shifts")),
            )
        }
    }
}

#[derive(Deserialize)]
pub struct CreateShiftReq {
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub second_clock_in: Option<DateTime<Utc>>,
    pub second_clock_out: Option<DateTime<Utc>>,
    pub schedule: Option<String>,
    pub remarks: Option<String>,
}

/// POST /api/shifts
async fn create_shift(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<CreateShiftReq>,
) -> (StatusCode, Json<ApiResponse<Option<ShiftModel>>>) {
    let db = state.db();

    match UserModel::exists(db, body.user_id).await {
        Ok(true) => {}
        Ok(false) => {
            return from_domain_error(DomainError::NotFound(format!(
                "User {} not found",
                body.user_id
            )));
        }
        Err(e) => return from_domain_error(e.into()),
    }

    let shift = NewWorkShift {
        user_id: body.user_id,
        start_date: body.start_date,
        end_date: body.end_date,
        clock_in: body.clock_in,
        clock_out: body.clock_out,
        second_clock_in: body.second_clock_in,
        second_clock_out: body.second_clock_out,
        schedule: body.schedule,
        remarks: body.remarks,
        created_by: claims.sub,
    };

    match ShiftModel::create(db, shift).await {
        Ok(shift) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(shift), "Shift created successfully")),
        ),
        Err(e) => from_domain_error(e),
    }
}

#[derive(Deserialize)]
pub struct UpdateShiftReq {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub second_clock_in: Option<DateTime<Utc>>,
    pub second_clock_out: Option<DateTime<Utc>>,
    pub schedule: Option<String>,
    pub remarks: Option<String>,
}

/// PUT /api/shifts/{shift_id}
async fn update_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<i64>,
    Json(body): Json<UpdateShiftReq>,
) -> (StatusCode, Json<ApiResponse<Option<ShiftModel>>>) {
    let fields = UpdateWorkShift {
        start_date: body.start_date,
        end_date: body.end_date,
        clock_in: body.clock_in,
        clock_out: body.clock_out,
        second_clock_in: body.second_clock_in,
        second_clock_out: body.second_clock_out,
        schedule: body.schedule,
        remarks: body.remarks,
    };

    match ShiftModel::update(state.db(), shift_id, fields).await {
        Ok(shift) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(shift), "Shift updated successfully")),
        ),
        Err(e) => from_domain_error(e),
    }
}

/// DELETE /api/shifts/{shift_id}
async fn delete_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match ShiftModel::delete(state.db(), shift_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Shift deleted successfully")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Shift not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to delete shift");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to delete shift")),
            )
        }
    }
}
