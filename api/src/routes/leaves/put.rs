use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::common::{FlexibleInstant, LeaveResponse, MinimalUser};
use crate::response::{ApiResponse, from_domain_error};
use db::error::DomainError;
use db::models::leave_record::{Model as LeaveModel, UpdateLeaveRecord};
use db::models::user::Model as UserModel;
use sea_orm::EntityTrait;
use util::state::AppState;

/// Unknown payload fields (legacy clients still send a role-title field)
/// are dropped on deserialization.
#[derive(Deserialize)]
pub struct UpdateLeaveReq {
    pub user_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub depart_at: Option<FlexibleInstant>,
    pub depart_ip: Option<String>,
    pub return_at: Option<FlexibleInstant>,
    pub return_ip: Option<String>,
}

/// PUT /api/leaves/{leave_id}
///
/// Free-form admin patch; duration and status are re-derived from the
/// resulting depart/return pair.
pub async fn update_leave(
    State(state): State<AppState>,
    Path(leave_id): Path<i64>,
    Json(body): Json<UpdateLeaveReq>,
) -> (StatusCode, Json<ApiResponse<Option<LeaveResponse>>>) {
    let db = state.db();

    if let Some(user_id) = body.user_id {
        match UserModel::exists(db, user_id).await {
            Ok(true) => {}
            Ok(false) => {
                return from_domain_error(DomainError::Validation(format!(
                    "User {user_id} does not exist"
                )));
            }
            Err(e) => return from_domain_error(e.into()),
        }
    }

    let fields = UpdateLeaveRecord {
        user_id: body.user_id,
        date: body.date,
        depart_at: body.depart_at.map(|f| f.0),
        depart_ip: body.depart_ip,
        return_at: body.return_at.map(|f| f.0),
        return_ip: body.return_ip,
    };

    match LeaveModel::update(db, leave_id, fields).await {
        Ok(leave) => {
            let user = db::models::user::Entity::find_by_id(leave.user_id)
                .one(db)
                .await
                .ok()
                .flatten();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(LeaveResponse {
                        leave,
                        user: user.map(MinimalUser::from),
                    }),
                    "Leave record updated",
                )),
            )
        }
        Err(e) => from_domain_error(e),
    }
}
