use axum::{
    Extension, Json,
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use tracing::{error, info};

use super::common::{FlexibleInstant, LeaveResponse, MinimalUser};
use crate::auth::AuthUser;
use crate::auth::guards::Empty;
use crate::response::{ApiResponse, from_domain_error};
use crate::services::notify;
use db::archive::archive_leave_records;
use db::error::DomainError;
use db::models::lateness_case::Model as CaseModel;
use db::models::leave_record::{LeaveStatus, Model as LeaveModel, daily_quota};
use db::models::user::Entity as UserEntity;
use sea_orm::EntityTrait;
use util::{state::AppState, timezone};

#[derive(Deserialize)]
pub struct CreateLeaveReq {
    pub user_id: i64,
    pub date: Option<NaiveDate>,
    pub depart_at: Option<FlexibleInstant>,
    pub depart_ip: Option<String>,
}

/// POST /api/leaves
///
/// Opens a leave for a user. Rejected when the user is unknown, still has
/// an open leave, or has exhausted the daily quota (4, or 6 on Fridays).
pub async fn create_leave(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<CreateLeaveReq>,
) -> (StatusCode, Json<ApiResponse<Option<LeaveResponse>>>) {
    let db = state.db();

    let user = match UserEntity::find_by_id(body.user_id).one(db).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return from_domain_error(DomainError::NotFound(format!(
                "User {} not found",
                body.user_id
            )));
        }
        Err(e) => return from_domain_error(e.into()),
    };

    match LeaveModel::pending_for_user(db, user.id).await {
        Ok(Some(_)) => {
            return from_domain_error(DomainError::Conflict(
                "You still have an open leave that has not been closed (status Pending)"
                    .to_string(),
            ));
        }
        Ok(None) => {}
        Err(e) => return from_domain_error(e.into()),
    }

    let quota = daily_quota(timezone::now_local().weekday());
    match LeaveModel::count_today(db, user.id).await {
        Ok(count) if count >= quota => {
            return from_domain_error(DomainError::QuotaExceeded(format!(
                "{} has reached the daily limit of {quota} leaves for today",
                user.fullname
            )));
        }
        Ok(_) => {}
        Err(e) => return from_domain_error(e.into()),
    }

    let date = body.date.unwrap_or_else(timezone::local_today);
    let depart_at = body.depart_at.map(|f| f.0);
    let depart_ip = body.depart_ip.or_else(|| Some(addr.ip().to_string()));

    match LeaveModel::create(db, user.id, date, depart_at, depart_ip).await {
        Ok(leave) => {
            notify::notify_all_in_background(
                state.db_clone(),
                "Izin Keluar Baru!".to_string(),
                format!("{} baru saja memulai izin keluar.", user.fullname),
                json!({
                    "type": "leave_started",
                    "leave_id": leave.id.to_string(),
                    "user_id": leave.user_id.to_string(),
                }),
            );

            let response = LeaveResponse {
                leave,
                user: Some(MinimalUser::from(user)),
            };
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(Some(response), "Leave record created")),
            )
        }
        Err(e) => from_domain_error(e),
    }
}

#[derive(Deserialize)]
pub struct ReturnReq {
    pub return_at: Option<FlexibleInstant>,
    pub return_ip: Option<String>,
}

/// POST /api/leaves/{leave_id}/return
///
/// Records the return for a pending leave. A late return opens a lateness
/// case automatically when none exists yet; failure to do so is logged and
/// does not fail the request.
pub async fn record_return(
    State(state): State<AppState>,
    Path(leave_id): Path<i64>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<ReturnReq>,
) -> (StatusCode, Json<ApiResponse<Option<LeaveResponse>>>) {
    let db = state.db();

    let return_at = body.return_at.map(|f| f.0).unwrap_or_else(Utc::now);
    let return_ip = body.return_ip.or_else(|| Some(addr.ip().to_string()));

    let leave = match LeaveModel::record_return(db, leave_id, return_at, return_ip).await {
        Ok(leave) => leave,
        Err(e) => return from_domain_error(e),
    };

    if leave.status == LeaveStatus::Late {
        match CaseModel::find_by_leave_id(db, leave.id).await {
            Ok(Some(_)) => {
                info!(leave_id = leave.id, "lateness case already exists");
            }
            Ok(None) => match CaseModel::create(db, leave.id, leave.user_id).await {
                Ok(case) => info!(
                    leave_id = leave.id,
                    case_id = case.id,
                    sanction = ?case.sanction,
                    fine = ?case.fine,
                    "lateness case opened automatically"
                ),
                Err(e) => error!(
                    leave_id = leave.id,
                    error = %e,
                    "failed to open lateness case for late return"
                ),
            },
            Err(e) => error!(
                leave_id = leave.id,
                error = %e,
                "failed to look up lateness case for late return"
            ),
        }
    }

    let user = UserEntity::find_by_id(leave.user_id).one(db).await.ok().flatten();
    let fullname = user
        .as_ref()
        .map(|u| u.fullname.clone())
        .unwrap_or_else(|| "Seorang pengguna".to_string());
    let duration = leave.duration.clone().unwrap_or_default();

    let (title, notif_body) = if leave.status == LeaveStatus::Late {
        (
            "Izin Kembali Lewat Waktu!",
            format!("{fullname} telah kembali dari izin dengan status 'Lewat Waktu'. Durasi: {duration}"),
        )
    } else {
        (
            "Izin Kembali Tepat Waktu!",
            format!("{fullname} telah kembali dari izin dengan status 'Tepat Waktu'. Durasi: {duration}"),
        )
    };
    notify::notify_all_in_background(
        state.db_clone(),
        title.to_string(),
        notif_body,
        json!({
            "type": "leave_returned",
            "leave_id": leave.id.to_string(),
            "user_id": leave.user_id.to_string(),
        }),
    );

    let response = LeaveResponse {
        leave,
        user: user.map(MinimalUser::from),
    };
    (
        StatusCode::OK,
        Json(ApiResponse::success(Some(response), "Return recorded")),
    )
}

/// POST /api/leaves/archive
///
/// Admin-only. Kicks the leave archival engine off in the background and
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

    info!(user = claims.sub, "manual leave archival requested");
    let conn = state.db_clone();
    tokio::spawn(async move {
        match archive_leave_records(&conn).await {
            Ok(summary) => info!(
                moved = summary.total_moved(),
                skipped = summary.skipped,
                "manual leave archival finished"
            ),
            Err(e) => error!(error = %e, "manual leave archival failed"),
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(
            Empty,
            "Leave archival started in the background",
        )),
    )
}
