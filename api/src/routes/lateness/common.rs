use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use db::models::lateness_case::{CaseDetail, Model as CaseModel};
use db::models::leave_record::Model as LeaveModel;
use db::models::user::Model as UserModel;
use util::timezone;

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

#[derive(Serialize)]
pub struct CaseResponse {
    pub case: CaseModel,
    pub leave: Option<LeaveModel>,
    pub user: Option<MinimalUser>,
    pub approved_by: Option<MinimalUser>,
}

impl From<CaseDetail> for CaseResponse {
    fn from(detail: CaseDetail) -> Self {
        Self {
            case: detail.case,
            leave: detail.leave,
            user: detail.user.map(MinimalUser::from),
            approved_by: detail.approver.map(MinimalUser::from),
        }
    }
}

/// Archived case row with the bookkeeping instants rendered in
/// facility-local time.
#[derive(Serialize)]
pub struct ArchivedCaseResponse {
    pub id: i64,
    pub leave_id: i64,
    pub user_id: i64,
    pub sanction: Option<String>,
    pub fine: Option<String>,
    pub status: String,
    pub remarks: Option<String>,
    pub time_of_day: Option<String>,
    pub approved_by: Option<i64>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<CaseModel> for ArchivedCaseResponse {
    fn from(case: CaseModel) -> Self {
        Self {
            id: case.id,
            leave_id: case.leave_id,
            user_id: case.user_id,
            sanction: case.sanction,
            fine: case.fine,
            status: case.status,
            remarks: case.remarks,
            time_of_day: case.time_of_day,
            approved_by: case.approved_by,
            created_at: timezone::to_local(case.created_at),
            updated_at: timezone::to_local(case.updated_at),
        }
    }
}
