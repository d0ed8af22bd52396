//! Lateness cases ("data telat"): one penalty case per leave record whose
//! return exceeded the grace window, carrying an approval workflow on top of
//! the computed sanction and fine.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::lateness;
use crate::models::leave_record;
use util::timezone;

/// Workflow labels with special handling. Other labels are admin-defined
/// and pass through untouched.
pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_DONE: &str = "Done";
/// Statuses that require an explanation from the approver.
pub const REMARKS_REQUIRED: [&str; 2] = ["Izin", "Kendala"];
const DONE_DEFAULT_REMARKS: &str = "Done Sanksi";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "lateness_cases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub leave_id: i64,
    pub user_id: i64,
    pub sanction: Option<String>,
    /// Fine amount, persisted as text to match the stored schema.
    pub fine: Option<String>,
    pub status: String,
    pub remarks: Option<String>,
    /// Local wall-clock `HH:MM:SS` recorded at the last status change.
    pub time_of_day: Option<String>,
    pub approved_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::leave_record::Entity",
        from = "Column::LeaveId",
        to = "super::leave_record::Column::Id"
    )]
    Leave,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ApprovedBy",
        to = "super::user::Column::Id"
    )]
    Approver,
}

impl Related<super::leave_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leave.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Distinguishes "field absent" (`None`) from "field present but null"
/// (`Some(None)`), which the workflow rules below care about.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Approval-workflow patch for a case.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLatenessCase {
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub remarks: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub time_of_day: Option<Option<String>>,
    pub sanction: Option<String>,
    pub fine: Option<String>,
    pub user_id: Option<i64>,
}

/// A case joined with everything the admin screens show.
#[derive(Debug, Serialize)]
pub struct CaseDetail {
    pub case: Model,
    pub leave: Option<leave_record::Model>,
    pub user: Option<super::user::Model>,
    pub approver: Option<super::user::Model>,
}

impl Model {
    /// Opens a case for a leave record. Sanction and fine are seeded from
    /// the lateness policy when the leave already has both timestamps.
    pub async fn create(db: &DbConn, leave_id: i64, user_id: i64) -> DomainResult<Model> {
        let leave = leave_record::Entity::find_by_id(leave_id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Leave record {leave_id} not found")))?;

        if Self::find_by_leave_id(db, leave_id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "A lateness case for leave record {leave_id} already exists"
            )));
        }

        let (sanction, fine) = match (leave.depart_at, leave.return_at) {
            (Some(depart), Some(ret)) => {
                let penalty = lateness::evaluate(depart, ret);
                (Some(penalty.sanction), Some(penalty.fine))
            }
            _ => (None, None),
        };

        let now = Utc::now();
        let active_model = ActiveModel {
            leave_id: Set(leave_id),
            user_id: Set(user_id),
            sanction: Set(sanction),
            fine: Set(fine),
            status: Set(STATUS_PENDING.to_string()),
            remarks: Set(None),
            time_of_day: Set(None),
            approved_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(active_model.insert(db).await?)
    }

    /// Applies an approval-workflow update.
    ///
    /// Rules, in order:
    /// - a status change records the acting user as approver;
    /// - the time-of-day stamp is forced to the current local time unless
    ///   the payload carries an explicit non-null value (a null in the
    ///   payload never persists);
    /// - `Done` defaults blank remarks to "Done Sanksi"; the statuses in
    ///   [`REMARKS_REQUIRED`] reject blank remarks; any other status takes
    ///   the payload value or clears the field;
    /// - when the payload touches neither sanction nor fine, both are
    ///   recomputed from the parent leave as currently stored.
    pub async fn update(
        db: &DbConn,
        id: i64,
        fields: UpdateLatenessCase,
        acting_user: Option<i64>,
    ) -> DomainResult<Model> {
        let case = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Lateness case {id} not found")))?;

        let old_status = case.status.clone();
        let leave_id = case.leave_id;
        let mut active_model: ActiveModel = case.into();

        if let Some(new_status) = &fields.status {
            if *new_status != old_status {
                if let Some(uid) = acting_user {
                    active_model.approved_by = Set(Some(uid));
                }
            }
        }

        match &fields.time_of_day {
            Some(Some(value)) => active_model.time_of_day = Set(Some(value.clone())),
            _ => active_model.time_of_day = Set(Some(timezone::local_time_of_day_string())),
        }

        let remarks_value = fields.remarks.clone().flatten();
        let remarks_blank = remarks_value
            .as_deref()
            .map(|r| r.trim().is_empty())
            .unwrap_or(true);

        if let Some(new_status) = &fields.status {
            active_model.status = Set(new_status.clone());

            if new_status == STATUS_DONE {
                let remarks = if remarks_blank {
                    DONE_DEFAULT_REMARKS.to_string()
                } else {
                    remarks_value.clone().unwrap_or_default()
                };
                active_model.remarks = Set(Some(remarks));
            } else if REMARKS_REQUIRED.contains(&new_status.as_str()) {
                if remarks_blank {
                    return Err(DomainError::Validation(format!(
                        "Remarks are required when status is '{new_status}'"
                    )));
                }
                active_model.remarks = Set(remarks_value.clone());
            } else if let Some(supplied) = fields.remarks.clone() {
                active_model.remarks = Set(supplied);
            } else {
                active_model.remarks = Set(None);
            }
        } else if let Some(supplied) = fields.remarks.clone() {
            active_model.remarks = Set(supplied);
        }

        if let Some(uid) = fields.user_id {
            active_model.user_id = Set(uid);
        }
        if let Some(sanction) = &fields.sanction {
            active_model.sanction = Set(Some(sanction.clone()));
        }
        if let Some(fine) = &fields.fine {
            active_model.fine = Set(Some(fine.clone()));
        }

        if fields.sanction.is_none() && fields.fine.is_none() {
            let leave = leave_record::Entity::find_by_id(leave_id).one(db).await?;
            if let Some(leave) = leave {
                match (leave.depart_at, leave.return_at) {
                    (Some(depart), Some(ret)) => {
                        let penalty = lateness::evaluate(depart, ret);
                        active_model.sanction = Set(Some(penalty.sanction));
                        active_model.fine = Set(Some(penalty.fine));
                    }
                    _ => {
                        active_model.sanction = Set(None);
                        active_model.fine = Set(Some("0".to_string()));
                    }
                }
            }
        }

        active_model.updated_at = Set(Utc::now());
        Ok(active_model.update(db).await?)
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    /// Removes the case tied to a leave record, if one exists. Used when a
    /// leave is deleted or archived; an absent case is not an error.
    pub async fn delete_by_leave_id<C: ConnectionTrait>(
        conn: &C,
        leave_id: i64,
    ) -> Result<bool, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::LeaveId.eq(leave_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn find_by_leave_id(db: &DbConn, leave_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::LeaveId.eq(leave_id))
            .one(db)
            .await
    }

    /// Case with its leave, owner and approver attached.
    pub async fn get_detail(db: &DbConn, id: i64) -> Result<Option<CaseDetail>, DbErr> {
        let Some((case, leave)) = Entity::find_by_id(id)
            .find_also_related(leave_record::Entity)
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        let user = super::user::Entity::find_by_id(case.user_id).one(db).await?;
        let approver = match case.approved_by {
            Some(uid) => super::user::Entity::find_by_id(uid).one(db).await?,
            None => None,
        };

        Ok(Some(CaseDetail {
            case,
            leave,
            user,
            approver,
        }))
    }

    /// Cases joined with their parent leave, newest leave date first. The
    /// optional filter is on the **parent leave's** calendar year, not the
    /// case's own creation year.
    pub async fn list(
        db: &DbConn,
        year: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<(Model, Option<leave_record::Model>)>, DbErr> {
        let mut query = Entity::find().find_also_related(leave_record::Entity);
        if let Some(year) = year {
            let (start, end) = year_bounds(year)?;
            query = query
                .filter(leave_record::Column::Date.gte(start))
                .filter(leave_record::Column::Date.lt(end));
        }
        query
            .order_by_desc(leave_record::Column::Date)
            .order_by_desc(Column::CreatedAt)
            .paginate(db, per_page)
            .fetch_page(page.saturating_sub(1))
            .await
    }
}

/// Half-open `[Jan 1 year, Jan 1 year+1)` date range.
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), DbErr> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| DbErr::Custom(format!("Invalid year {year}")))?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .ok_or_else(|| DbErr::Custom(format!("Invalid year {year}")))?;
    Ok((start, end))
}
