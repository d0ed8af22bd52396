//! Leave records ("izin"): one row per out-of-office event, from departure
//! through return.
//!
//! The `duration` and `status` columns are derived state. They are recomputed
//! from the depart/return pair on every write that touches either timestamp;
//! a record stays `Pending` for as long as it has no return.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{DomainError, DomainResult};
use crate::lateness::{self, GRACE_SECONDS};
use util::timezone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "leave_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    /// Facility-local calendar date of the leave.
    pub date: NaiveDate,
    pub depart_at: Option<DateTime<Utc>>,
    pub depart_ip: Option<String>,
    pub return_at: Option<DateTime<Utc>>,
    pub return_ip: Option<String>,
    pub duration: Option<String>,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored by display label; the mobile and admin clients match on these
/// exact strings.
#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LeaveStatus {
    #[sea_orm(string_value = "Pending")]
    #[strum(serialize = "Pending")]
    #[serde(rename = "Pending")]
    Pending,
    #[sea_orm(string_value = "Tepat Waktu")]
    #[strum(serialize = "Tepat Waktu")]
    #[serde(rename = "Tepat Waktu")]
    OnTime,
    #[sea_orm(string_value = "Lewat Waktu")]
    #[strum(serialize = "Lewat Waktu")]
    #[serde(rename = "Lewat Waktu")]
    Late,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_one = "super::lateness_case::Entity")]
    LatenessCase,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::lateness_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LatenessCase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Admin-side patch. Absent fields are left untouched; duration and status
/// are always re-derived afterwards, never taken from the payload.
#[derive(Debug, Default)]
pub struct UpdateLeaveRecord {
    pub user_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub depart_at: Option<DateTime<Utc>>,
    pub depart_ip: Option<String>,
    pub return_at: Option<DateTime<Utc>>,
    pub return_ip: Option<String>,
}

/// How many leave records a user may open per local calendar day.
pub fn daily_quota(weekday: Weekday) -> u64 {
    if weekday == Weekday::Fri { 6 } else { 4 }
}

fn derive_duration_and_status(
    depart_at: Option<DateTime<Utc>>,
    return_at: Option<DateTime<Utc>>,
) -> (Option<String>, LeaveStatus) {
    match (depart_at, return_at) {
        (Some(depart), Some(ret)) => {
            let elapsed = (ret - depart).num_seconds();
            let status = if elapsed > GRACE_SECONDS {
                LeaveStatus::Late
            } else {
                LeaveStatus::OnTime
            };
            (Some(lateness::format_duration(elapsed)), status)
        }
        _ => (None, LeaveStatus::Pending),
    }
}

impl Model {
    /// Opens a leave record. A user can only have one open (`Pending`)
    /// record at a time; the depart timestamp defaults to now.
    pub async fn create(
        db: &DbConn,
        user_id: i64,
        date: NaiveDate,
        depart_at: Option<DateTime<Utc>>,
        depart_ip: Option<String>,
    ) -> DomainResult<Model> {
        let existing = Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(LeaveStatus::Pending))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(DomainError::Conflict(
                "You still have an open leave that has not been closed (status Pending)"
                    .to_string(),
            ));
        }

        let now = Utc::now();
        let active_model = ActiveModel {
            user_id: Set(user_id),
            date: Set(date),
            depart_at: Set(Some(depart_at.unwrap_or(now))),
            depart_ip: Set(depart_ip),
            return_at: Set(None),
            return_ip: Set(None),
            duration: Set(None),
            status: Set(LeaveStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(active_model.insert(db).await?)
    }

    /// Closes a pending leave by recording the return, deriving duration and
    /// the on-time/late status from the UTC depart/return pair.
    pub async fn record_return(
        db: &DbConn,
        id: i64,
        return_at: DateTime<Utc>,
        return_ip: Option<String>,
    ) -> DomainResult<Model> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Leave record {id} not found")))?;

        if model.status != LeaveStatus::Pending {
            return Err(DomainError::InvalidState(format!(
                "Leave record {id} is not Pending (current status: {})",
                model.status
            )));
        }

        let (duration, status) = derive_duration_and_status(model.depart_at, Some(return_at));

        let mut active_model: ActiveModel = model.into();
        active_model.return_at = Set(Some(return_at));
        active_model.return_ip = Set(return_ip);
        active_model.duration = Set(duration);
        active_model.status = Set(status);
        active_model.updated_at = Set(Utc::now());
        Ok(active_model.update(db).await?)
    }

    /// Free-form admin patch. Whatever the payload touches is applied
    /// verbatim, then duration/status are re-derived from the stored pair.
    pub async fn update(db: &DbConn, id: i64, fields: UpdateLeaveRecord) -> DomainResult<Model> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Leave record {id} not found")))?;

        let mut depart_at = model.depart_at;
        let mut return_at = model.return_at;

        let mut active_model: ActiveModel = model.into();
        if let Some(v) = fields.user_id {
            active_model.user_id = Set(v);
        }
        if let Some(v) = fields.date {
            active_model.date = Set(v);
        }
        if let Some(v) = fields.depart_at {
            depart_at = Some(v);
            active_model.depart_at = Set(depart_at);
        }
        if let Some(v) = fields.depart_ip {
            active_model.depart_ip = Set(Some(v));
        }
        if let Some(v) = fields.return_at {
            return_at = Some(v);
            active_model.return_at = Set(return_at);
        }
        if let Some(v) = fields.return_ip {
            active_model.return_ip = Set(Some(v));
        }

        let (duration, status) = derive_duration_and_status(depart_at, return_at);
        active_model.duration = Set(duration);
        active_model.status = Set(status);
        active_model.updated_at = Set(Utc::now());
        Ok(active_model.update(db).await?)
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn get_with_user(
        db: &DbConn,
        id: i64,
    ) -> Result<Option<(Model, Option<super::user::Model>)>, DbErr> {
        Entity::find_by_id(id)
            .find_also_related(super::user::Entity)
            .one(db)
            .await
    }

    /// The user's open leave, if any. The one-pending-per-user rule means
    /// there is at most one.
    pub async fn pending_for_user(
        db: &DbConn,
        user_id: i64,
    ) -> Result<Option<(Model, Option<super::user::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(LeaveStatus::Pending))
            .find_also_related(super::user::Entity)
            .one(db)
            .await
    }

    pub async fn all_pending(
        db: &DbConn,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<(Model, Option<super::user::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::Status.eq(LeaveStatus::Pending))
            .find_also_related(super::user::Entity)
            .paginate(db, per_page)
            .fetch_page(page.saturating_sub(1))
            .await
    }

    /// Leave history, optionally restricted to one user and/or one local
    /// calendar date. The date filter spans the local day as a UTC range
    /// over `created_at`.
    pub async fn history(
        db: &DbConn,
        user_id: Option<i64>,
        date: Option<NaiveDate>,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<(Model, Option<super::user::Model>)>, DbErr> {
        let mut query = Entity::find().find_also_related(super::user::Entity);
        if let Some(uid) = user_id {
            query = query.filter(Column::UserId.eq(uid));
        }
        if let Some(date) = date {
            let (start, end) = timezone::local_day_bounds_utc(date);
            query = query
                .filter(Column::CreatedAt.gte(start))
                .filter(Column::CreatedAt.lte(end));
        }
        query
            .order_by_desc(Column::Date)
            .order_by_desc(Column::CreatedAt)
            .paginate(db, per_page)
            .fetch_page(page.saturating_sub(1))
            .await
    }

    /// Number of leave records the user opened today (local day), for the
    /// daily quota check.
    pub async fn count_today(db: &DbConn, user_id: i64) -> Result<u64, DbErr> {
        let (start, end) = timezone::local_day_bounds_utc(timezone::local_today());
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::CreatedAt.gte(start))
            .filter(Column::CreatedAt.lte(end))
            .count(db)
            .await
    }

    /// Earliest leave date still in the live table, used for archival
    /// planning.
    pub async fn oldest_date(db: &DbConn) -> Result<Option<NaiveDate>, DbErr> {
        Ok(Entity::find()
            .order_by_asc(Column::Date)
            .one(db)
            .await?
            .map(|m| m.date))
    }
}
