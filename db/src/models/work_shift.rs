//! Work shift roster entries. Plain CRUD; the optional second clock-in/out
//! pair covers double shifts.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder};
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::error::{DomainError, DomainResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "work_shifts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub second_clock_in: Option<DateTime<Utc>>,
    pub second_clock_out: Option<DateTime<Utc>>,
    pub schedule: Option<String>,
    pub remarks: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewWorkShift {
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub second_clock_in: Option<DateTime<Utc>>,
    pub second_clock_out: Option<DateTime<Utc>>,
    pub schedule: Option<String>,
    pub remarks: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Default)]
pub struct UpdateWorkShift {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub second_clock_in: Option<DateTime<Utc>>,
    pub second_clock_out: Option<DateTime<Utc>>,
    pub schedule: Option<String>,
    pub remarks: Option<String>,
}

impl Model {
    pub async fn create(db: &DbConn, shift: NewWorkShift) -> DomainResult<Model> {
        let now = Utc::now();
        let active_model = ActiveModel {
            user_id: Set(shift.user_id),
            start_date: Set(shift.start_date),
            end_date: Set(shift.end_date),
            clock_in: Set(shift.clock_in),
            clock_out: Set(shift.clock_out),
            second_clock_in: Set(shift.second_clock_in),
            second_clock_out: Set(shift.second_clock_out),
            schedule: Set(shift.schedule),
            remarks: Set(shift.remarks),
            created_by: Set(shift.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(active_model.insert(db).await?)
    }

    pub async fn update(db: &DbConn, id: i64, fields: UpdateWorkShift) -> DomainResult<Model> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Work shift {id} not found")))?;

        let mut active_model: ActiveModel = model.into();
        if let Some(v) = fields.start_date {
            active_model.start_date = Set(v);
        }
        if let Some(v) = fields.end_date {
            active_model.end_date = Set(v);
        }
        if let Some(v) = fields.clock_in {
            active_model.clock_in = Set(Some(v));
        }
        if let Some(v) = fields.clock_out {
            active_model.clock_out = Set(Some(v));
        }
        if let Some(v) = fields.second_clock_in {
            active_model.second_clock_in = Set(Some(v));
        }
        if let Some(v) = fields.second_clock_out {
            active_model.second_clock_out = Set(Some(v));
        }
        if let Some(v) = fields.schedule {
            active_model.schedule = Set(Some(v));
        }
        if let Some(v) = fields.remarks {
            active_model.remarks = Set(Some(v));
        }
        active_model.updated_at = Set(Utc::now());
        Ok(active_model.update(db).await?)
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn list(
        db: &DbConn,
        user_id: Option<i64>,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<(Model, Option<super::user::Model>)>, DbErr> {
        let mut query = Entity::find().find_also_related(super::user::Entity);
        if let Some(uid) = user_id {
            query = query.filter(Column::UserId.eq(uid));
        }
        query
            .order_by_desc(Column::StartDate)
            .paginate(db, per_page)
            .fetch_page(page.saturating_sub(1))
            .await
    }
}
