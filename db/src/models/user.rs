//! Staff accounts. Passwords are argon2-hashed; `fcm_token` is the push
//! notification handle registered by the mobile client.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::OsRng;
use sea_orm::ActiveValue::Set;
use sea_orm::QueryFilter;
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use util::timezone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub fullname: String,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub join_date: NaiveDate,
    pub group_date: NaiveDate,
    pub role_id: i64,
    pub status: String,
    pub fcm_token: Option<String>,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
    #[sea_orm(has_many = "super::leave_record::Entity")]
    LeaveRecords,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::leave_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when registering a staff account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub fullname: String,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub group_date: Option<NaiveDate>,
    pub role_id: i64,
    pub status: Option<String>,
    pub fcm_token: Option<String>,
    pub admin: bool,
}

impl Model {
    pub async fn create(db: &DbConn, new_user: NewUser) -> DomainResult<Model> {
        if Self::find_by_email(db, &new_user.email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "A user with email '{}' already exists",
                new_user.email
            )));
        }
        if !super::role::Model::exists(db, new_user.role_id).await? {
            return Err(DomainError::Validation(format!(
                "Role {} does not exist",
                new_user.role_id
            )));
        }

        let now = Utc::now();
        let today = timezone::local_today();
        let active_model = ActiveModel {
            email: Set(new_user.email),
            password_hash: Set(hash_password(&new_user.password)?),
            fullname: Set(new_user.fullname),
            nickname: Set(new_user.nickname),
            gender: Set(new_user.gender),
            image_url: Set(new_user.image_url),
            join_date: Set(new_user.join_date.unwrap_or(today)),
            group_date: Set(new_user.group_date.unwrap_or(today)),
            role_id: Set(new_user.role_id),
            status: Set(new_user.status.unwrap_or_else(|| "Aktif".to_string())),
            fcm_token: Set(new_user.fcm_token),
            admin: Set(new_user.admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(active_model.insert(db).await?)
    }

    pub async fn find_by_email(db: &DbConn, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Email.eq(email)).one(db).await
    }

    pub async fn exists(db: &DbConn, id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id(id).one(db).await?.is_some())
    }

    /// Verifies a login attempt. The same error is returned for an unknown
    /// email and a wrong password.
    pub async fn verify_credentials(db: &DbConn, email: &str, password: &str) -> DomainResult<Model> {
        let user = Self::find_by_email(db, email)
            .await?
            .ok_or_else(|| DomainError::Validation("Invalid email or password".to_string()))?;
        if !user.verify_password(password) {
            return Err(DomainError::Validation(
                "Invalid email or password".to_string(),
            ));
        }
        Ok(user)
    }

    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
            .is_ok()
    }

    /// FCM tokens of every user that registered one.
    pub async fn all_fcm_tokens(db: &DbConn) -> Result<Vec<String>, DbErr> {
        let users = Entity::find()
            .filter(Column::FcmToken.is_not_null())
            .all(db)
            .await?;
        Ok(users.into_iter().filter_map(|u| u.fcm_token).collect())
    }
}

fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))
}
