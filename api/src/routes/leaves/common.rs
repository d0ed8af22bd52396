use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use db::models::leave_record::{LeaveStatus, Model as LeaveModel};
use db::models::user::Model as UserModel;
use util::timezone;

/// An instant that accepts both zone-aware RFC 3339 strings (converted to
/// UTC) and zone-less strings (taken to already be UTC).
#[derive(Debug, Clone, Copy)]
pub struct FlexibleInstant(pub DateTime<Utc>);

impl<'de> Deserialize<'de> for FlexibleInstant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_instant(&raw)
            .map(FlexibleInstant)
            .map_err(serde::de::Error::custom)
    }
}

pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timezone::to_utc(aware));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timezone::naive_as_utc(naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(timezone::naive_as_utc(naive));
    }
    Err(format!("Unrecognized datetime '{raw}'"))
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

#[derive(Serialize)]
pub struct LeaveResponse {
    pub leave: LeaveModel,
    pub user: Option<MinimalUser>,
}

impl LeaveResponse {
    pub fn from_pair((leave, user): (LeaveModel, Option<UserModel>)) -> Self {
        Self {
            leave,
            user: user.map(MinimalUser::from),
        }
    }
}

/// Archived leave row with depart/return rendered in facility-local time.
#[derive(Serialize)]
pub struct ArchivedLeaveResponse {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub depart_at: Option<DateTime<FixedOffset>>,
    pub depart_ip: Option<String>,
    pub return_at: Option<DateTime<FixedOffset>>,
    pub return_ip: Option<String>,
    pub duration: Option<String>,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LeaveModel> for ArchivedLeaveResponse {
    fn from(leave: LeaveModel) -> Self {
        Self {
            id: leave.id,
            user_id: leave.user_id,
            date: leave.date,
            depart_at: leave.depart_at.map(timezone::to_local),
            depart_ip: leave.depart_ip,
            return_at: leave.return_at.map(timezone::to_local),
            return_ip: leave.return_ip,
            duration: leave.duration,
            status: leave.status,
            created_at: leave.created_at,
            updated_at: leave.updated_at,
        }
    }
}
