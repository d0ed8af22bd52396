mod lateness_case_tests;
mod leave_record_tests;

use crate::models::{role, user};
use sea_orm::DatabaseConnection;

pub(crate) async fn seed_role(db: &DatabaseConnection) -> role::Model {
    role::Model::create(db, "Staff").await.expect("create role")
}

pub(crate) async fn seed_user(db: &DatabaseConnection, email: &str) -> user::Model {
    let role = match role::Model::find_by_name(db, "Staff").await.expect("query role") {
        Some(role) => role,
        None => seed_role(db).await,
    };
    user::Model::create(
        db,
        user::NewUser {
            email: email.to_string(),
            password: "password".to_string(),
            fullname: "Test Staff".to_string(),
            nickname: None,
            gender: None,
            image_url: None,
            join_date: None,
            group_date: None,
            role_id: role.id,
            status: None,
            fcm_token: None,
            admin: false,
        },
    )
    .await
    .expect("create user")
}
