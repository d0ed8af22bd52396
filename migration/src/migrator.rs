use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202602090001_create_roles::Migration),
            Box::new(migrations::m202602090002_create_users::Migration),
            Box::new(migrations::m202602090003_create_work_shifts::Migration),
            Box::new(migrations::m202602090004_create_leave_records::Migration),
            Box::new(migrations::m202602090005_create_lateness_cases::Migration),
        ]
    }
}
