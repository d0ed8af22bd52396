//! Archival of aged rows into year-partitioned tables.
//!
//! Leave records whose local date is not today, and lateness cases whose
//! parent leave falls outside the current local year, are moved into
//! `leave_records_<year>` / `lateness_cases_<year>`. Archive tables are
//! created on demand from the registry in the migration crate. Rows are
//! re-keyed by the archive table's own sequence; every other column is
//! carried over, with enum-valued columns written by their underlying
//! string value.
//!
//! Each year's batch commits on its own, so progress survives a failure in
//! a later year. Inside a batch every row moves under a savepoint: a bad
//! row is logged and stays in the live table without poisoning its
//! siblings.

use std::collections::BTreeMap;

use chrono::Datelike;
use sea_orm::sea_query::{Alias, Asterisk, Order, Query};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, FromQueryResult, QueryFilter, TransactionTrait,
};
use sea_orm_migration::SchemaManager;
use tracing::{error, info, warn};

use crate::models::{lateness_case, leave_record};
use migration::archive as archive_schema;
use util::timezone;

/// Rows moved per year, plus rows that failed and were left in place.
#[derive(Debug, Default)]
pub struct ArchiveSummary {
    pub moved: BTreeMap<i32, u64>,
    pub skipped: u64,
}

impl ArchiveSummary {
    pub fn total_moved(&self) -> u64 {
        self.moved.values().sum()
    }
}

/// Moves every leave record dated before (or after) the current local day
/// into its year's archive table. The associated lateness case, if any, is
/// removed from the live table first.
pub async fn archive_leave_records(db: &DatabaseConnection) -> Result<ArchiveSummary, DbErr> {
    let today = timezone::local_today();
    info!(%today, "archiving leave records not dated today");

    let rows = leave_record::Entity::find()
        .filter(leave_record::Column::Date.ne(today))
        .all(db)
        .await?;

    if rows.is_empty() {
        info!("no aged leave records to archive");
        return Ok(ArchiveSummary::default());
    }

    let mut by_year: BTreeMap<i32, Vec<leave_record::Model>> = BTreeMap::new();
    for row in rows {
        by_year.entry(row.date.year()).or_default().push(row);
    }

    let mut summary = ArchiveSummary::default();
    for (year, batch) in by_year {
        ensure_archive_table(
            db,
            &archive_schema::leave_table_name(year),
            archive_schema::leave_archive_table(year),
        )
        .await?;

        let txn = db.begin().await?;
        let mut moved = 0u64;
        for row in &batch {
            match move_leave_row(&txn, year, row).await {
                Ok(()) => moved += 1,
                Err(e) => {
                    summary.skipped += 1;
                    error!(
                        leave_id = row.id,
                        year,
                        error = %e,
                        "failed to move leave record; leaving it in the live table"
                    );
                }
            }
        }
        txn.commit().await?;
        info!(year, moved, "archived leave records");
        summary.moved.insert(year, moved);
    }

    Ok(summary)
}

/// Moves every lateness case whose parent leave is dated outside the
/// current local year into that year's archive table.
pub async fn archive_lateness_cases(db: &DatabaseConnection) -> Result<ArchiveSummary, DbErr> {
    let current_year = timezone::local_year();
    info!(current_year, "archiving lateness cases from previous years");

    let (start, end) = lateness_case::year_bounds(current_year)?;
    let rows = lateness_case::Entity::find()
        .find_also_related(leave_record::Entity)
        .filter(
            Condition::any()
                .add(leave_record::Column::Date.lt(start))
                .add(leave_record::Column::Date.gte(end)),
        )
        .all(db)
        .await?;

    if rows.is_empty() {
        info!("no aged lateness cases to archive");
        return Ok(ArchiveSummary::default());
    }

    let mut by_year: BTreeMap<i32, Vec<lateness_case::Model>> = BTreeMap::new();
    for (case, leave) in rows {
        match leave {
            Some(leave) => {
                by_year.entry(leave.date.year()).or_default().push(case);
            }
            None => {
                warn!(
                    case_id = case.id,
                    leave_id = case.leave_id,
                    "lateness case has no parent leave record; skipping archival"
                );
            }
        }
    }

    let mut summary = ArchiveSummary::default();
    for (year, batch) in by_year {
        ensure_archive_table(
            db,
            &archive_schema::lateness_table_name(year),
            archive_schema::lateness_archive_table(year),
        )
        .await?;

        let txn = db.begin().await?;
        let mut moved = 0u64;
        for case in &batch {
            match move_lateness_row(&txn, year, case).await {
                Ok(()) => moved += 1,
                Err(e) => {
                    summary.skipped += 1;
                    error!(
                        case_id = case.id,
                        year,
                        error = %e,
                        "failed to move lateness case; leaving it in the live table"
                    );
                }
            }
        }
        txn.commit().await?;
        info!(year, moved, "archived lateness cases");
        summary.moved.insert(year, moved);
    }

    Ok(summary)
}

async fn ensure_archive_table(
    db: &DatabaseConnection,
    name: &str,
    stmt: sea_orm_migration::prelude::TableCreateStatement,
) -> Result<(), DbErr> {
    let manager = SchemaManager::new(db);
    if !manager.has_table(name).await? {
        manager.create_table(stmt).await?;
        info!(table = name, "created archive table");
    }
    Ok(())
}

async fn move_leave_row(
    txn: &DatabaseTransaction,
    year: i32,
    row: &leave_record::Model,
) -> Result<(), DbErr> {
    use leave_record::Column;
    use sea_orm::ActiveEnum;

    let savepoint = txn.begin().await?;

    // The case rides along with its leave; a leave without a case is a no-op.
    lateness_case::Model::delete_by_leave_id(&savepoint, row.id).await?;

    let mut insert = Query::insert();
    insert
        .into_table(Alias::new(archive_schema::leave_table_name(year)))
        .columns([
            Column::UserId,
            Column::Date,
            Column::DepartAt,
            Column::DepartIp,
            Column::ReturnAt,
            Column::ReturnIp,
            Column::Duration,
            Column::Status,
            Column::CreatedAt,
            Column::UpdatedAt,
        ])
        .values([
            row.user_id.into(),
            row.date.into(),
            row.depart_at.into(),
            row.depart_ip.clone().into(),
            row.return_at.into(),
            row.return_ip.clone().into(),
            row.duration.clone().into(),
            row.status.to_value().into(),
            row.created_at.into(),
            row.updated_at.into(),
        ])
        .map_err(|e| DbErr::Custom(e.to_string()))?;

    let backend = savepoint.get_database_backend();
    savepoint.execute(backend.build(&insert)).await?;
    leave_record::Entity::delete_by_id(row.id)
        .exec(&savepoint)
        .await?;

    savepoint.commit().await
}

async fn move_lateness_row(
    txn: &DatabaseTransaction,
    year: i32,
    case: &lateness_case::Model,
) -> Result<(), DbErr> {
    use lateness_case::Column;

    let savepoint = txn.begin().await?;

    let mut insert = Query::insert();
    insert
        .into_table(Alias::new(archive_schema::lateness_table_name(year)))
        .columns([
            Column::LeaveId,
            Column::UserId,
            Column::Sanction,
            Column::Fine,
            Column::Status,
            Column::Remarks,
            Column::TimeOfDay,
            Column::ApprovedBy,
            Column::CreatedAt,
            Column::UpdatedAt,
        ])
        .values([
            case.leave_id.into(),
            case.user_id.into(),
            case.sanction.clone().into(),
            case.fine.clone().into(),
            case.status.clone().into(),
            case.remarks.clone().into(),
            case.time_of_day.clone().into(),
            case.approved_by.into(),
            case.created_at.into(),
            case.updated_at.into(),
        ])
        .map_err(|e| DbErr::Custom(e.to_string()))?;

    let backend = savepoint.get_database_backend();
    savepoint.execute(backend.build(&insert)).await?;
    lateness_case::Entity::delete_by_id(case.id)
        .exec(&savepoint)
        .await?;

    savepoint.commit().await
}

/// Archived leave records for one year, or `None` when no archive table for
/// that year exists yet.
pub async fn archived_leave_records(
    db: &DatabaseConnection,
    year: i32,
    page: u64,
    per_page: u64,
) -> Result<Option<Vec<leave_record::Model>>, DbErr> {
    let name = archive_schema::leave_table_name(year);
    let manager = SchemaManager::new(db);
    if !manager.has_table(&name).await? {
        return Ok(None);
    }

    let mut select = Query::select();
    select
        .column(Asterisk)
        .from(Alias::new(name))
        .order_by(Alias::new("id"), Order::Asc)
        .limit(per_page)
        .offset(page.saturating_sub(1) * per_page);

    let backend = db.get_database_backend();
    let rows = leave_record::Model::find_by_statement(backend.build(&select))
        .all(db)
        .await?;
    Ok(Some(rows))
}

/// Archived lateness cases for one year, or `None` when no archive table
/// for that year exists yet.
pub async fn archived_lateness_cases(
    db: &DatabaseConnection,
    year: i32,
    page: u64,
    per_page: u64,
) -> Result<Option<Vec<lateness_case::Model>>, DbErr> {
    let name = archive_schema::lateness_table_name(year);
    let manager = SchemaManager::new(db);
    if !manager.has_table(&name).await? {
        return Ok(None);
    }

    let mut select = Query::select();
    select
        .column(Asterisk)
        .from(Alias::new(name))
        .order_by(Alias::new("id"), Order::Asc)
        .limit(per_page)
        .offset(page.saturating_sub(1) * per_page);

    let backend = db.get_database_backend();
    let rows = lateness_case::Model::find_by_statement(backend.build(&select))
        .all(db)
        .await?;
    Ok(Some(rows))
}
