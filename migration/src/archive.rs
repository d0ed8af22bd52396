//! Schema registry for the year-partitioned archive tables.
//!
//! Archive tables are created lazily, on the first migration run that touches
//! a given year. Each statement mirrors the live table's columns; the `id`
//! column is a fresh sequence (archived rows are re-keyed on insert) and
//! foreign keys are not carried over, since archived rows may outlive the
//! live rows they referenced.

use sea_orm_migration::prelude::*;

pub fn leave_table_name(year: i32) -> String {
    format!("leave_records_{year}")
}

pub fn lateness_table_name(year: i32) -> String {
    format!("lateness_cases_{year}")
}

/// `leave_records_<year>`, structurally matching `leave_records`.
pub fn leave_archive_table(year: i32) -> TableCreateStatement {
    let table = Alias::new(leave_table_name(year));
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new("id"))
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Alias::new("user_id"))
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(Alias::new("date")).date().not_null())
        .col(ColumnDef::new(Alias::new("depart_at")).timestamp().null())
        .col(ColumnDef::new(Alias::new("depart_ip")).text().null())
        .col(ColumnDef::new(Alias::new("return_at")).timestamp().null())
        .col(ColumnDef::new(Alias::new("return_ip")).text().null())
        .col(ColumnDef::new(Alias::new("duration")).text().null())
        .col(
            ColumnDef::new(Alias::new("status"))
                .text()
                .not_null()
                .default("Pending"),
        )
        .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null())
        .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null())
        .to_owned()
}

/// `lateness_cases_<year>`, structurally matching `lateness_cases`.
pub fn lateness_archive_table(year: i32) -> TableCreateStatement {
    let table = Alias::new(lateness_table_name(year));
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new("id"))
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Alias::new("leave_id"))
                .big_integer()
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(Alias::new("user_id"))
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(Alias::new("sanction")).text().null())
        .col(ColumnDef::new(Alias::new("fine")).text().null())
        .col(
            ColumnDef::new(Alias::new("status"))
                .text()
                .not_null()
                .default("Pending"),
        )
        .col(ColumnDef::new(Alias::new("remarks")).text().null())
        .col(ColumnDef::new(Alias::new("time_of_day")).text().null())
        .col(ColumnDef::new(Alias::new("approved_by")).big_integer().null())
        .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null())
        .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null())
        .to_owned()
}
