//! Calendar-triggered archival jobs.
//!
//! One scheduler runs per process: the leave archival job fires daily at
//! 01:00 facility-local time, the lateness archival job yearly on January 1
//! at 00:00 local. A job failure is logged and waits for the next firing;
//! there are no in-between retries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use db::archive::{archive_lateness_cases, archive_leave_records};
use util::timezone;

static STARTED: AtomicBool = AtomicBool::new(false);

pub struct ArchivalScheduler {
    handles: Vec<JoinHandle<()>>,
}

impl ArchivalScheduler {
    /// Starts both jobs. A second call in the same process is refused.
    pub fn start(db: DatabaseConnection) -> Self {
        if STARTED.swap(true, Ordering::SeqCst) {
            warn!("archival scheduler already started; ignoring second start");
            return Self {
                handles: Vec::new(),
            };
        }

        let leave_job = tokio::spawn(run_leave_job(db.clone()));
        let lateness_job = tokio::spawn(run_lateness_job(db));
        info!("archival scheduler started (leave: daily 01:00, lateness: Jan 1 00:00)");

        Self {
            handles: vec![leave_job, lateness_job],
        }
    }

    /// Stops both jobs. Called once at process shutdown.
    pub fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        STARTED.store(false, Ordering::SeqCst);
        info!("archival scheduler stopped");
    }
}

async fn run_leave_job(db: DatabaseConnection) {
    loop {
        let wait = until_next_daily(1, 0);
        tokio::time::sleep(wait).await;

        info!("scheduled leave archival firing");
        match archive_leave_records(&db).await {
            Ok(summary) => info!(
                moved = summary.total_moved(),
                skipped = summary.skipped,
                "scheduled leave archival finished"
            ),
            Err(e) => error!(error = %e, "scheduled leave archival failed"),
        }
    }
}

async fn run_lateness_job(db: DatabaseConnection) {
    loop {
        let wait = until_next_new_year();
        tokio::time::sleep(wait).await;

        info!("scheduled lateness archival firing");
        match archive_lateness_cases(&db).await {
            Ok(summary) => info!(
                moved = summary.total_moved(),
                skipped = summary.skipped,
                "scheduled lateness archival finished"
            ),
            Err(e) => error!(error = %e, "scheduled lateness archival failed"),
        }
    }
}

/// Time until the next local `hour:minute` today or tomorrow.
fn until_next_daily(hour: u32, minute: u32) -> Duration {
    let now = timezone::now_local();
    let target = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);

    let mut fire_date = now.date_naive();
    if now.time() >= target {
        fire_date = fire_date.succ_opt().unwrap_or(fire_date);
    }

    let delta = fire_date.and_time(target) - now.naive_local();
    delta.to_std().unwrap_or(Duration::ZERO)
}

/// Time until the next local January 1, 00:00.
fn until_next_new_year() -> Duration {
    let now = timezone::now_local();
    let fire = NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)
        .unwrap_or(now.date_naive())
        .and_time(NaiveTime::MIN);

    let delta = fire - now.naive_local();
    delta.to_std().unwrap_or(Duration::ZERO)
}
