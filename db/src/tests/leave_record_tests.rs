use chrono::{Duration, NaiveDate, Utc, Weekday};

use crate::error::DomainError;
use crate::models::leave_record::{LeaveStatus, Model as LeaveModel, UpdateLeaveRecord, daily_quota};
use crate::test_utils::setup_test_db;
use crate::tests::seed_user;
use util::timezone;

#[tokio::test]
async fn create_opens_a_pending_record() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff1@test.com").await;

    let leave = LeaveModel::create(&db, user.id, timezone::local_today(), None, Some("10.0.0.1".into()))
        .await
        .expect("create leave");

    assert_eq!(leave.status, LeaveStatus::Pending);
    assert!(leave.depart_at.is_some());
    assert!(leave.return_at.is_none());
    assert!(leave.duration.is_none());
    assert_eq!(leave.depart_ip.as_deref(), Some("10.0.0.1"));
}

#[tokio::test]
async fn second_pending_record_is_rejected() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff2@test.com").await;

    LeaveModel::create(&db, user.id, timezone::local_today(), None, None)
        .await
        .expect("first create");

    // A different date makes no difference while the first is still open.
    let other_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let err = LeaveModel::create(&db, user.id, other_date, None, None)
        .await
        .expect_err("second create must fail");
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn return_within_grace_is_on_time() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff3@test.com").await;

    let depart = Utc::now();
    let leave = LeaveModel::create(&db, user.id, timezone::local_today(), Some(depart), None)
        .await
        .unwrap();

    let updated = LeaveModel::record_return(
        &db,
        leave.id,
        depart + Duration::minutes(10),
        Some("10.0.0.2".into()),
    )
    .await
    .expect("record return");

    assert_eq!(updated.status, LeaveStatus::OnTime);
    assert_eq!(updated.duration.as_deref(), Some("10 Menit"));
    assert_eq!(updated.return_ip.as_deref(), Some("10.0.0.2"));
}

#[tokio::test]
async fn return_past_grace_is_late() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff4@test.com").await;

    let depart = Utc::now();
    let leave = LeaveModel::create(&db, user.id, timezone::local_today(), Some(depart), None)
        .await
        .unwrap();

    let updated = LeaveModel::record_return(&db, leave.id, depart + Duration::minutes(20), None)
        .await
        .unwrap();

    assert_eq!(updated.status, LeaveStatus::Late);
    assert_eq!(updated.duration.as_deref(), Some("20 Menit"));
}

#[tokio::test]
async fn return_on_closed_record_is_rejected() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff5@test.com").await;

    let depart = Utc::now();
    let leave = LeaveModel::create(&db, user.id, timezone::local_today(), Some(depart), None)
        .await
        .unwrap();
    LeaveModel::record_return(&db, leave.id, depart + Duration::minutes(5), None)
        .await
        .unwrap();

    let err = LeaveModel::record_return(&db, leave.id, depart + Duration::minutes(6), None)
        .await
        .expect_err("second return must fail");
    assert!(matches!(err, DomainError::InvalidState(_)));
}

#[tokio::test]
async fn return_on_missing_record_is_not_found() {
    let db = setup_test_db().await;
    let err = LeaveModel::record_return(&db, 9999, Utc::now(), None)
        .await
        .expect_err("missing record");
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn update_rederives_duration_and_status() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff6@test.com").await;

    let depart = Utc::now();
    let leave = LeaveModel::create(&db, user.id, timezone::local_today(), Some(depart), None)
        .await
        .unwrap();

    // Admin fills in a return 1h1m1s after departure.
    let updated = LeaveModel::update(
        &db,
        leave.id,
        UpdateLeaveRecord {
            return_at: Some(depart + Duration::seconds(3661)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.status, LeaveStatus::Late);
    assert_eq!(updated.duration.as_deref(), Some("1 Jam 1 Menit 1 Detik"));

    // Moving the return inside the grace window flips the status back.
    let updated = LeaveModel::update(
        &db,
        leave.id,
        UpdateLeaveRecord {
            return_at: Some(depart + Duration::seconds(59)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.status, LeaveStatus::OnTime);
    assert_eq!(updated.duration.as_deref(), Some("59 Detik"));
}

#[tokio::test]
async fn pending_query_returns_owner() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff7@test.com").await;

    LeaveModel::create(&db, user.id, timezone::local_today(), None, None)
        .await
        .unwrap();

    let (leave, owner) = LeaveModel::pending_for_user(&db, user.id)
        .await
        .unwrap()
        .expect("pending leave");
    assert_eq!(leave.user_id, user.id);
    assert_eq!(owner.expect("owner attached").id, user.id);

    assert!(LeaveModel::pending_for_user(&db, user.id + 1)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn history_filters_by_local_day() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff8@test.com").await;

    LeaveModel::create(&db, user.id, timezone::local_today(), None, None)
        .await
        .unwrap();

    let today = LeaveModel::history(&db, Some(user.id), Some(timezone::local_today()), 1, 100)
        .await
        .unwrap();
    assert_eq!(today.len(), 1);

    let long_ago = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let none = LeaveModel::history(&db, Some(user.id), Some(long_ago), 1, 100)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn count_today_sees_records_created_now() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff9@test.com").await;

    assert_eq!(LeaveModel::count_today(&db, user.id).await.unwrap(), 0);

    let leave = LeaveModel::create(&db, user.id, timezone::local_today(), None, None)
        .await
        .unwrap();
    assert_eq!(LeaveModel::count_today(&db, user.id).await.unwrap(), 1);

    // Closing the leave keeps it in today's count.
    LeaveModel::record_return(&db, leave.id, Utc::now(), None)
        .await
        .unwrap();
    assert_eq!(LeaveModel::count_today(&db, user.id).await.unwrap(), 1);
}

#[tokio::test]
async fn oldest_date_tracks_minimum() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "staff10@test.com").await;

    assert!(LeaveModel::oldest_date(&db).await.unwrap().is_none());

    let old_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let leave = LeaveModel::create(&db, user.id, timezone::local_today(), None, None)
        .await
        .unwrap();
    LeaveModel::record_return(&db, leave.id, Utc::now(), None)
        .await
        .unwrap();
    LeaveModel::create(&db, user.id, old_date, None, None)
        .await
        .unwrap();

    assert_eq!(LeaveModel::oldest_date(&db).await.unwrap(), Some(old_date));
}

#[test]
fn friday_gets_a_larger_quota() {
    assert_eq!(daily_quota(Weekday::Fri), 6);
    assert_eq!(daily_quota(Weekday::Mon), 4);
    assert_eq!(daily_quota(Weekday::Sun), 4);
}
