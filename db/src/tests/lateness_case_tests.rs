use chrono::{Duration, NaiveDate, Utc};

use crate::error::DomainError;
use crate::models::lateness_case::{Model as CaseModel, UpdateLatenessCase};
use crate::models::leave_record::Model as LeaveModel;
use crate::test_utils::setup_test_db;
use crate::tests::seed_user;
use util::timezone;

async fn seed_late_leave(
    db: &sea_orm::DatabaseConnection,
    user_id: i64,
    minutes_away: i64,
) -> crate::models::leave_record::Model {
    let depart = Utc::now();
    let leave = LeaveModel::create(db, user_id, timezone::local_today(), Some(depart), None)
        .await
        .unwrap();
    LeaveModel::record_return(db, leave.id, depart + Duration::minutes(minutes_away), None)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_seeds_penalty_from_parent_leave() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case1@test.com").await;

    // 17 minutes away: 2 minutes past grace, light tier.
    let leave = seed_late_leave(&db, user.id, 17).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();

    assert_eq!(case.status, "Pending");
    assert_eq!(case.sanction.as_deref(), Some("Kutip sampah"));
    assert_eq!(case.fine.as_deref(), Some("0"));
    assert!(case.remarks.is_none());
    assert!(case.approved_by.is_none());
}

#[tokio::test]
async fn create_seeds_heavy_tier_past_three_minutes_over() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case2@test.com").await;

    // 19 minutes away: 4 minutes past grace.
    let leave = seed_late_leave(&db, user.id, 19).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();

    assert_eq!(
        case.sanction.as_deref(),
        Some("Kutip sampah / Bersihkan PC / Bersihkan meja")
    );
    assert_eq!(case.fine.as_deref(), Some("300"));
}

#[tokio::test]
async fn create_without_return_leaves_penalty_unset() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case3@test.com").await;

    let leave = LeaveModel::create(&db, user.id, timezone::local_today(), None, None)
        .await
        .unwrap();
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();

    assert!(case.sanction.is_none());
    assert!(case.fine.is_none());
}

#[tokio::test]
async fn create_rejects_missing_leave_and_duplicates() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case4@test.com").await;

    let err = CaseModel::create(&db, 4242, user.id)
        .await
        .expect_err("missing leave");
    assert!(matches!(err, DomainError::NotFound(_)));

    let leave = seed_late_leave(&db, user.id, 20).await;
    CaseModel::create(&db, leave.id, user.id).await.unwrap();
    let err = CaseModel::create(&db, leave.id, user.id)
        .await
        .expect_err("duplicate case");
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn status_change_records_the_acting_user() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case5@test.com").await;
    let admin = seed_user(&db, "case5-admin@test.com").await;

    let leave = seed_late_leave(&db, user.id, 20).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();

    let updated = CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            status: Some("Done".to_string()),
            ..Default::default()
        },
        Some(admin.id),
    )
    .await
    .unwrap();

    assert_eq!(updated.status, "Done");
    assert_eq!(updated.approved_by, Some(admin.id));
    // Blank remarks on Done fall back to the default.
    assert_eq!(updated.remarks.as_deref(), Some("Done Sanksi"));
    assert!(updated.time_of_day.is_some());
}

#[tokio::test]
async fn excused_statuses_require_remarks() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case6@test.com").await;
    let admin = seed_user(&db, "case6-admin@test.com").await;

    let leave = seed_late_leave(&db, user.id, 20).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();

    for status in ["Izin", "Kendala"] {
        let err = CaseModel::update(
            &db,
            case.id,
            UpdateLatenessCase {
                status: Some(status.to_string()),
                remarks: Some(Some("   ".to_string())),
                ..Default::default()
            },
            Some(admin.id),
        )
        .await
        .expect_err("blank remarks must be rejected");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    let updated = CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            status: Some("Izin".to_string()),
            remarks: Some(Some("Sick family member".to_string())),
            ..Default::default()
        },
        Some(admin.id),
    )
    .await
    .unwrap();
    assert_eq!(updated.remarks.as_deref(), Some("Sick family member"));
}

#[tokio::test]
async fn other_statuses_clear_remarks_when_absent() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case7@test.com").await;

    let leave = seed_late_leave(&db, user.id, 20).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();

    CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            status: Some("Done".to_string()),
            remarks: Some(Some("finished early".to_string())),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();

    let updated = CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            status: Some("Menunggu".to_string()),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(updated.status, "Menunggu");
    assert!(updated.remarks.is_none());
}

#[tokio::test]
async fn remarks_update_without_status_change() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case8@test.com").await;

    let leave = seed_late_leave(&db, user.id, 20).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();

    let updated = CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            remarks: Some(Some("noted".to_string())),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(updated.status, "Pending");
    assert_eq!(updated.remarks.as_deref(), Some("noted"));
    assert!(updated.approved_by.is_none());
}

#[tokio::test]
async fn explicit_time_of_day_is_kept_null_is_not() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case9@test.com").await;

    let leave = seed_late_leave(&db, user.id, 20).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();

    let updated = CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            time_of_day: Some(Some("08:15:00".to_string())),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(updated.time_of_day.as_deref(), Some("08:15:00"));

    // An explicit null is replaced by the current local time.
    let updated = CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            time_of_day: Some(None),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();
    assert!(updated.time_of_day.is_some());
    assert_ne!(updated.time_of_day.as_deref(), Some("08:15:00"));
}

#[tokio::test]
async fn penalty_recomputes_from_parent_unless_overridden() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case10@test.com").await;

    // Light tier at first (17 minutes away).
    let leave = seed_late_leave(&db, user.id, 17).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();
    assert_eq!(case.fine.as_deref(), Some("0"));

    // Admin corrects the return to 25 minutes after departure.
    let depart = leave.depart_at.unwrap();
    LeaveModel::update(
        &db,
        leave.id,
        crate::models::leave_record::UpdateLeaveRecord {
            return_at: Some(depart + Duration::minutes(25)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Any case update without sanction/fine in the payload refreshes both.
    let updated = CaseModel::update(&db, case.id, UpdateLatenessCase::default(), None)
        .await
        .unwrap();
    assert_eq!(
        updated.sanction.as_deref(),
        Some("Kutip sampah / Bersihkan PC / Bersihkan meja")
    );
    assert_eq!(updated.fine.as_deref(), Some("300"));

    // An explicit override wins and is not recomputed away.
    let updated = CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            sanction: Some("Peringatan tertulis".to_string()),
            fine: Some("500".to_string()),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(updated.sanction.as_deref(), Some("Peringatan tertulis"));
    assert_eq!(updated.fine.as_deref(), Some("500"));
}

#[tokio::test]
async fn list_filters_by_parent_leave_year() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case11@test.com").await;

    // One leave in 2024, one in 2025; cases on both.
    let old = LeaveModel::create(&db, user.id, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), None, None)
        .await
        .unwrap();
    LeaveModel::record_return(&db, old.id, Utc::now(), None)
        .await
        .unwrap();
    CaseModel::create(&db, old.id, user.id).await.unwrap();

    let newer = LeaveModel::create(&db, user.id, NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(), None, None)
        .await
        .unwrap();
    LeaveModel::record_return(&db, newer.id, Utc::now(), None)
        .await
        .unwrap();
    CaseModel::create(&db, newer.id, user.id).await.unwrap();

    let all = CaseModel::list(&db, None, 1, 100).await.unwrap();
    assert_eq!(all.len(), 2);
    // Newest leave date first.
    let first_leave = all[0].1.as_ref().expect("leave attached");
    assert_eq!(first_leave.date.format("%Y").to_string(), "2025");

    let only_2024 = CaseModel::list(&db, Some(2024), 1, 100).await.unwrap();
    assert_eq!(only_2024.len(), 1);
    assert_eq!(only_2024[0].0.leave_id, old.id);

    let none = CaseModel::list(&db, Some(2019), 1, 100).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn detail_attaches_owner_and_approver() {
    let db = setup_test_db().await;
    let user = seed_user(&db, "case12@test.com").await;
    let admin = seed_user(&db, "case12-admin@test.com").await;

    let leave = seed_late_leave(&db, user.id, 20).await;
    let case = CaseModel::create(&db, leave.id, user.id).await.unwrap();
    CaseModel::update(
        &db,
        case.id,
        UpdateLatenessCase {
            status: Some("Done".to_string()),
            ..Default::default()
        },
        Some(admin.id),
    )
    .await
    .unwrap();

    let detail = CaseModel::get_detail(&db, case.id)
        .await
        .unwrap()
        .expect("case detail");
    assert_eq!(detail.leave.expect("leave").id, leave.id);
    assert_eq!(detail.user.expect("user").id, user.id);
    assert_eq!(detail.approver.expect("approver").id, admin.id);
}
