//! Clock-in/clock-out state machine, regularization workflow, bulk actions.

mod helpers;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use helpers::TestEnv;
use kadro_core::error::AppError;
use kadro_core::hooks::EventKind;
use kadro_core::models::attendance::{AttendanceStatus, RegularizationStatus};
use kadro_services::{
    BulkAction, ClockInInput, ClockOutInput, RegularizationInput,
};

fn at(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

fn clock_in_at(hour: u32, minute: u32) -> ClockInInput {
    ClockInInput {
        time: Some(at(hour, minute)),
        ..Default::default()
    }
}

fn clock_out_at(hour: u32, minute: u32, break_minutes: i64) -> ClockOutInput {
    ClockOutInput {
        time: Some(at(hour, minute)),
        break_minutes: Some(break_minutes),
        ..Default::default()
    }
}

#[tokio::test]
async fn clock_cycle_computes_work_hours() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);

    let record = env
        .attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    assert_eq!(record.status, AttendanceStatus::Present);
    assert!(record.clock_out.is_none());

    let record = env
        .attendance
        .clock_out(&ctx, clock_out_at(17, 30, 30))
        .await
        .unwrap();
    assert_eq!(record.work_hours, 8.0);
    assert_eq!(record.break_minutes, 30);

    assert_eq!(env.sink.count(EventKind::ClockIn), 1);
    assert_eq!(env.sink.count(EventKind::ClockOut), 1);
}

#[tokio::test]
async fn double_clock_in_fails_and_emits_nothing() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);

    env.attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    let err = env
        .attendance
        .clock_in(&ctx, clock_in_at(9, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyClockedIn(_)));
    // Only the successful transition emitted.
    assert_eq!(env.sink.count(EventKind::ClockIn), 1);
}

#[tokio::test]
async fn clock_out_requires_a_prior_clock_in() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);

    let err = env
        .attendance
        .clock_out(&ctx, clock_out_at(17, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotClockedIn(_)));
    assert_eq!(env.sink.total(), 0);
}

#[tokio::test]
async fn double_clock_out_fails() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);

    env.attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    env.attendance
        .clock_out(&ctx, clock_out_at(17, 0, 0))
        .await
        .unwrap();
    let err = env
        .attendance
        .clock_out(&ctx, clock_out_at(18, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyClockedOut(_)));
}

#[tokio::test]
async fn clock_out_must_be_after_clock_in() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);

    env.attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    let err = env
        .attendance
        .clock_out(&ctx, clock_out_at(8, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn break_longer_than_worked_time_clamps_to_zero_hours() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);

    env.attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    let record = env
        .attendance
        .clock_out(&ctx, clock_out_at(9, 30, 60))
        .await
        .unwrap();
    assert_eq!(record.work_hours, 0.0);
}

#[tokio::test]
async fn late_clock_in_is_recorded_as_late() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);

    // Default work start 09:00 with 15 minutes grace.
    let record = env
        .attendance
        .clock_in(&ctx, clock_in_at(9, 30))
        .await
        .unwrap();
    assert_eq!(record.status, AttendanceStatus::Late);
}

#[tokio::test]
async fn regularization_request_approve_reject_preconditions() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);
    let hr = env.hr_ctx();

    env.attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    let record = env
        .attendance
        .clock_out(&ctx, clock_out_at(17, 0, 0))
        .await
        .unwrap();

    // Deciding without a request fails.
    let err = env
        .attendance
        .approve_regularization(&hr, record.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoRegularizationRequest(_)));

    let reason = RegularizationInput {
        reason: "forgot to clock out on site".to_string(),
    };
    env.attendance
        .request_regularization(&ctx, record.id, reason.clone())
        .await
        .unwrap();

    // A second request while one is pending fails.
    let err = env
        .attendance
        .request_regularization(&ctx, record.id, reason.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RegularizationAlreadyRequested(_)));

    let rejected = env
        .attendance
        .reject_regularization(&hr, record.id, "no evidence")
        .await
        .unwrap();
    assert_eq!(
        rejected.regularization.as_ref().unwrap().status,
        RegularizationStatus::Rejected
    );
    assert!(!rejected.is_regularized);

    // After rejection a new request may be opened, and approval marks the
    // record regularized.
    env.attendance
        .request_regularization(&ctx, record.id, reason)
        .await
        .unwrap();
    let approved = env
        .attendance
        .approve_regularization(&hr, record.id)
        .await
        .unwrap();
    assert!(approved.is_regularized);
    assert_eq!(
        approved.regularization.as_ref().unwrap().status,
        RegularizationStatus::Approved
    );

    assert_eq!(env.sink.count(EventKind::RegularizationRequested), 2);
    assert_eq!(env.sink.count(EventKind::RegularizationRejected), 1);
    assert_eq!(env.sink.count(EventKind::RegularizationApproved), 1);
}

#[tokio::test]
async fn rejection_requires_a_reason() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);
    let hr = env.hr_ctx();

    env.attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    let record = env
        .attendance
        .clock_out(&ctx, clock_out_at(17, 0, 0))
        .await
        .unwrap();
    env.attendance
        .request_regularization(
            &ctx,
            record.id,
            RegularizationInput {
                reason: "missed punch".to_string(),
            },
        )
        .await
        .unwrap();

    let err = env
        .attendance
        .reject_regularization(&hr, record.id, "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn bulk_approve_reports_per_record_outcomes() {
    let env = TestEnv::new();
    let hr = env.hr_ctx();

    // Five completed records; only three carry a pending regularization.
    let mut ids = Vec::new();
    for i in 0..5u32 {
        let employee = kadro_core::models::Employee::new(
            format!("EMP-10{i}"),
            "Test",
            format!("Employee{i}"),
        );
        env.employees
            .insert(&env.tenant(), employee.clone())
            .await
            .unwrap();
        let ctx = env.employee_ctx(&employee);
        env.attendance
            .clock_in(&ctx, clock_in_at(9, 0))
            .await
            .unwrap();
        let record = env
            .attendance
            .clock_out(&ctx, clock_out_at(17, 0, 0))
            .await
            .unwrap();
        if i < 3 {
            env.attendance
                .request_regularization(
                    &ctx,
                    record.id,
                    RegularizationInput {
                        reason: "missed punch".to_string(),
                    },
                )
                .await
                .unwrap();
        }
        ids.push(record.id);
    }

    let result = env
        .attendance
        .bulk(&hr, BulkAction::ApproveRegularization, &ids)
        .await
        .unwrap();
    assert_eq!(result.total, 5);
    assert_eq!(result.updated, 3);
    assert_eq!(result.outcomes.len(), 5);
    assert_eq!(result.outcomes.iter().filter(|o| o.success).count(), 3);
    assert!(result
        .outcomes
        .iter()
        .filter(|o| !o.success)
        .all(|o| o.error.is_some()));
    assert_eq!(env.sink.count(EventKind::BulkActionCompleted), 1);
}

#[tokio::test]
async fn bulk_with_zero_matches_still_succeeds() {
    let env = TestEnv::new();
    let hr = env.hr_ctx();

    let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
    let result = env
        .attendance
        .bulk(&hr, BulkAction::Delete, &ids)
        .await
        .unwrap();
    assert_eq!(result.total, 2);
    assert_eq!(result.updated, 0);
    assert!(result.outcomes.iter().all(|o| !o.success));
}

#[tokio::test]
async fn bulk_delete_is_soft_and_update_status_works() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);
    let hr = env.hr_ctx();

    env.attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    let record = env
        .attendance
        .clock_out(&ctx, clock_out_at(13, 0, 0))
        .await
        .unwrap();

    let result = env
        .attendance
        .bulk(
            &hr,
            BulkAction::UpdateStatus {
                status: AttendanceStatus::HalfDay,
            },
            &[record.id],
        )
        .await
        .unwrap();
    assert_eq!(result.updated, 1);

    let result = env
        .attendance
        .bulk(&hr, BulkAction::Delete, &[record.id])
        .await
        .unwrap();
    assert_eq!(result.updated, 1);

    // Deleting again fails per-record: the record is already soft-deleted.
    let result = env
        .attendance
        .bulk(&hr, BulkAction::Delete, &[record.id])
        .await
        .unwrap();
    assert_eq!(result.updated, 0);
}

#[tokio::test]
async fn statistics_aggregate_a_date_range() {
    let env = TestEnv::new();
    let employee = env.seed_employee().await;
    let ctx = env.employee_ctx(&employee);
    let hr = env.hr_ctx();

    env.attendance
        .clock_in(&ctx, clock_in_at(9, 0))
        .await
        .unwrap();
    env.attendance
        .clock_out(&ctx, clock_out_at(17, 0, 60))
        .await
        .unwrap();

    // Next day, late arrival.
    let next_in = ClockInInput {
        time: Some(Utc.with_ymd_and_hms(2026, 3, 3, 10, 0, 0).unwrap()),
        ..Default::default()
    };
    env.attendance.clock_in(&ctx, next_in).await.unwrap();
    let next_out = ClockOutInput {
        time: Some(Utc.with_ymd_and_hms(2026, 3, 3, 17, 0, 0).unwrap()),
        break_minutes: Some(0),
        ..Default::default()
    };
    env.attendance.clock_out(&ctx, next_out).await.unwrap();

    let stats = env
        .attendance
        .statistics(
            &hr,
            employee.id,
            chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(stats.total_records, 2);
    assert_eq!(stats.present_days, 1);
    assert_eq!(stats.late_days, 1);
    assert_eq!(stats.attendance_rate, 100.0);
    assert_eq!(stats.average_work_hours, 7.0);
}
