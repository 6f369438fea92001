//! Carry-forward arithmetic, apply semantics, and expiry idempotence.

mod helpers;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use helpers::TestEnv;
use kadro_core::config::CarryForwardConfig;
use kadro_core::error::AppError;
use kadro_core::models::employee::EmploymentStatus;
use kadro_core::models::policy::LeavePolicy;
use kadro_db::PolicyRepository;

#[tokio::test]
async fn carry_forward_is_min_of_unused_percentage_and_cap() {
    let env = TestEnv::new();
    let employee = env.seed_employee_with_balance("annual", 12.0).await;

    let plan = env
        .carryforward
        .calculate(&env.tenant(), &employee.id.to_string(), Some(2026))
        .await
        .unwrap();
    assert_eq!(plan.entries.len(), 1);
    let entry = &plan.entries[0];
    // min(12, floor(12 * 50%) = 6, 10) = 6
    assert_eq!(entry.unused_balance, 12.0);
    assert_eq!(entry.carry_forward_days, 6.0);
    assert_eq!(
        entry.expiry_date,
        NaiveDate::from_ymd_opt(2027, 3, 31).unwrap()
    );
}

#[tokio::test]
async fn zero_unused_balance_produces_no_entry() {
    let env = TestEnv::new();
    let employee = env.seed_employee_with_balance("annual", 0.0).await;

    let plan = env
        .carryforward
        .calculate(&env.tenant(), &employee.id.to_string(), Some(2026))
        .await
        .unwrap();
    assert!(plan.entries.is_empty());
}

#[tokio::test]
async fn ineligible_leave_types_are_skipped() {
    let env = TestEnv::new();
    // "sick" is not in the default eligible list.
    let employee = env.seed_employee_with_balance("sick", 8.0).await;

    let plan = env
        .carryforward
        .calculate(&env.tenant(), &employee.id.to_string(), Some(2026))
        .await
        .unwrap();
    assert!(plan.entries.is_empty());
}

#[tokio::test]
async fn tenant_policy_overrides_eligibility_and_cap() {
    let env = TestEnv::new();
    let policies = PolicyRepository::new(env.resolver.clone());
    let now = Utc::now();
    policies
        .upsert(
            &env.tenant(),
            LeavePolicy {
                id: Uuid::new_v4(),
                leave_type: "sick".to_string(),
                annual_quota: 12.0,
                carry_forward_allowed: true,
                max_carry_forward_days: Some(3.0),
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .unwrap();

    let employee = env.seed_employee_with_balance("sick", 10.0).await;
    let plan = env
        .carryforward
        .calculate(&env.tenant(), &employee.id.to_string(), Some(2026))
        .await
        .unwrap();
    assert_eq!(plan.entries.len(), 1);
    // min(10, floor(10 * 50%) = 5, policy cap 3) = 3
    assert_eq!(plan.entries[0].carry_forward_days, 3.0);
}

#[tokio::test]
async fn apply_resets_used_and_keeps_the_annual_quota() {
    let env = TestEnv::new();
    let employee = env.seed_employee_with_balance("annual", 12.0).await;
    let total_before = employee.leave_balances[0].total;

    let plan = env
        .carryforward
        .calculate(&env.tenant(), &employee.id.to_string(), Some(2026))
        .await
        .unwrap();
    let updated = env
        .carryforward
        .apply(&env.tenant(), &plan)
        .await
        .unwrap();

    let balance = &updated.leave_balances[0];
    assert_eq!(balance.used, 0.0);
    assert_eq!(balance.balance, 6.0);
    assert_eq!(balance.carry_forward, 6.0);
    assert_eq!(
        balance.carry_forward_expiry,
        Some(NaiveDate::from_ymd_opt(2027, 3, 31).unwrap())
    );
    assert_eq!(balance.last_carry_forward_year, Some(2026));
    // The quota is restored by a separate annual-reset process, not here.
    assert_eq!(balance.total, total_before);
}

#[tokio::test]
async fn expire_reclaims_once_and_is_idempotent() {
    let env = TestEnv::new();
    let employee = env.seed_employee_with_balance("annual", 12.0).await;

    let plan = env
        .carryforward
        .calculate(&env.tenant(), &employee.id.to_string(), Some(2026))
        .await
        .unwrap();
    env.carryforward.apply(&env.tenant(), &plan).await.unwrap();

    let after_expiry = NaiveDate::from_ymd_opt(2027, 4, 1).unwrap();
    let report = env
        .carryforward
        .expire(&env.tenant(), after_expiry)
        .await
        .unwrap();
    assert_eq!(report.days_reclaimed, 6.0);
    assert_eq!(report.balances_touched, 1);

    let stored = env
        .employees
        .get(&env.tenant(), employee.id)
        .await
        .unwrap()
        .unwrap();
    let balance = &stored.leave_balances[0];
    assert_eq!(balance.carry_forward, 0.0);
    assert_eq!(balance.carry_forward_expiry, None);
    assert_eq!(balance.balance, 0.0);

    // Second run reclaims nothing.
    let report = env
        .carryforward
        .expire(&env.tenant(), after_expiry)
        .await
        .unwrap();
    assert_eq!(report.days_reclaimed, 0.0);
    assert_eq!(report.balances_touched, 0);
}

#[tokio::test]
async fn expire_before_the_window_ends_is_a_no_op() {
    let env = TestEnv::new();
    let employee = env.seed_employee_with_balance("annual", 12.0).await;
    let plan = env
        .carryforward
        .calculate(&env.tenant(), &employee.id.to_string(), Some(2026))
        .await
        .unwrap();
    env.carryforward.apply(&env.tenant(), &plan).await.unwrap();

    let report = env
        .carryforward
        .expire(&env.tenant(), NaiveDate::from_ymd_opt(2027, 3, 31).unwrap())
        .await
        .unwrap();
    assert_eq!(report.days_reclaimed, 0.0);
}

#[tokio::test]
async fn company_run_processes_everyone_and_skips_already_carried() {
    let env = TestEnv::new();
    let a = env.seed_employee_with_balance("annual", 12.0).await;
    let _b = env.seed_employee_with_balance("annual", 4.0).await;

    let summary = env
        .carryforward
        .run_company(&env.tenant(), Some(2026))
        .await
        .unwrap();
    // min(12, 6, 10) = 6 and min(4, 2, 10) = 2.
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.total_days_carried, 8.0);

    // Re-running the same year does not compound the carried credit.
    let summary = env
        .carryforward
        .run_company(&env.tenant(), Some(2026))
        .await
        .unwrap();
    assert_eq!(summary.total_days_carried, 0.0);

    let stored = env
        .employees
        .get(&env.tenant(), a.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.leave_balances[0].carry_forward, 6.0);
}

#[tokio::test]
async fn company_run_includes_terminated_employees() {
    let env = TestEnv::new();
    let employee = env.seed_employee_with_balance("annual", 12.0).await;
    env.employees
        .update(&env.tenant(), employee.id, |e| {
            e.status = EmploymentStatus::Terminated;
        })
        .await
        .unwrap();

    // Terminated but not soft-deleted: the balance is still settled.
    let summary = env
        .carryforward
        .run_company(&env.tenant(), Some(2026))
        .await
        .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.total_days_carried, 6.0);

    // A soft-deleted employee is skipped entirely.
    env.employees
        .update(&env.tenant(), employee.id, |e| {
            e.deleted_at = Some(Utc::now());
        })
        .await
        .unwrap();
    let summary = env
        .carryforward
        .run_company(&env.tenant(), Some(2027))
        .await
        .unwrap();
    assert_eq!(summary.processed, 0);
}

#[tokio::test]
async fn calculate_rejects_unknown_employees() {
    let env = TestEnv::new();
    let err = env
        .carryforward
        .calculate(&env.tenant(), &Uuid::new_v4().to_string(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidEmployee(_)));

    let config = CarryForwardConfig::default();
    assert_eq!(config.carry_forward_percentage, 50);
}
