//! Carry-forward calculator.
//!
//! End-of-year computation converting unused leave into capped, time-boxed
//! credit: `carry = min(unused, floor(unused * pct / 100), cap)` per
//! eligible type, expiring at the end of the validity window in the
//! following year. Invoked by an external scheduler or administrative
//! trigger; nothing here self-schedules.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use kadro_core::config::CarryForwardConfig;
use kadro_core::error::AppError;
use kadro_core::models::employee::Employee;
use kadro_core::models::tenant::TenantId;
use kadro_db::{EmployeeRepository, PolicyRepository, StoreResolver};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CarryForwardEntry {
    pub leave_type: String,
    pub unused_balance: f64,
    pub carry_forward_days: f64,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarryForwardPlan {
    pub employee_id: Uuid,
    /// The year being closed; credit lands in `year + 1`.
    pub year: i32,
    pub entries: Vec<CarryForwardEntry>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpiryReport {
    pub days_reclaimed: f64,
    pub balances_touched: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyRunSummary {
    pub processed: usize,
    pub failed: usize,
    pub total_days_carried: f64,
}

/// Last day of the validity window in the year following `year`.
fn window_end(year: i32, validity_months: u32) -> NaiveDate {
    let month = validity_months.clamp(1, 12);
    let next = year + 1;
    let (after_year, after_month) = if month == 12 {
        (next + 1, 1)
    } else {
        (next, month + 1)
    };
    NaiveDate::from_ymd_opt(after_year, after_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or_else(|| {
            // Unreachable for month in 1..=12; keep a sane fallback.
            NaiveDate::from_ymd_opt(next, 3, 31).expect("valid fallback date")
        })
}

#[derive(Clone)]
pub struct CarryForwardService {
    employees: EmployeeRepository,
    policies: PolicyRepository,
    config: CarryForwardConfig,
}

impl CarryForwardService {
    pub fn new(resolver: StoreResolver, config: CarryForwardConfig) -> Self {
        Self {
            employees: EmployeeRepository::new(resolver.clone()),
            policies: PolicyRepository::new(resolver),
            config,
        }
    }

    fn parse_employee_id(employee_id: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(employee_id).map_err(|_| AppError::InvalidEmployee(employee_id.to_string()))
    }

    /// Compute the carry-forward plan for one employee. Pure with respect
    /// to the employee document; nothing is persisted.
    #[tracing::instrument(skip(self), fields(tenant = %tenant))]
    pub async fn calculate(
        &self,
        tenant: &TenantId,
        employee_id: &str,
        year: Option<i32>,
    ) -> Result<CarryForwardPlan, AppError> {
        let employee_id = Self::parse_employee_id(employee_id)?;
        let employee = self.employees.get_required(tenant, employee_id).await?;
        let year = year.unwrap_or_else(|| Utc::now().year());
        self.plan_for(tenant, &employee, year).await
    }

    async fn plan_for(
        &self,
        tenant: &TenantId,
        employee: &Employee,
        year: i32,
    ) -> Result<CarryForwardPlan, AppError> {
        let expiry = window_end(year, self.config.validity_months);
        let mut entries = Vec::new();
        for balance in &employee.leave_balances {
            // Already carried into or past this cycle; re-running must not
            // compound.
            if balance.last_carry_forward_year.map_or(false, |y| y >= year) {
                continue;
            }
            let policy = self.policies.find_by_type(tenant, &balance.leave_type).await?;
            let eligible = match &policy {
                Some(p) => p.carry_forward_allowed,
                None => {
                    self.config.eligible_leave_types.is_empty()
                        || self
                            .config
                            .eligible_leave_types
                            .iter()
                            .any(|t| t == &balance.leave_type)
                }
            };
            if !eligible {
                continue;
            }
            let cap = policy
                .and_then(|p| p.max_carry_forward_days)
                .unwrap_or(self.config.max_carry_forward_days);
            let unused = balance.balance;
            let pct_capped =
                (unused * f64::from(self.config.carry_forward_percentage) / 100.0).floor();
            let days = unused.min(pct_capped).min(cap);
            if days <= 0.0 {
                continue;
            }
            entries.push(CarryForwardEntry {
                leave_type: balance.leave_type.clone(),
                unused_balance: unused,
                carry_forward_days: days,
                expiry_date: expiry,
            });
        }
        Ok(CarryForwardPlan {
            employee_id: employee.id,
            year,
            entries,
        })
    }

    /// Persist a plan: next year's starting balance becomes the carried
    /// credit only, `used` resets, and the expiry is stored. The annual
    /// quota (`total`) is deliberately untouched; restoring it belongs to a
    /// separate annual-reset process.
    #[tracing::instrument(skip(self, plan), fields(tenant = %tenant, employee_id = %plan.employee_id))]
    pub async fn apply(
        &self,
        tenant: &TenantId,
        plan: &CarryForwardPlan,
    ) -> Result<Employee, AppError> {
        let updated = self
            .employees
            .update(tenant, plan.employee_id, |e| {
                for entry in &plan.entries {
                    if let Some(balance) = e.balance_mut(&entry.leave_type) {
                        balance.used = 0.0;
                        balance.balance = entry.carry_forward_days;
                        balance.carry_forward = entry.carry_forward_days;
                        balance.carry_forward_expiry = Some(entry.expiry_date);
                        balance.last_carry_forward_year = Some(plan.year);
                    }
                }
                e.updated_at = Utc::now();
            })
            .await?
            .ok_or_else(|| AppError::InvalidEmployee(plan.employee_id.to_string()))?;
        tracing::info!(entries = plan.entries.len(), "carry-forward applied");
        Ok(updated)
    }

    /// Zero every carry-forward credit whose expiry has passed. Idempotent:
    /// a second run over the same data reclaims nothing.
    #[tracing::instrument(skip(self), fields(tenant = %tenant))]
    pub async fn expire(&self, tenant: &TenantId, today: NaiveDate) -> Result<ExpiryReport, AppError> {
        let mut report = ExpiryReport::default();
        for employee in self.employees.list_not_deleted(tenant).await? {
            let mut reclaimed = 0.0;
            let mut touched = 0usize;
            self.employees
                .update(tenant, employee.id, |e| {
                    for balance in &mut e.leave_balances {
                        let lapsed = balance
                            .carry_forward_expiry
                            .map_or(false, |expiry| expiry < today);
                        if lapsed && balance.carry_forward > 0.0 {
                            reclaimed += balance.carry_forward;
                            touched += 1;
                            balance.balance = (balance.balance - balance.carry_forward).max(0.0);
                            balance.carry_forward = 0.0;
                            balance.carry_forward_expiry = None;
                        } else if lapsed {
                            balance.carry_forward_expiry = None;
                        }
                    }
                    if touched > 0 {
                        e.updated_at = Utc::now();
                    }
                })
                .await?;
            report.days_reclaimed += reclaimed;
            report.balances_touched += touched;
        }
        tracing::info!(
            days_reclaimed = report.days_reclaimed,
            balances = report.balances_touched,
            "carry-forward expiry pass finished"
        );
        Ok(report)
    }

    /// Company-wide calculate + apply. A failure for one employee is logged
    /// and skipped; it never aborts the remaining employees.
    #[tracing::instrument(skip(self), fields(tenant = %tenant))]
    pub async fn run_company(
        &self,
        tenant: &TenantId,
        year: Option<i32>,
    ) -> Result<CompanyRunSummary, AppError> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        let mut summary = CompanyRunSummary::default();
        for employee in self.employees.list_not_deleted(tenant).await? {
            let outcome = async {
                let plan = self.plan_for(tenant, &employee, year).await?;
                if plan.entries.is_empty() {
                    return Ok::<f64, AppError>(0.0);
                }
                let carried: f64 = plan.entries.iter().map(|e| e.carry_forward_days).sum();
                self.apply(tenant, &plan).await?;
                Ok(carried)
            }
            .await;
            match outcome {
                Ok(carried) => {
                    summary.processed += 1;
                    summary.total_days_carried += carried;
                }
                Err(e) => {
                    tracing::error!(employee_id = %employee.id, error = %e, "carry-forward failed for employee");
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }
}
