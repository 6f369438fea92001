use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Active,
    Inactive,
    OnNotice,
    Resigned,
    Terminated,
}

/// Per-leave-type balance embedded in the employee document.
///
/// `carry_forward` is always >= 0 and is zeroed once `carry_forward_expiry`
/// has passed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaveBalance {
    pub leave_type: String,
    pub total: f64,
    pub used: f64,
    pub balance: f64,
    pub carry_forward: f64,
    pub carry_forward_expiry: Option<NaiveDate>,
    pub last_carry_forward_year: Option<i32>,
}

impl LeaveBalance {
    pub fn new(leave_type: impl Into<String>, total: f64) -> Self {
        Self {
            leave_type: leave_type.into(),
            total,
            used: 0.0,
            balance: total,
            carry_forward: 0.0,
            carry_forward_expiry: None,
            last_carry_forward_year: None,
        }
    }
}

/// Employee entity.
///
/// Lifecycle logic never deletes an employee physically; `deleted_at` is the
/// soft marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    /// Stable business identifier (e.g. "EMP-0042"), unique per tenant.
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub department_id: Option<Uuid>,
    pub designation_id: Option<Uuid>,
    pub status: EmploymentStatus,
    pub leave_balances: Vec<LeaveBalance>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(employee_code: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_code: employee_code.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            department_id: None,
            designation_id: None,
            status: EmploymentStatus::Active,
            leave_balances: Vec::new(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn balance_mut(&mut self, leave_type: &str) -> Option<&mut LeaveBalance> {
        self.leave_balances
            .iter_mut()
            .find(|b| b.leave_type == leave_type)
    }
}
