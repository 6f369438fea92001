//! Attendance models: one record per employee per calendar day, with an
//! optional regularization sub-workflow attached once the day is recorded.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    OnLeave,
    Holiday,
    Weekend,
}

/// A clock-in or clock-out event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockEvent {
    pub time: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegularizationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Employee-initiated correction request against a recorded attendance entry.
/// Approved and Rejected are terminal; a new request may be opened afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegularizationRequest {
    pub reason: String,
    pub status: RegularizationStatus,
    pub requested_by: Uuid,
    pub requested_at: DateTime<Utc>,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decision_reason: Option<String>,
}

/// Attendance record for one (employee, calendar day).
///
/// Invariants: `clock_out.time` is strictly after `clock_in.time`; at most
/// one pending regularization request at a time. Uniqueness per day is
/// enforced by query under the per-employee lock, not by a composite key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub clock_in: Option<ClockEvent>,
    pub clock_out: Option<ClockEvent>,
    pub break_minutes: i64,
    /// Derived on clock-out: max(0, (out - in) - break), in hours.
    pub work_hours: f64,
    pub status: AttendanceStatus,
    pub regularization: Option<RegularizationRequest>,
    pub is_regularized: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Clocked in but not yet out.
    pub fn has_open_clock_in(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }

    pub fn has_pending_regularization(&self) -> bool {
        matches!(
            self.regularization,
            Some(RegularizationRequest {
                status: RegularizationStatus::Pending,
                ..
            })
        )
    }
}

/// Read-only aggregation over a date-filtered record set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceStatistics {
    pub total_records: usize,
    pub present_days: usize,
    pub absent_days: usize,
    pub late_days: usize,
    pub half_days: usize,
    pub on_leave_days: usize,
    /// Share of records counting as attended (present, late, half-day at
    /// half weight), in percent.
    pub attendance_rate: f64,
    pub average_work_hours: f64,
}
