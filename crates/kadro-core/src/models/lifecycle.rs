//! Lifecycle process models: promotion, resignation, termination.
//!
//! The three variants live in separate collections but share one invariant:
//! for a given employee, at most one process of any variant may be open at a
//! time. "Open" is defined per variant by `is_open` below; the conflict
//! validator matches exhaustively on these enums rather than comparing
//! free-form status strings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of lifecycle process, in the fixed conflict-scan order
/// Promotion -> Resignation -> Termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessKind {
    Promotion,
    Resignation,
    Termination,
}

impl ProcessKind {
    /// Scan order is a deliberate, stable tie-break so that conflict
    /// messages are deterministic under concurrent submissions.
    pub const SCAN_ORDER: [ProcessKind; 3] = [
        ProcessKind::Promotion,
        ProcessKind::Resignation,
        ProcessKind::Termination,
    ];
}

impl std::fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProcessKind::Promotion => "promotion",
            ProcessKind::Resignation => "resignation",
            ProcessKind::Termination => "termination",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    Pending,
    Applied,
    Superseded,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub status: PromotionStatus,
    pub from_designation_id: Option<Uuid>,
    pub to_designation_id: Uuid,
    /// Calendar day, kept date-only to avoid timezone drift.
    pub effective_date: NaiveDate,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub decided_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    /// A promotion is open while pending, or applied but not yet superseded.
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            PromotionStatus::Pending | PromotionStatus::Applied
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResignationStatus {
    Pending,
    Approved,
    Rejected,
    Withdrawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resignation {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub status: ResignationStatus,
    pub notice_date: NaiveDate,
    pub last_working_day: NaiveDate,
    pub reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub decided_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl Resignation {
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            ResignationStatus::Pending | ResignationStatus::Approved
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminationStatus {
    Pending,
    Processed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Termination {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub status: TerminationStatus,
    pub termination_date: NaiveDate,
    pub reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub decided_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl Termination {
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            TerminationStatus::Pending | TerminationStatus::Processed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_status_sets() {
        let mut p = Promotion {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            status: PromotionStatus::Pending,
            from_designation_id: None,
            to_designation_id: Uuid::new_v4(),
            effective_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            decided_by: None,
            updated_at: Utc::now(),
        };
        assert!(p.is_open());
        p.status = PromotionStatus::Applied;
        assert!(p.is_open());
        p.status = PromotionStatus::Superseded;
        assert!(!p.is_open());
        p.status = PromotionStatus::Cancelled;
        assert!(!p.is_open());
    }
}
