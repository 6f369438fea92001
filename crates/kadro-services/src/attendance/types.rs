//! Input and result types for the attendance service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use kadro_core::models::attendance::AttendanceStatus;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClockInInput {
    /// Server-assigned when absent.
    pub time: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClockOutInput {
    pub time: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub break_minutes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegularizationInput {
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}

/// Bulk actions operate record-by-record; one record's failure never aborts
/// the rest.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum BulkAction {
    ApproveRegularization,
    RejectRegularization { reason: String },
    UpdateStatus { status: AttendanceStatus },
    Delete,
}

impl BulkAction {
    pub fn name(&self) -> &'static str {
        match self {
            BulkAction::ApproveRegularization => "approve-regularization",
            BulkAction::RejectRegularization { .. } => "reject-regularization",
            BulkAction::UpdateStatus { .. } => "update-status",
            BulkAction::Delete => "bulk-delete",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome {
    pub record_id: Uuid,
    pub success: bool,
    pub error: Option<String>,
}

/// Aggregate result of a bulk action. The operation itself always succeeds
/// structurally, even when `updated` is zero.
#[derive(Debug, Clone, Serialize)]
pub struct BulkActionResult {
    pub total: usize,
    pub updated: usize,
    pub outcomes: Vec<BulkOutcome>,
}
