use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-tenant leave policy for one leave type.
///
/// When present, it overrides the global carry-forward configuration for
/// that type (eligibility and day cap).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeavePolicy {
    pub id: Uuid,
    pub leave_type: String,
    pub annual_quota: f64,
    pub carry_forward_allowed: bool,
    pub max_carry_forward_days: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
