//! Hooks and traits for out-of-scope collaborators.
//!
//! The core emits domain events to an injected sink after every successful
//! state transition and never after a failed validation. The delivery
//! mechanism (push channel, polling, none) is the sink implementation's
//! concern.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tenant::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ClockIn,
    ClockOut,
    RegularizationRequested,
    RegularizationApproved,
    RegularizationRejected,
    BulkActionCompleted,
}

/// Domain event emitted on a successful state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub kind: EventKind,
    pub tenant: TenantId,
    pub employee_id: Option<Uuid>,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(
        kind: EventKind,
        tenant: TenantId,
        employee_id: Option<Uuid>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            tenant,
            employee_id,
            payload,
            occurred_at: Utc::now(),
        }
    }
}

/// Real-time notification sink. Emit once per successful transition.
///
/// Sink failures are the sink's problem: emission errors are logged by the
/// caller, never surfaced to the actor.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: DomainEvent) -> Result<(), String>;
}

/// No-op implementation for when no delivery channel is wired up.
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: DomainEvent) -> Result<(), String> {
        Ok(())
    }
}
