use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::tenant::TenantId;

/// Role of the acting identity, resolved upstream from request credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Employee,
    Manager,
    HrAdmin,
}

impl ActorRole {
    /// Roles allowed to act on records they do not own (regularization
    /// decisions, bulk actions, lifecycle decisions).
    pub fn is_elevated(&self) -> bool {
        matches!(self, ActorRole::Manager | ActorRole::HrAdmin)
    }
}

/// Identity context attached to every public operation.
///
/// The core trusts this context; the only check performed here is the tenant
/// id format check at construction.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub tenant: TenantId,
    pub actor_id: Uuid,
    pub role: ActorRole,
}

impl ActorContext {
    pub fn new(tenant: &str, actor_id: Uuid, role: ActorRole) -> Result<Self, AppError> {
        Ok(Self {
            tenant: TenantId::parse(tenant)?,
            actor_id,
            role,
        })
    }
}
