use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::validation::is_valid_tenant_id;

/// Opaque tenant identifier.
///
/// Every mutable entity in the system is scoped to exactly one tenant; the
/// only way to obtain a `TenantId` is `parse`, which enforces the
/// `^[a-zA-Z0-9_-]{3,50}$` format. Handles derived from it are never shared
/// across tenants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Parse and validate a raw tenant identifier.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if is_valid_tenant_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::InvalidTenant(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Company status in the global registry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    Active,
    Suspended,
}

/// Company (customer organization) entity.
///
/// Lives in the shared administrative store only; tenant-scoped code paths
/// cannot reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub tenant: TenantId,
    pub name: String,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
}
