//! Tenant store resolver.
//!
//! `TenantStores` is the only way tenant-scoped code reaches collections;
//! it is produced exclusively here, so an accidental cross-tenant query
//! cannot be constructed ad hoc. The shared administrative store is a
//! distinct type and is never reachable from a `TenantStores` handle.

use std::sync::Arc;

use kadro_core::error::AppError;
use kadro_core::models::tenant::TenantId;
use kadro_core::models::{
    AttendanceRecord, Company, Employee, LeavePolicy, Promotion, Resignation, Termination,
};

use crate::store::{Collection, GlobalDatabase, StoreClient, TenantDatabase};

/// Handle to one tenant's fixed, named set of logical collections.
///
/// Cheap value object; re-derived on every resolve call.
#[derive(Clone)]
pub struct TenantStores {
    tenant: TenantId,
    db: Arc<TenantDatabase>,
}

impl TenantStores {
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn employees(&self) -> &Collection<Employee> {
        &self.db.employees
    }

    pub fn attendance(&self) -> &Collection<AttendanceRecord> {
        &self.db.attendance
    }

    pub fn promotions(&self) -> &Collection<Promotion> {
        &self.db.promotions
    }

    pub fn resignations(&self) -> &Collection<Resignation> {
        &self.db.resignations
    }

    pub fn terminations(&self) -> &Collection<Termination> {
        &self.db.terminations
    }

    pub fn policies(&self) -> &Collection<LeavePolicy> {
        &self.db.policies
    }
}

/// Handle to the shared administrative store (cross-tenant directories).
#[derive(Clone)]
pub struct GlobalStore {
    db: Arc<GlobalDatabase>,
}

impl GlobalStore {
    pub fn companies(&self) -> &Collection<Company> {
        &self.db.companies
    }
}

/// Resolves tenant identifiers to store handles.
#[derive(Clone)]
pub struct StoreResolver {
    client: Arc<StoreClient>,
}

impl StoreResolver {
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }

    /// Resolve a raw tenant identifier, enforcing the id format.
    ///
    /// Fails with `InvalidTenant` on a malformed id and `NotConnected` if
    /// the store client was never connected.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, tenant: &str) -> Result<TenantStores, AppError> {
        let tenant = TenantId::parse(tenant)?;
        self.resolve_id(&tenant)
    }

    /// Resolve an already-validated tenant id.
    pub fn resolve_id(&self, tenant: &TenantId) -> Result<TenantStores, AppError> {
        let db = self.client.tenant_database(tenant.as_str())?;
        Ok(TenantStores {
            tenant: tenant.clone(),
            db,
        })
    }

    /// Resolve the single shared administrative store.
    #[tracing::instrument(skip(self))]
    pub fn resolve_global(&self) -> Result<GlobalStore, AppError> {
        let db = self.client.global_database()?;
        Ok(GlobalStore { db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> StoreResolver {
        let client = Arc::new(StoreClient::new());
        client.connect().unwrap();
        StoreResolver::new(client)
    }

    #[test]
    fn test_resolve_validates_tenant_format() {
        let resolver = resolver();
        assert!(matches!(
            resolver.resolve("x"),
            Err(AppError::InvalidTenant(_))
        ));
        assert!(resolver.resolve("acme-corp").is_ok());
    }

    #[test]
    fn test_resolve_fails_before_connect() {
        let resolver = StoreResolver::new(Arc::new(StoreClient::new()));
        assert!(matches!(
            resolver.resolve("acme-corp"),
            Err(AppError::NotConnected)
        ));
        assert!(matches!(
            resolver.resolve_global(),
            Err(AppError::NotConnected)
        ));
    }

    #[test]
    fn test_handles_share_tenant_data() {
        let resolver = resolver();
        let a = resolver.resolve("acme-corp").unwrap();
        let b = resolver.resolve("acme-corp").unwrap();
        let emp = kadro_core::models::Employee::new("EMP-001", "Ada", "Lovelace");
        a.employees().insert(emp.id, emp.clone()).unwrap();
        assert!(b.employees().get(emp.id).unwrap().is_some());
    }
}
