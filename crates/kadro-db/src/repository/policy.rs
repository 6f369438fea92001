//! Leave policy repository.

use kadro_core::error::AppError;
use kadro_core::models::tenant::TenantId;
use kadro_core::models::LeavePolicy;

use crate::resolver::StoreResolver;

#[derive(Clone)]
pub struct PolicyRepository {
    resolver: StoreResolver,
}

impl PolicyRepository {
    pub fn new(resolver: StoreResolver) -> Self {
        Self { resolver }
    }

    #[tracing::instrument(skip(self, policy), fields(store.collection = "policies", leave_type = %policy.leave_type))]
    pub async fn upsert(&self, tenant: &TenantId, policy: LeavePolicy) -> Result<(), AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.policies().insert(policy.id, policy)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "policies"))]
    pub async fn find_by_type(
        &self,
        tenant: &TenantId,
        leave_type: &str,
    ) -> Result<Option<LeavePolicy>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.policies().find_one(|p| p.leave_type == leave_type)
    }
}
