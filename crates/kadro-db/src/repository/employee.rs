//! Employee repository.

use uuid::Uuid;

use kadro_core::error::AppError;
use kadro_core::models::tenant::TenantId;
use kadro_core::models::Employee;

use crate::resolver::StoreResolver;

#[derive(Clone)]
pub struct EmployeeRepository {
    resolver: StoreResolver,
}

impl EmployeeRepository {
    pub fn new(resolver: StoreResolver) -> Self {
        Self { resolver }
    }

    #[tracing::instrument(skip(self, employee), fields(store.collection = "employees", employee_id = %employee.id))]
    pub async fn insert(&self, tenant: &TenantId, employee: Employee) -> Result<(), AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.employees().insert(employee.id, employee)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "employees"))]
    pub async fn get(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Employee>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.employees().get(id)
    }

    /// Fetch an employee that must exist and not be soft-deleted; otherwise
    /// fails with `InvalidEmployee`.
    pub async fn get_required(&self, tenant: &TenantId, id: Uuid) -> Result<Employee, AppError> {
        match self.get(tenant, id).await? {
            Some(emp) if !emp.is_deleted() => Ok(emp),
            _ => Err(AppError::InvalidEmployee(id.to_string())),
        }
    }

    /// Atomic read-modify-write on one employee document.
    #[tracing::instrument(skip(self, f), fields(store.collection = "employees"))]
    pub async fn update<F>(
        &self,
        tenant: &TenantId,
        id: Uuid,
        f: F,
    ) -> Result<Option<Employee>, AppError>
    where
        F: FnOnce(&mut Employee),
    {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.employees().update(id, f)
    }

    /// Every employee that is not soft-deleted, regardless of employment
    /// status; terminated employees keep their records and balances.
    #[tracing::instrument(skip(self), fields(store.collection = "employees"))]
    pub async fn list_not_deleted(&self, tenant: &TenantId) -> Result<Vec<Employee>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.employees().find(|e| !e.is_deleted())
    }
}
