//! Company registry repository (shared administrative store).

use kadro_core::error::AppError;
use kadro_core::models::Company;

use crate::resolver::StoreResolver;

#[derive(Clone)]
pub struct CompanyRepository {
    resolver: StoreResolver,
}

impl CompanyRepository {
    pub fn new(resolver: StoreResolver) -> Self {
        Self { resolver }
    }

    #[tracing::instrument(skip(self, company), fields(store.collection = "companies", tenant = %company.tenant))]
    pub async fn register(&self, company: Company) -> Result<(), AppError> {
        let store = self.resolver.resolve_global()?;
        store.companies().insert(company.id, company)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "companies"))]
    pub async fn find_by_tenant(&self, tenant: &str) -> Result<Option<Company>, AppError> {
        let store = self.resolver.resolve_global()?;
        store.companies().find_one(|c| c.tenant.as_str() == tenant)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "companies"))]
    pub async fn list(&self) -> Result<Vec<Company>, AppError> {
        let store = self.resolver.resolve_global()?;
        store.companies().find(|_| true)
    }
}
