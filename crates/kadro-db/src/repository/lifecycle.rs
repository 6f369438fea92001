//! Lifecycle process repositories.
//!
//! One repository per process collection. Each exposes the same open-record
//! query the conflict validator scans with, honoring an optional excluded
//! record id for edit-in-place flows.

use uuid::Uuid;

use kadro_core::error::AppError;
use kadro_core::models::tenant::TenantId;
use kadro_core::models::{Promotion, Resignation, Termination};

use crate::resolver::StoreResolver;

#[derive(Clone)]
pub struct PromotionRepository {
    resolver: StoreResolver,
}

impl PromotionRepository {
    pub fn new(resolver: StoreResolver) -> Self {
        Self { resolver }
    }

    #[tracing::instrument(skip(self, promotion), fields(store.collection = "promotions", record_id = %promotion.id))]
    pub async fn insert(&self, tenant: &TenantId, promotion: Promotion) -> Result<(), AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.promotions().insert(promotion.id, promotion)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "promotions"))]
    pub async fn get(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Promotion>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.promotions().get(id)
    }

    #[tracing::instrument(skip(self, f), fields(store.collection = "promotions"))]
    pub async fn update<F>(
        &self,
        tenant: &TenantId,
        id: Uuid,
        f: F,
    ) -> Result<Option<Promotion>, AppError>
    where
        F: FnOnce(&mut Promotion),
    {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.promotions().update(id, f)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "promotions"))]
    pub async fn find_open(
        &self,
        tenant: &TenantId,
        employee_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<Option<Promotion>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.promotions().find_one(|p| {
            p.employee_id == employee_id && p.is_open() && Some(p.id) != exclude
        })
    }

    /// All open promotions for an employee (used when superseding).
    pub async fn find_all_open(
        &self,
        tenant: &TenantId,
        employee_id: Uuid,
    ) -> Result<Vec<Promotion>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores
            .promotions()
            .find(|p| p.employee_id == employee_id && p.is_open())
    }
}

#[derive(Clone)]
pub struct ResignationRepository {
    resolver: StoreResolver,
}

impl ResignationRepository {
    pub fn new(resolver: StoreResolver) -> Self {
        Self { resolver }
    }

    #[tracing::instrument(skip(self, resignation), fields(store.collection = "resignations", record_id = %resignation.id))]
    pub async fn insert(&self, tenant: &TenantId, resignation: Resignation) -> Result<(), AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.resignations().insert(resignation.id, resignation)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "resignations"))]
    pub async fn get(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Resignation>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.resignations().get(id)
    }

    #[tracing::instrument(skip(self, f), fields(store.collection = "resignations"))]
    pub async fn update<F>(
        &self,
        tenant: &TenantId,
        id: Uuid,
        f: F,
    ) -> Result<Option<Resignation>, AppError>
    where
        F: FnOnce(&mut Resignation),
    {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.resignations().update(id, f)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "resignations"))]
    pub async fn find_open(
        &self,
        tenant: &TenantId,
        employee_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<Option<Resignation>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.resignations().find_one(|r| {
            r.employee_id == employee_id && r.is_open() && Some(r.id) != exclude
        })
    }
}

#[derive(Clone)]
pub struct TerminationRepository {
    resolver: StoreResolver,
}

impl TerminationRepository {
    pub fn new(resolver: StoreResolver) -> Self {
        Self { resolver }
    }

    #[tracing::instrument(skip(self, termination), fields(store.collection = "terminations", record_id = %termination.id))]
    pub async fn insert(&self, tenant: &TenantId, termination: Termination) -> Result<(), AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.terminations().insert(termination.id, termination)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "terminations"))]
    pub async fn get(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Termination>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.terminations().get(id)
    }

    #[tracing::instrument(skip(self, f), fields(store.collection = "terminations"))]
    pub async fn update<F>(
        &self,
        tenant: &TenantId,
        id: Uuid,
        f: F,
    ) -> Result<Option<Termination>, AppError>
    where
        F: FnOnce(&mut Termination),
    {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.terminations().update(id, f)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "terminations"))]
    pub async fn find_open(
        &self,
        tenant: &TenantId,
        employee_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<Option<Termination>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.terminations().find_one(|t| {
            t.employee_id == employee_id && t.is_open() && Some(t.id) != exclude
        })
    }
}
