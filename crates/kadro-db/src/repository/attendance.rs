//! Attendance repository.
//!
//! Per-day uniqueness is a query invariant, not a stored composite key; the
//! attendance service holds the employee lock while it checks and inserts.

use chrono::NaiveDate;
use uuid::Uuid;

use kadro_core::error::AppError;
use kadro_core::models::tenant::TenantId;
use kadro_core::models::AttendanceRecord;

use crate::resolver::StoreResolver;

#[derive(Clone)]
pub struct AttendanceRepository {
    resolver: StoreResolver,
}

impl AttendanceRepository {
    pub fn new(resolver: StoreResolver) -> Self {
        Self { resolver }
    }

    #[tracing::instrument(skip(self, record), fields(store.collection = "attendance", record_id = %record.id))]
    pub async fn insert(&self, tenant: &TenantId, record: AttendanceRecord) -> Result<(), AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.attendance().insert(record.id, record)
    }

    #[tracing::instrument(skip(self), fields(store.collection = "attendance"))]
    pub async fn get(
        &self,
        tenant: &TenantId,
        id: Uuid,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.attendance().get(id)
    }

    /// The (employee, day) record, ignoring soft-deleted ones.
    #[tracing::instrument(skip(self), fields(store.collection = "attendance"))]
    pub async fn find_for_day(
        &self,
        tenant: &TenantId,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores
            .attendance()
            .find_one(|r| r.employee_id == employee_id && r.date == date && !r.is_deleted())
    }

    /// Date-filtered records for one employee (or all employees when
    /// `employee_id` is `None`), soft-deleted excluded.
    #[tracing::instrument(skip(self), fields(store.collection = "attendance"))]
    pub async fn find_range(
        &self,
        tenant: &TenantId,
        employee_id: Option<Uuid>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.attendance().find(|r| {
            !r.is_deleted()
                && r.date >= from
                && r.date <= to
                && employee_id.map(|id| r.employee_id == id).unwrap_or(true)
        })
    }

    /// Atomic read-modify-write on one record.
    #[tracing::instrument(skip(self, f), fields(store.collection = "attendance"))]
    pub async fn update<F>(
        &self,
        tenant: &TenantId,
        id: Uuid,
        f: F,
    ) -> Result<Option<AttendanceRecord>, AppError>
    where
        F: FnOnce(&mut AttendanceRecord),
    {
        let stores = self.resolver.resolve_id(tenant)?;
        stores.attendance().update(id, f)
    }
}
