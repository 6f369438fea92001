//! Attendance service.
//!
//! State machine per (employee, calendar day):
//! `NotClockedIn -> ClockedIn -> ClockedOut`, with the regularization
//! sub-machine `NoRequest -> Pending -> Approved | Rejected` attached once
//! the day is recorded. Clock operations hold the per-employee lock, so two
//! near-simultaneous clock-ins cannot both create a record for the day.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use kadro_core::config::AttendanceConfig;
use kadro_core::error::AppError;
use kadro_core::hooks::{DomainEvent, EventKind, EventSink};
use kadro_core::models::actor::ActorContext;
use kadro_core::models::attendance::{
    AttendanceRecord, AttendanceStatistics, AttendanceStatus, ClockEvent, RegularizationRequest,
    RegularizationStatus,
};
use kadro_db::{AttendanceRepository, EmployeeRepository, LockRegistry, StoreResolver};

use super::types::{
    BulkAction, BulkActionResult, BulkOutcome, ClockInInput, ClockOutInput, RegularizationInput,
};

/// Derived work hours: wall time between the clock events minus the break,
/// clamped at zero.
pub(crate) fn work_hours(
    clock_in: chrono::DateTime<Utc>,
    clock_out: chrono::DateTime<Utc>,
    break_minutes: i64,
) -> f64 {
    let worked_secs = (clock_out - clock_in).num_seconds() - break_minutes * 60;
    (worked_secs.max(0) as f64) / 3600.0
}

#[derive(Clone)]
pub struct AttendanceService {
    employees: EmployeeRepository,
    attendance: AttendanceRepository,
    locks: Arc<LockRegistry>,
    events: Arc<dyn EventSink>,
    config: AttendanceConfig,
}

impl AttendanceService {
    pub fn new(
        resolver: StoreResolver,
        locks: Arc<LockRegistry>,
        events: Arc<dyn EventSink>,
        config: AttendanceConfig,
    ) -> Self {
        Self {
            employees: EmployeeRepository::new(resolver.clone()),
            attendance: AttendanceRepository::new(resolver),
            locks,
            events,
            config,
        }
    }

    /// Sink failures are logged, never surfaced to the actor.
    async fn emit(&self, event: DomainEvent) {
        if let Err(e) = self.events.emit(event).await {
            tracing::warn!(error = %e, "event sink emit failed");
        }
    }

    /// Clock the acting employee in for today.
    #[tracing::instrument(skip(self, ctx, input), fields(tenant = %ctx.tenant, employee_id = %ctx.actor_id))]
    pub async fn clock_in(
        &self,
        ctx: &ActorContext,
        input: ClockInInput,
    ) -> Result<AttendanceRecord, AppError> {
        input.validate()?;
        let time = input.time.unwrap_or_else(Utc::now);
        let date = time.date_naive();

        let lock = self.locks.for_employee(&ctx.tenant, ctx.actor_id);
        let _guard = lock.lock().await;

        self.employees.get_required(&ctx.tenant, ctx.actor_id).await?;

        let clock_in = ClockEvent {
            time,
            location: input.location,
            notes: input.notes,
        };
        let late_after = self.config.work_start
            + Duration::minutes(self.config.late_grace_minutes);
        let status = if time.time() > late_after {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };

        let record = match self
            .attendance
            .find_for_day(&ctx.tenant, ctx.actor_id, date)
            .await?
        {
            Some(existing) if existing.has_open_clock_in() => {
                return Err(AppError::AlreadyClockedIn(format!(
                    "open clock-in exists for {}",
                    date
                )));
            }
            Some(existing) if existing.clock_out.is_some() => {
                return Err(AppError::AlreadyClockedOut(format!(
                    "attendance for {} is already completed",
                    date
                )));
            }
            Some(existing) => {
                // Record pre-created by a status marking (leave, holiday);
                // attach the clock-in to it.
                let now = Utc::now();
                self.attendance
                    .update(&ctx.tenant, existing.id, |r| {
                        r.clock_in = Some(clock_in.clone());
                        r.status = status;
                        r.updated_at = now;
                    })
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("attendance {}", existing.id)))?
            }
            None => {
                let now = Utc::now();
                let record = AttendanceRecord {
                    id: Uuid::new_v4(),
                    employee_id: ctx.actor_id,
                    date,
                    clock_in: Some(clock_in),
                    clock_out: None,
                    break_minutes: 0,
                    work_hours: 0.0,
                    status,
                    regularization: None,
                    is_regularized: false,
                    deleted_at: None,
                    created_at: now,
                    updated_at: now,
                };
                self.attendance.insert(&ctx.tenant, record.clone()).await?;
                record
            }
        };

        self.emit(DomainEvent::new(
            EventKind::ClockIn,
            ctx.tenant.clone(),
            Some(ctx.actor_id),
            json!({ "record_id": record.id, "date": date, "time": time }),
        ))
        .await;
        Ok(record)
    }

    /// Clock the acting employee out for today, deriving work hours.
    #[tracing::instrument(skip(self, ctx, input), fields(tenant = %ctx.tenant, employee_id = %ctx.actor_id))]
    pub async fn clock_out(
        &self,
        ctx: &ActorContext,
        input: ClockOutInput,
    ) -> Result<AttendanceRecord, AppError> {
        input.validate()?;
        let time = input.time.unwrap_or_else(Utc::now);
        let date = time.date_naive();

        let lock = self.locks.for_employee(&ctx.tenant, ctx.actor_id);
        let _guard = lock.lock().await;

        let record = self
            .attendance
            .find_for_day(&ctx.tenant, ctx.actor_id, date)
            .await?
            .ok_or_else(|| {
                AppError::NotClockedIn(format!("no attendance record for {}", date))
            })?;
        let clock_in = match (&record.clock_in, &record.clock_out) {
            (None, _) => {
                return Err(AppError::NotClockedIn(format!(
                    "no clock-in recorded for {}",
                    date
                )))
            }
            (Some(_), Some(_)) => {
                return Err(AppError::AlreadyClockedOut(format!(
                    "already clocked out for {}",
                    date
                )))
            }
            (Some(ci), None) => ci.clone(),
        };
        if time <= clock_in.time {
            return Err(AppError::InvalidInput(
                "clock-out time must be strictly after clock-in time".into(),
            ));
        }

        let break_minutes = input.break_minutes.unwrap_or(record.break_minutes);
        let hours = work_hours(clock_in.time, time, break_minutes);
        let now = Utc::now();
        let updated = self
            .attendance
            .update(&ctx.tenant, record.id, |r| {
                r.clock_out = Some(ClockEvent {
                    time,
                    location: input.location.clone(),
                    notes: input.notes.clone(),
                });
                r.break_minutes = break_minutes;
                r.work_hours = hours;
                r.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("attendance {}", record.id)))?;

        self.emit(DomainEvent::new(
            EventKind::ClockOut,
            ctx.tenant.clone(),
            Some(ctx.actor_id),
            json!({ "record_id": updated.id, "date": date, "work_hours": hours }),
        ))
        .await;
        Ok(updated)
    }

    /// Open a regularization request against a recorded day.
    #[tracing::instrument(skip(self, ctx, input), fields(tenant = %ctx.tenant))]
    pub async fn request_regularization(
        &self,
        ctx: &ActorContext,
        record_id: Uuid,
        input: RegularizationInput,
    ) -> Result<AttendanceRecord, AppError> {
        input.validate()?;
        let record = self.get_record(ctx, record_id).await?;
        if record.employee_id != ctx.actor_id && !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only the owning employee may request regularization".into(),
            ));
        }
        if record.has_pending_regularization() {
            return Err(AppError::RegularizationAlreadyRequested(format!(
                "attendance {}",
                record_id
            )));
        }

        let now = Utc::now();
        let updated = self
            .attendance
            .update(&ctx.tenant, record_id, |r| {
                r.regularization = Some(RegularizationRequest {
                    reason: input.reason.clone(),
                    status: RegularizationStatus::Pending,
                    requested_by: ctx.actor_id,
                    requested_at: now,
                    decided_by: None,
                    decided_at: None,
                    decision_reason: None,
                });
                r.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("attendance {}", record_id)))?;

        self.emit(DomainEvent::new(
            EventKind::RegularizationRequested,
            ctx.tenant.clone(),
            Some(record.employee_id),
            json!({ "record_id": record_id }),
        ))
        .await;
        Ok(updated)
    }

    /// Approve a pending regularization request; marks the record
    /// regularized. Terminal for that request.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn approve_regularization(
        &self,
        ctx: &ActorContext,
        record_id: Uuid,
    ) -> Result<AttendanceRecord, AppError> {
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may decide regularizations".into(),
            ));
        }
        let updated = self.approve_regularization_inner(ctx, record_id).await?;
        self.emit(DomainEvent::new(
            EventKind::RegularizationApproved,
            ctx.tenant.clone(),
            Some(updated.employee_id),
            json!({ "record_id": record_id }),
        ))
        .await;
        Ok(updated)
    }

    async fn approve_regularization_inner(
        &self,
        ctx: &ActorContext,
        record_id: Uuid,
    ) -> Result<AttendanceRecord, AppError> {
        let record = self.get_record(ctx, record_id).await?;
        if !record.has_pending_regularization() {
            return Err(AppError::NoRegularizationRequest(format!(
                "attendance {}",
                record_id
            )));
        }
        let now = Utc::now();
        self.attendance
            .update(&ctx.tenant, record_id, |r| {
                if let Some(req) = r.regularization.as_mut() {
                    req.status = RegularizationStatus::Approved;
                    req.decided_by = Some(ctx.actor_id);
                    req.decided_at = Some(now);
                }
                r.is_regularized = true;
                r.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("attendance {}", record_id)))
    }

    /// Reject a pending regularization request with a mandatory reason.
    /// Terminal for that request; a new one may be opened afterward.
    #[tracing::instrument(skip(self, ctx, reason), fields(tenant = %ctx.tenant))]
    pub async fn reject_regularization(
        &self,
        ctx: &ActorContext,
        record_id: Uuid,
        reason: &str,
    ) -> Result<AttendanceRecord, AppError> {
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may decide regularizations".into(),
            ));
        }
        let updated = self
            .reject_regularization_inner(ctx, record_id, reason)
            .await?;
        self.emit(DomainEvent::new(
            EventKind::RegularizationRejected,
            ctx.tenant.clone(),
            Some(updated.employee_id),
            json!({ "record_id": record_id }),
        ))
        .await;
        Ok(updated)
    }

    async fn reject_regularization_inner(
        &self,
        ctx: &ActorContext,
        record_id: Uuid,
        reason: &str,
    ) -> Result<AttendanceRecord, AppError> {
        if reason.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "a rejection reason is required".into(),
            ));
        }
        let record = self.get_record(ctx, record_id).await?;
        if !record.has_pending_regularization() {
            return Err(AppError::NoRegularizationRequest(format!(
                "attendance {}",
                record_id
            )));
        }
        let now = Utc::now();
        self.attendance
            .update(&ctx.tenant, record_id, |r| {
                if let Some(req) = r.regularization.as_mut() {
                    req.status = RegularizationStatus::Rejected;
                    req.decided_by = Some(ctx.actor_id);
                    req.decided_at = Some(now);
                    req.decision_reason = Some(reason.to_string());
                }
                r.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("attendance {}", record_id)))
    }

    /// Apply one action to many records. Processes record-by-record; per-
    /// record failures are reported in the outcome list and never abort the
    /// rest. Structurally succeeds even when zero records matched.
    #[tracing::instrument(skip(self, ctx, action), fields(tenant = %ctx.tenant, action = action.name(), records = record_ids.len()))]
    pub async fn bulk(
        &self,
        ctx: &ActorContext,
        action: BulkAction,
        record_ids: &[Uuid],
    ) -> Result<BulkActionResult, AppError> {
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may run bulk actions".into(),
            ));
        }
        let mut outcomes = Vec::with_capacity(record_ids.len());
        let mut updated = 0usize;
        for &record_id in record_ids {
            let result = match &action {
                BulkAction::ApproveRegularization => self
                    .approve_regularization_inner(ctx, record_id)
                    .await
                    .map(|_| ()),
                BulkAction::RejectRegularization { reason } => self
                    .reject_regularization_inner(ctx, record_id, reason)
                    .await
                    .map(|_| ()),
                BulkAction::UpdateStatus { status } => {
                    self.update_status_inner(ctx, record_id, *status).await
                }
                BulkAction::Delete => self.soft_delete_inner(ctx, record_id).await,
            };
            match result {
                Ok(()) => {
                    updated += 1;
                    outcomes.push(BulkOutcome {
                        record_id,
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::debug!(record_id = %record_id, error = %e, "bulk action skipped record");
                    outcomes.push(BulkOutcome {
                        record_id,
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        self.emit(DomainEvent::new(
            EventKind::BulkActionCompleted,
            ctx.tenant.clone(),
            None,
            json!({ "action": action.name(), "total": record_ids.len(), "updated": updated }),
        ))
        .await;
        Ok(BulkActionResult {
            total: record_ids.len(),
            updated,
            outcomes,
        })
    }

    async fn update_status_inner(
        &self,
        ctx: &ActorContext,
        record_id: Uuid,
        status: AttendanceStatus,
    ) -> Result<(), AppError> {
        self.get_record(ctx, record_id).await?;
        let now = Utc::now();
        self.attendance
            .update(&ctx.tenant, record_id, |r| {
                r.status = status;
                r.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("attendance {}", record_id)))?;
        Ok(())
    }

    async fn soft_delete_inner(&self, ctx: &ActorContext, record_id: Uuid) -> Result<(), AppError> {
        self.get_record(ctx, record_id).await?;
        let now = Utc::now();
        self.attendance
            .update(&ctx.tenant, record_id, |r| {
                r.deleted_at = Some(now);
                r.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("attendance {}", record_id)))?;
        Ok(())
    }

    async fn get_record(
        &self,
        ctx: &ActorContext,
        record_id: Uuid,
    ) -> Result<AttendanceRecord, AppError> {
        match self.attendance.get(&ctx.tenant, record_id).await? {
            Some(r) if !r.is_deleted() => Ok(r),
            _ => Err(AppError::NotFound(format!("attendance {}", record_id))),
        }
    }

    /// Read-only aggregation over a date-filtered record set.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn statistics(
        &self,
        ctx: &ActorContext,
        employee_id: Uuid,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<AttendanceStatistics, AppError> {
        let records = self
            .attendance
            .find_range(&ctx.tenant, Some(employee_id), from, to)
            .await?;

        let mut stats = AttendanceStatistics {
            total_records: records.len(),
            ..Default::default()
        };
        let mut clocked_hours = 0.0;
        let mut clocked_days = 0usize;
        for r in &records {
            match r.status {
                AttendanceStatus::Present => stats.present_days += 1,
                AttendanceStatus::Absent => stats.absent_days += 1,
                AttendanceStatus::Late => stats.late_days += 1,
                AttendanceStatus::HalfDay => stats.half_days += 1,
                AttendanceStatus::OnLeave => stats.on_leave_days += 1,
                AttendanceStatus::Holiday | AttendanceStatus::Weekend => {}
            }
            if r.clock_out.is_some() {
                clocked_hours += r.work_hours;
                clocked_days += 1;
            }
        }
        if stats.total_records > 0 {
            let attended =
                stats.present_days as f64 + stats.late_days as f64 + stats.half_days as f64 * 0.5;
            stats.attendance_rate = attended / stats.total_records as f64 * 100.0;
        }
        if clocked_days > 0 {
            stats.average_work_hours = clocked_hours / clocked_days as f64;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_work_hours_formula() {
        let clock_in = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let clock_out = Utc.with_ymd_and_hms(2026, 3, 2, 17, 30, 0).unwrap();
        assert_eq!(work_hours(clock_in, clock_out, 30), 8.0);
    }

    #[test]
    fn test_work_hours_clamped_at_zero() {
        let clock_in = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let clock_out = Utc.with_ymd_and_hms(2026, 3, 2, 9, 10, 0).unwrap();
        // Break longer than the worked interval clamps to zero.
        assert_eq!(work_hours(clock_in, clock_out, 60), 0.0);
    }
}
