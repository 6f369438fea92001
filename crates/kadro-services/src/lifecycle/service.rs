//! Lifecycle process service.
//!
//! Enforces the single-open-process invariant: for a given employee, at most
//! one promotion, resignation, or termination may be open at a time. The
//! conflict scan on its own is advisory; creation paths hold the
//! per-(tenant, employee) lock across re-check and insert, which makes the
//! check-then-act sequence exclusive.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use kadro_core::error::AppError;
use kadro_core::models::actor::ActorContext;
use kadro_core::models::lifecycle::{
    ProcessKind, Promotion, PromotionStatus, Resignation, ResignationStatus, Termination,
    TerminationStatus,
};
use kadro_core::models::employee::EmploymentStatus;
use kadro_db::{
    EmployeeRepository, LockRegistry, PromotionRepository, ResignationRepository, StoreResolver,
    TerminationRepository,
};

/// Outcome of an advisory conflict scan.
#[derive(Debug, Clone, Serialize)]
pub enum ConflictCheck {
    Ok,
    Conflict { kind: ProcessKind, reason: String },
}

impl ConflictCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, ConflictCheck::Ok)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PromotionInput {
    pub employee_id: String,
    pub to_designation_id: Uuid,
    pub effective_date: NaiveDate,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResignationInput {
    pub employee_id: String,
    pub notice_date: NaiveDate,
    pub last_working_day: NaiveDate,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TerminationInput {
    pub employee_id: String,
    pub termination_date: NaiveDate,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

#[derive(Clone)]
pub struct LifecycleService {
    employees: EmployeeRepository,
    promotions: PromotionRepository,
    resignations: ResignationRepository,
    terminations: TerminationRepository,
    locks: Arc<LockRegistry>,
}

impl LifecycleService {
    pub fn new(resolver: StoreResolver, locks: Arc<LockRegistry>) -> Self {
        Self {
            employees: EmployeeRepository::new(resolver.clone()),
            promotions: PromotionRepository::new(resolver.clone()),
            resignations: ResignationRepository::new(resolver.clone()),
            terminations: TerminationRepository::new(resolver),
            locks,
        }
    }

    fn parse_employee_id(employee_id: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(employee_id).map_err(|_| AppError::InvalidEmployee(employee_id.to_string()))
    }

    /// Advisory conflict scan.
    ///
    /// Scans the process kinds other than `candidate` in the fixed order
    /// Promotion -> Resignation -> Termination and reports the first open
    /// record found. `exclude` skips one record id, supporting
    /// edit-in-place flows. Callers that create records must re-check under
    /// the employee lock; `create_*` below does exactly that.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn validate(
        &self,
        ctx: &ActorContext,
        employee_id: &str,
        candidate: ProcessKind,
        exclude: Option<Uuid>,
    ) -> Result<ConflictCheck, AppError> {
        let employee_id = Self::parse_employee_id(employee_id)?;
        self.employees.get_required(&ctx.tenant, employee_id).await?;
        self.scan_conflicts(ctx, employee_id, candidate, exclude)
            .await
    }

    async fn scan_conflicts(
        &self,
        ctx: &ActorContext,
        employee_id: Uuid,
        candidate: ProcessKind,
        exclude: Option<Uuid>,
    ) -> Result<ConflictCheck, AppError> {
        for kind in ProcessKind::SCAN_ORDER {
            if kind == candidate {
                continue;
            }
            let conflict = match kind {
                ProcessKind::Promotion => self
                    .promotions
                    .find_open(&ctx.tenant, employee_id, exclude)
                    .await?
                    .map(|p| format!("promotion {} is {:?}", p.id, p.status)),
                ProcessKind::Resignation => self
                    .resignations
                    .find_open(&ctx.tenant, employee_id, exclude)
                    .await?
                    .map(|r| format!("resignation {} is {:?}", r.id, r.status)),
                ProcessKind::Termination => self
                    .terminations
                    .find_open(&ctx.tenant, employee_id, exclude)
                    .await?
                    .map(|t| format!("termination {} is {:?}", t.id, t.status)),
            };
            if let Some(reason) = conflict {
                return Ok(ConflictCheck::Conflict { kind, reason });
            }
        }
        Ok(ConflictCheck::Ok)
    }

    /// Re-check under the lock and convert a conflict into an error.
    async fn ensure_no_conflict(
        &self,
        ctx: &ActorContext,
        employee_id: Uuid,
        candidate: ProcessKind,
    ) -> Result<(), AppError> {
        match self.scan_conflicts(ctx, employee_id, candidate, None).await? {
            ConflictCheck::Ok => Ok(()),
            ConflictCheck::Conflict { kind, reason } => Err(AppError::LifecycleConflict {
                conflict: kind,
                reason,
            }),
        }
    }

    /// Create a promotion. A promotion whose effective date is today or in
    /// the past is applied immediately at creation; deferred auto-apply of
    /// a pending past-dated promotion is deliberately not a thing.
    #[tracing::instrument(skip(self, ctx, input), fields(tenant = %ctx.tenant))]
    pub async fn create_promotion(
        &self,
        ctx: &ActorContext,
        input: PromotionInput,
    ) -> Result<Promotion, AppError> {
        input.validate()?;
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may create promotions".into(),
            ));
        }
        let employee_id = Self::parse_employee_id(&input.employee_id)?;

        let lock = self.locks.for_employee(&ctx.tenant, employee_id);
        let _guard = lock.lock().await;

        let employee = self.employees.get_required(&ctx.tenant, employee_id).await?;
        self.ensure_no_conflict(ctx, employee_id, ProcessKind::Promotion)
            .await?;

        let now = Utc::now();
        let is_due = input.effective_date <= now.date_naive();
        let mut promotion = Promotion {
            id: Uuid::new_v4(),
            employee_id,
            status: PromotionStatus::Pending,
            from_designation_id: employee.designation_id,
            to_designation_id: input.to_designation_id,
            effective_date: input.effective_date,
            notes: input.notes,
            created_by: ctx.actor_id,
            created_at: now,
            decided_by: None,
            updated_at: now,
        };
        if is_due {
            promotion.status = PromotionStatus::Applied;
            promotion.decided_by = Some(ctx.actor_id);
            self.supersede_applied(ctx, employee_id, promotion.id).await?;
            self.employees
                .update(&ctx.tenant, employee_id, |e| {
                    e.designation_id = Some(input.to_designation_id);
                    e.updated_at = now;
                })
                .await?;
        }
        self.promotions.insert(&ctx.tenant, promotion.clone()).await?;
        tracing::info!(promotion_id = %promotion.id, applied = is_due, "promotion created");
        Ok(promotion)
    }

    /// Apply a pending promotion: updates the employee's designation and
    /// supersedes any previously applied promotion.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn apply_promotion(
        &self,
        ctx: &ActorContext,
        promotion_id: Uuid,
    ) -> Result<Promotion, AppError> {
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may apply promotions".into(),
            ));
        }
        let promotion = self
            .promotions
            .get(&ctx.tenant, promotion_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("promotion {}", promotion_id)))?;
        if promotion.status != PromotionStatus::Pending {
            return Err(AppError::InvalidInput(format!(
                "promotion {} is not pending",
                promotion_id
            )));
        }

        let lock = self.locks.for_employee(&ctx.tenant, promotion.employee_id);
        let _guard = lock.lock().await;

        self.supersede_applied(ctx, promotion.employee_id, promotion_id)
            .await?;
        let now = Utc::now();
        self.employees
            .update(&ctx.tenant, promotion.employee_id, |e| {
                e.designation_id = Some(promotion.to_designation_id);
                e.updated_at = now;
            })
            .await?;
        let updated = self
            .promotions
            .update(&ctx.tenant, promotion_id, |p| {
                p.status = PromotionStatus::Applied;
                p.decided_by = Some(ctx.actor_id);
                p.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("promotion {}", promotion_id)))?;
        Ok(updated)
    }

    /// Cancel a pending promotion.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn cancel_promotion(
        &self,
        ctx: &ActorContext,
        promotion_id: Uuid,
    ) -> Result<Promotion, AppError> {
        self.transition_promotion(
            ctx,
            promotion_id,
            PromotionStatus::Pending,
            PromotionStatus::Cancelled,
        )
        .await
    }

    async fn transition_promotion(
        &self,
        ctx: &ActorContext,
        promotion_id: Uuid,
        from: PromotionStatus,
        to: PromotionStatus,
    ) -> Result<Promotion, AppError> {
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may decide promotions".into(),
            ));
        }
        let promotion = self
            .promotions
            .get(&ctx.tenant, promotion_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("promotion {}", promotion_id)))?;
        if promotion.status != from {
            return Err(AppError::InvalidInput(format!(
                "promotion {} is not {:?}",
                promotion_id, from
            )));
        }
        let now = Utc::now();
        self.promotions
            .update(&ctx.tenant, promotion_id, |p| {
                p.status = to;
                p.decided_by = Some(ctx.actor_id);
                p.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("promotion {}", promotion_id)))
    }

    /// Mark previously applied promotions as superseded, leaving at most
    /// one applied promotion per employee.
    async fn supersede_applied(
        &self,
        ctx: &ActorContext,
        employee_id: Uuid,
        except: Uuid,
    ) -> Result<(), AppError> {
        let open = self
            .promotions
            .find_all_open(&ctx.tenant, employee_id)
            .await?;
        let now = Utc::now();
        for prior in open
            .into_iter()
            .filter(|p| p.status == PromotionStatus::Applied && p.id != except)
        {
            self.promotions
                .update(&ctx.tenant, prior.id, |p| {
                    p.status = PromotionStatus::Superseded;
                    p.updated_at = now;
                })
                .await?;
        }
        Ok(())
    }

    /// Create a resignation for the acting employee (or, with an elevated
    /// role, on an employee's behalf).
    #[tracing::instrument(skip(self, ctx, input), fields(tenant = %ctx.tenant))]
    pub async fn create_resignation(
        &self,
        ctx: &ActorContext,
        input: ResignationInput,
    ) -> Result<Resignation, AppError> {
        input.validate()?;
        let employee_id = Self::parse_employee_id(&input.employee_id)?;
        if employee_id != ctx.actor_id && !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "employees may only resign on their own behalf".into(),
            ));
        }

        let lock = self.locks.for_employee(&ctx.tenant, employee_id);
        let _guard = lock.lock().await;

        self.employees.get_required(&ctx.tenant, employee_id).await?;
        self.ensure_no_conflict(ctx, employee_id, ProcessKind::Resignation)
            .await?;

        let now = Utc::now();
        let resignation = Resignation {
            id: Uuid::new_v4(),
            employee_id,
            status: ResignationStatus::Pending,
            notice_date: input.notice_date,
            last_working_day: input.last_working_day,
            reason: input.reason,
            created_by: ctx.actor_id,
            created_at: now,
            decided_by: None,
            updated_at: now,
        };
        self.resignations
            .insert(&ctx.tenant, resignation.clone())
            .await?;
        tracing::info!(resignation_id = %resignation.id, "resignation created");
        Ok(resignation)
    }

    /// Approve a pending resignation; the employee moves to on-notice.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn approve_resignation(
        &self,
        ctx: &ActorContext,
        resignation_id: Uuid,
    ) -> Result<Resignation, AppError> {
        let updated = self
            .transition_resignation(ctx, resignation_id, ResignationStatus::Approved)
            .await?;
        let now = Utc::now();
        self.employees
            .update(&ctx.tenant, updated.employee_id, |e| {
                e.status = EmploymentStatus::OnNotice;
                e.updated_at = now;
            })
            .await?;
        Ok(updated)
    }

    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn reject_resignation(
        &self,
        ctx: &ActorContext,
        resignation_id: Uuid,
    ) -> Result<Resignation, AppError> {
        self.transition_resignation(ctx, resignation_id, ResignationStatus::Rejected)
            .await
    }

    /// Withdraw a pending resignation. Allowed for the owning employee as
    /// well as elevated roles.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn withdraw_resignation(
        &self,
        ctx: &ActorContext,
        resignation_id: Uuid,
    ) -> Result<Resignation, AppError> {
        let resignation = self
            .resignations
            .get(&ctx.tenant, resignation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resignation {}", resignation_id)))?;
        if resignation.employee_id != ctx.actor_id && !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only the owner may withdraw a resignation".into(),
            ));
        }
        if resignation.status != ResignationStatus::Pending {
            return Err(AppError::InvalidInput(format!(
                "resignation {} is not pending",
                resignation_id
            )));
        }
        let now = Utc::now();
        self.resignations
            .update(&ctx.tenant, resignation_id, |r| {
                r.status = ResignationStatus::Withdrawn;
                r.decided_by = Some(ctx.actor_id);
                r.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resignation {}", resignation_id)))
    }

    async fn transition_resignation(
        &self,
        ctx: &ActorContext,
        resignation_id: Uuid,
        to: ResignationStatus,
    ) -> Result<Resignation, AppError> {
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may decide resignations".into(),
            ));
        }
        let resignation = self
            .resignations
            .get(&ctx.tenant, resignation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resignation {}", resignation_id)))?;
        if resignation.status != ResignationStatus::Pending {
            return Err(AppError::InvalidInput(format!(
                "resignation {} is not pending",
                resignation_id
            )));
        }
        let now = Utc::now();
        self.resignations
            .update(&ctx.tenant, resignation_id, |r| {
                r.status = to;
                r.decided_by = Some(ctx.actor_id);
                r.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resignation {}", resignation_id)))
    }

    /// Create a termination process. Elevated roles only.
    #[tracing::instrument(skip(self, ctx, input), fields(tenant = %ctx.tenant))]
    pub async fn create_termination(
        &self,
        ctx: &ActorContext,
        input: TerminationInput,
    ) -> Result<Termination, AppError> {
        input.validate()?;
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may create terminations".into(),
            ));
        }
        let employee_id = Self::parse_employee_id(&input.employee_id)?;

        let lock = self.locks.for_employee(&ctx.tenant, employee_id);
        let _guard = lock.lock().await;

        self.employees.get_required(&ctx.tenant, employee_id).await?;
        self.ensure_no_conflict(ctx, employee_id, ProcessKind::Termination)
            .await?;

        let now = Utc::now();
        let termination = Termination {
            id: Uuid::new_v4(),
            employee_id,
            status: TerminationStatus::Pending,
            termination_date: input.termination_date,
            reason: input.reason,
            created_by: ctx.actor_id,
            created_at: now,
            decided_by: None,
            updated_at: now,
        };
        self.terminations
            .insert(&ctx.tenant, termination.clone())
            .await?;
        tracing::info!(termination_id = %termination.id, "termination created");
        Ok(termination)
    }

    /// Process a pending termination; the employee is marked terminated
    /// (soft status, never a physical delete).
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn process_termination(
        &self,
        ctx: &ActorContext,
        termination_id: Uuid,
    ) -> Result<Termination, AppError> {
        let updated = self
            .transition_termination(ctx, termination_id, TerminationStatus::Processed)
            .await?;
        let now = Utc::now();
        self.employees
            .update(&ctx.tenant, updated.employee_id, |e| {
                e.status = EmploymentStatus::Terminated;
                e.updated_at = now;
            })
            .await?;
        Ok(updated)
    }

    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant))]
    pub async fn cancel_termination(
        &self,
        ctx: &ActorContext,
        termination_id: Uuid,
    ) -> Result<Termination, AppError> {
        self.transition_termination(ctx, termination_id, TerminationStatus::Cancelled)
            .await
    }

    async fn transition_termination(
        &self,
        ctx: &ActorContext,
        termination_id: Uuid,
        to: TerminationStatus,
    ) -> Result<Termination, AppError> {
        if !ctx.role.is_elevated() {
            return Err(AppError::Unauthorized(
                "only managers may decide terminations".into(),
            ));
        }
        let termination = self
            .terminations
            .get(&ctx.tenant, termination_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("termination {}", termination_id)))?;
        if termination.status != TerminationStatus::Pending {
            return Err(AppError::InvalidInput(format!(
                "termination {} is not pending",
                termination_id
            )));
        }
        let now = Utc::now();
        self.terminations
            .update(&ctx.tenant, termination_id, |t| {
                t.status = to;
                t.decided_by = Some(ctx.actor_id);
                t.updated_at = now;
            })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("termination {}", termination_id)))
    }
}
