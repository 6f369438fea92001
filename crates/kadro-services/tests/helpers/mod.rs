//! Shared test fixtures: an in-memory store wired to the three services,
//! plus a recording event sink.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use kadro_core::config::{AttendanceConfig, CarryForwardConfig};
use kadro_core::hooks::{DomainEvent, EventKind, EventSink};
use kadro_core::models::actor::{ActorContext, ActorRole};
use kadro_core::models::employee::{Employee, LeaveBalance};
use kadro_core::models::tenant::TenantId;
use kadro_db::{EmployeeRepository, LockRegistry, StoreClient, StoreResolver};
use kadro_services::{AttendanceService, CarryForwardService, LifecycleService};

pub const TENANT: &str = "acme-corp";

/// Sink that records every emitted event.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    pub fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    pub fn total(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: DomainEvent) -> Result<(), String> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

pub struct TestEnv {
    pub resolver: StoreResolver,
    pub employees: EmployeeRepository,
    pub lifecycle: LifecycleService,
    pub attendance: AttendanceService,
    pub carryforward: CarryForwardService,
    pub sink: Arc<RecordingSink>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(CarryForwardConfig::default())
    }

    pub fn with_config(carryforward_config: CarryForwardConfig) -> Self {
        let client = Arc::new(StoreClient::new());
        client.connect().expect("connect in-memory store");
        let resolver = StoreResolver::new(client);
        let locks = Arc::new(LockRegistry::new());
        let sink = Arc::new(RecordingSink::default());
        Self {
            employees: EmployeeRepository::new(resolver.clone()),
            lifecycle: LifecycleService::new(resolver.clone(), Arc::clone(&locks)),
            attendance: AttendanceService::new(
                resolver.clone(),
                Arc::clone(&locks),
                sink.clone() as Arc<dyn EventSink>,
                AttendanceConfig::default(),
            ),
            carryforward: CarryForwardService::new(resolver.clone(), carryforward_config),
            resolver,
            sink,
        }
    }

    pub fn tenant(&self) -> TenantId {
        TenantId::parse(TENANT).unwrap()
    }

    pub async fn seed_employee(&self) -> Employee {
        let employee = Employee::new("EMP-001", "Ada", "Lovelace");
        self.employees
            .insert(&self.tenant(), employee.clone())
            .await
            .unwrap();
        employee
    }

    pub async fn seed_employee_with_balance(&self, leave_type: &str, balance: f64) -> Employee {
        let mut employee = Employee::new("EMP-002", "Grace", "Hopper");
        let mut lb = LeaveBalance::new(leave_type, balance.max(20.0));
        lb.used = lb.total - balance;
        lb.balance = balance;
        employee.leave_balances.push(lb);
        self.employees
            .insert(&self.tenant(), employee.clone())
            .await
            .unwrap();
        employee
    }

    pub fn employee_ctx(&self, employee: &Employee) -> ActorContext {
        ActorContext::new(TENANT, employee.id, ActorRole::Employee).unwrap()
    }

    pub fn hr_ctx(&self) -> ActorContext {
        ActorContext::new(TENANT, Uuid::new_v4(), ActorRole::HrAdmin).unwrap()
    }
}
