//! Per-(tenant, employee) async locks.
//!
//! The store has no cross-document transactions, so check-then-act
//! sequences (lifecycle conflict check + insert, attendance clock-in) hold
//! the employee's lock across the whole sequence.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use kadro_core::models::tenant::TenantId;

/// Registry of async mutexes keyed by (tenant, employee).
///
/// Locks are created on demand and kept for the life of the registry; the
/// population is bounded by the active workforce.
#[derive(Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<(String, Uuid), Arc<AsyncMutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch (or create) the lock for one employee. The caller awaits the
    /// returned mutex and holds the guard across its critical section.
    pub fn for_employee(&self, tenant: &TenantId, employee_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            locks
                .entry((tenant.as_str().to_string(), employee_id))
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_key_yields_same_lock() {
        let registry = LockRegistry::new();
        let tenant = TenantId::parse("acme-corp").unwrap();
        let employee = Uuid::new_v4();

        let a = registry.for_employee(&tenant, employee);
        let b = registry.for_employee(&tenant, employee);
        assert!(Arc::ptr_eq(&a, &b));

        let other = registry.for_employee(&tenant, Uuid::new_v4());
        assert!(!Arc::ptr_eq(&a, &other));
    }
}
