//! Store client and typed collections.
//!
//! The engine provides per-document atomic read-modify-write (the write
//! lock is held for the whole closure) but no cross-document transactions;
//! callers that need check-then-act across documents serialize through
//! [`crate::locks::LockRegistry`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use kadro_core::error::AppError;
use kadro_core::models::{
    AttendanceRecord, Company, Employee, LeavePolicy, Promotion, Resignation, Termination,
};

fn lock_poisoned(name: &str) -> AppError {
    AppError::Internal(format!("store lock poisoned for collection {}", name))
}

/// A named, typed collection of documents keyed by surrogate id.
///
/// Cheap to clone; all clones share the same underlying documents.
#[derive(Clone)]
pub struct Collection<T> {
    name: &'static str,
    docs: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone> Collection<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            docs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn insert(&self, id: Uuid, doc: T) -> Result<(), AppError> {
        let mut docs = self.docs.write().map_err(|_| lock_poisoned(self.name))?;
        docs.insert(id, doc);
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Result<Option<T>, AppError> {
        let docs = self.docs.read().map_err(|_| lock_poisoned(self.name))?;
        Ok(docs.get(&id).cloned())
    }

    pub fn find<F>(&self, pred: F) -> Result<Vec<T>, AppError>
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.docs.read().map_err(|_| lock_poisoned(self.name))?;
        Ok(docs.values().filter(|d| pred(d)).cloned().collect())
    }

    pub fn find_one<F>(&self, pred: F) -> Result<Option<T>, AppError>
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.docs.read().map_err(|_| lock_poisoned(self.name))?;
        Ok(docs.values().find(|d| pred(d)).cloned())
    }

    /// Atomic read-modify-write on a single document. Returns the updated
    /// document, or `None` if the id is absent.
    pub fn update<F>(&self, id: Uuid, f: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut T),
    {
        let mut docs = self.docs.write().map_err(|_| lock_poisoned(self.name))?;
        match docs.get_mut(&id) {
            Some(doc) => {
                f(doc);
                Ok(Some(doc.clone()))
            }
            None => Ok(None),
        }
    }

    /// Atomic read-modify-write over every document. The closure returns
    /// whether it changed the document; the count of changed documents is
    /// returned.
    pub fn update_all<F>(&self, mut f: F) -> Result<usize, AppError>
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut docs = self.docs.write().map_err(|_| lock_poisoned(self.name))?;
        let mut changed = 0;
        for doc in docs.values_mut() {
            if f(doc) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    pub fn remove(&self, id: Uuid) -> Result<bool, AppError> {
        let mut docs = self.docs.write().map_err(|_| lock_poisoned(self.name))?;
        Ok(docs.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, AppError> {
        let docs = self.docs.read().map_err(|_| lock_poisoned(self.name))?;
        Ok(docs.len())
    }
}

/// The fixed set of logical collections owned by one tenant.
pub(crate) struct TenantDatabase {
    pub(crate) employees: Collection<Employee>,
    pub(crate) attendance: Collection<AttendanceRecord>,
    pub(crate) promotions: Collection<Promotion>,
    pub(crate) resignations: Collection<Resignation>,
    pub(crate) terminations: Collection<Termination>,
    pub(crate) policies: Collection<LeavePolicy>,
}

impl TenantDatabase {
    fn new() -> Self {
        Self {
            employees: Collection::new("employees"),
            attendance: Collection::new("attendance"),
            promotions: Collection::new("promotions"),
            resignations: Collection::new("resignations"),
            terminations: Collection::new("terminations"),
            policies: Collection::new("policies"),
        }
    }
}

/// Collections of the shared administrative database.
pub(crate) struct GlobalDatabase {
    pub(crate) companies: Collection<Company>,
}

impl GlobalDatabase {
    fn new() -> Self {
        Self {
            companies: Collection::new("companies"),
        }
    }
}

struct StoreInner {
    tenants: HashMap<String, Arc<TenantDatabase>>,
    global: Arc<GlobalDatabase>,
}

/// Long-lived handle to the storage engine with an explicit
/// `connect()`/`close()` lifecycle. Resolution fails with a typed
/// `NotConnected` error before `connect()` has completed.
pub struct StoreClient {
    inner: RwLock<Option<StoreInner>>,
}

impl StoreClient {
    /// A client in the not-connected state.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Establish the store. Idempotent; reconnecting an already connected
    /// client keeps existing data.
    pub fn connect(&self) -> Result<(), AppError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| AppError::Internal("store client lock poisoned".into()))?;
        if inner.is_none() {
            *inner = Some(StoreInner {
                tenants: HashMap::new(),
                global: Arc::new(GlobalDatabase::new()),
            });
            tracing::info!("store client connected");
        }
        Ok(())
    }

    /// Drop the connection; subsequent resolutions fail with `NotConnected`.
    pub fn close(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = None;
            tracing::info!("store client closed");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.read().map(|i| i.is_some()).unwrap_or(false)
    }

    /// Get or lazily create the database for a tenant.
    pub(crate) fn tenant_database(&self, tenant: &str) -> Result<Arc<TenantDatabase>, AppError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| AppError::Internal("store client lock poisoned".into()))?;
        let inner = inner.as_mut().ok_or(AppError::NotConnected)?;
        let db = inner
            .tenants
            .entry(tenant.to_string())
            .or_insert_with(|| Arc::new(TenantDatabase::new()));
        Ok(Arc::clone(db))
    }

    pub(crate) fn global_database(&self) -> Result<Arc<GlobalDatabase>, AppError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| AppError::Internal("store client lock poisoned".into()))?;
        let inner = inner.as_ref().ok_or(AppError::NotConnected)?;
        Ok(Arc::clone(&inner.global))
    }
}

impl Default for StoreClient {
    fn default() -> Self {
        Self::new()
    }
}
