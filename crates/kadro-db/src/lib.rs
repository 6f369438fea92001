//! Kadro tenant store
//!
//! The store client owns one logical database per tenant plus a single
//! shared administrative database. Tenant-scoped handles are produced only
//! by the [`StoreResolver`]; repositories go through the resolver on every
//! call and never hold raw collection access across tenants.

pub mod locks;
pub mod repository;
pub mod resolver;
pub mod store;

pub use locks::LockRegistry;
pub use repository::{
    AttendanceRepository, CompanyRepository, EmployeeRepository, PolicyRepository,
    PromotionRepository, ResignationRepository, TerminationRepository,
};
pub use resolver::{GlobalStore, StoreResolver, TenantStores};
pub use store::{Collection, StoreClient};
