//! Repositories for the tenant store.
//!
//! Each repository owns no state beyond the resolver; every call re-derives
//! the tenant handle, so a repository can never be pinned to the wrong
//! tenant.

pub mod attendance;
pub mod company;
pub mod employee;
pub mod lifecycle;
pub mod policy;

pub use attendance::AttendanceRepository;
pub use company::CompanyRepository;
pub use employee::EmployeeRepository;
pub use lifecycle::{PromotionRepository, ResignationRepository, TerminationRepository};
pub use policy::PolicyRepository;
