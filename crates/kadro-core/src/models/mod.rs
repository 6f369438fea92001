//! Domain models shared across Kadro components.

pub mod actor;
pub mod attendance;
pub mod employee;
pub mod lifecycle;
pub mod policy;
pub mod tenant;

pub use actor::{ActorContext, ActorRole};
pub use attendance::{
    AttendanceRecord, AttendanceStatistics, AttendanceStatus, ClockEvent, RegularizationRequest,
    RegularizationStatus,
};
pub use employee::{Employee, EmploymentStatus, LeaveBalance};
pub use lifecycle::{
    ProcessKind, Promotion, PromotionStatus, Resignation, ResignationStatus, Termination,
    TerminationStatus,
};
pub use policy::LeavePolicy;
pub use tenant::{Company, CompanyStatus, TenantId};
