//! Kadro workflow services
//!
//! The three core components sit here: the lifecycle conflict validator and
//! process service, the attendance state machine, and the carry-forward
//! calculator. All of them reach storage exclusively through the resolver
//! and repositories in `kadro-db`.

pub mod attendance;
pub mod carryforward;
pub mod lifecycle;

pub use attendance::{
    AttendanceService, BulkAction, BulkActionResult, BulkOutcome, ClockInInput, ClockOutInput,
    RegularizationInput,
};
pub use carryforward::{
    CarryForwardEntry, CarryForwardPlan, CarryForwardService, CompanyRunSummary, ExpiryReport,
};
pub use lifecycle::{
    ConflictCheck, LifecycleService, PromotionInput, ResignationInput, TerminationInput,
};
