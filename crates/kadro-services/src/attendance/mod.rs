//! Attendance state machine and regularization workflow.

pub mod service;
pub mod types;

pub use service::AttendanceService;
pub use types::{
    BulkAction, BulkActionResult, BulkOutcome, ClockInInput, ClockOutInput, RegularizationInput,
};
