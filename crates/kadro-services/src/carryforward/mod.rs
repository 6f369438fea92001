//! Annual leave carry-forward calculator.

pub mod service;

pub use service::{
    CarryForwardEntry, CarryForwardPlan, CarryForwardService, CompanyRunSummary, ExpiryReport,
};
