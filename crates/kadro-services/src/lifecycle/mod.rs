//! Lifecycle conflict validator and process service.

pub mod service;

pub use service::{
    ConflictCheck, LifecycleService, PromotionInput, ResignationInput, TerminationInput,
};
