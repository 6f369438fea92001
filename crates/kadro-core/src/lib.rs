//! Kadro Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all Kadro components.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use config::{AttendanceConfig, CarryForwardConfig, StoreConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{DomainEvent, EventKind, EventSink, NoOpEventSink};
pub use models::actor::{ActorContext, ActorRole};
pub use models::tenant::TenantId;
