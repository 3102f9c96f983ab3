//! Application layer for shortlist
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    session_store::{MutateError, Mutation, SessionStore, StoreError},
};
pub use use_cases::run_command::{RunCommandError, RunCommandUseCase};
pub use use_cases::view_session::{SessionView, ViewSessionUseCase};
