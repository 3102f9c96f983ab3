//! Domain layer for shortlist
//!
//! This crate contains the session aggregate, the commands that change it
//! and the pure state machine that applies them. It has no dependencies on
//! storage or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! One shared record per group: participants first suggest candidates
//! (`Collecting`), then three finalists are drawn at random from the
//! distinct suggestions and everyone votes among them (`Voting`).
//!
//! ## Engine
//!
//! [`SessionEngine::apply`] turns `(Session, Command)` into a new session
//! or a typed [`Rejection`]. Randomness is injected so draws can be
//! reproduced under test.

pub mod config;
pub mod core;
pub mod session;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::{InputField, Rejection};
pub use session::{
    command::{Command, CommandKind},
    engine::SessionEngine,
    entities::{FINALIST_COUNT, InvariantViolation, Phase, Session},
    tally::{FinalistTally, VoteTally},
};
