//! Session store port
//!
//! Defines the contract for the component holding the single durable copy
//! of the shared [`Session`].
//!
//! # Contract
//!
//! - [`SessionStore::mutate`] runs load → apply → persist as one exclusive
//!   unit. Only one mutation executes at a time, and it always sees the
//!   state left by the previous one.
//! - A mutation that returns a [`Rejection`] causes no write.
//! - [`SessionStore::load_snapshot`] returns a whole record, either the
//!   state before or after any concurrent mutation, never a mix.
//! - A missing or unreadable record is replaced by `Session::default()`
//!   inside the store; callers never see "no session yet".

use async_trait::async_trait;
use shortlist_domain::{Rejection, Session};
use std::time::Duration;
use thiserror::Error;

/// Infrastructure-level failures of a session store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out after {}ms waiting for exclusive session access", .0.as_millis())]
    LockTimeout(Duration),
}

/// Outcome of a failed [`SessionStore::mutate`]
#[derive(Error, Debug)]
pub enum MutateError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Transformation applied inside the store's exclusive section
pub type Mutation<'a> = Box<dyn FnOnce(&Session) -> Result<Session, Rejection> + Send + 'a>;

/// Durable holder of the shared session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a consistent copy of the current session
    async fn load_snapshot(&self) -> Result<Session, StoreError>;

    /// Apply `mutation` to the latest session and persist the result
    ///
    /// Returns the persisted session, or the mutation's rejection
    /// unchanged when it refuses.
    async fn mutate(&self, mutation: Mutation<'_>) -> Result<Session, MutateError>;

    /// Destroy the persisted session; later reads see the default session
    async fn reset(&self) -> Result<(), StoreError>;
}
