//! Run Command use case
//!
//! Applies one [`Command`] to the shared session through the
//! [`SessionStore`], so the engine always decides against the latest
//! persisted state.

use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::session_store::{MutateError, SessionStore, StoreError};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde_json::{Value, json};
use shortlist_domain::{Command, CommandKind, Rejection, Session, SessionEngine};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while running a command
#[derive(Error, Debug)]
pub enum RunCommandError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Session storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Timed out after {}ms waiting for the session", .0.as_millis())]
    Timeout(Duration),
}

impl RunCommandError {
    /// Stable machine-readable code, distinct for every failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            RunCommandError::Rejected(rejection) => rejection.kind(),
            RunCommandError::StorageUnavailable(_) => "storage_unavailable",
            RunCommandError::Timeout(_) => "timeout",
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            RunCommandError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl From<StoreError> for RunCommandError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable(message) => RunCommandError::StorageUnavailable(message),
            StoreError::LockTimeout(waited) => RunCommandError::Timeout(waited),
        }
    }
}

impl From<MutateError> for RunCommandError {
    fn from(error: MutateError) -> Self {
        match error {
            MutateError::Rejected(rejection) => RunCommandError::Rejected(rejection),
            MutateError::Store(store) => store.into(),
        }
    }
}

/// Use case for applying session commands
pub struct RunCommandUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    audit: Arc<dyn AuditLogger>,
}

impl<S: SessionStore + 'static> RunCommandUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
            audit: Arc::new(NoAuditLogger),
        }
    }

    /// Replace the random source used for finalist draws
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Apply `command` and return the persisted session
    pub async fn execute(&self, command: Command) -> Result<Session, RunCommandError> {
        let kind = command.kind();
        let described = serde_json::to_value(&command).unwrap_or_default();

        let result = match command {
            Command::ResetAll => self
                .store
                .reset()
                .await
                .map(|()| Session::default())
                .map_err(RunCommandError::from),
            command => {
                let rng = &self.rng;
                self.store
                    .mutate(Box::new(move |session: &Session| {
                        let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                        SessionEngine::apply(session, &command, &mut **rng)
                    }))
                    .await
                    .map_err(RunCommandError::from)
            }
        };

        self.record(kind, described, &result);
        result
    }

    fn record(&self, kind: CommandKind, described: Value, result: &Result<Session, RunCommandError>) {
        match result {
            Ok(session) => {
                info!("Applied {} (session is now {})", kind, session.phase);
                let event_type = if kind == CommandKind::ResetAll {
                    "session_reset"
                } else {
                    "command_applied"
                };
                self.audit.log(AuditEvent::new(
                    event_type,
                    json!({
                        "command": described,
                        "phase": session.phase,
                        "submissions": session.submissions.len(),
                        "finalists": session.finalists,
                        "votes": session.final_votes.len(),
                    }),
                ));
            }
            Err(RunCommandError::Rejected(rejection)) => {
                debug!("Rejected {}: {}", kind, rejection);
                self.audit.log(AuditEvent::new(
                    "command_rejected",
                    json!({
                        "command": described,
                        "kind": rejection.kind(),
                        "message": rejection.to_string(),
                    }),
                ));
            }
            Err(error) => {
                warn!("{} failed: {}", kind, error);
                self.audit.log(AuditEvent::new(
                    "command_failed",
                    json!({
                        "command": described,
                        "kind": error.kind(),
                        "message": error.to_string(),
                    }),
                ));
            }
        }
    }
}
