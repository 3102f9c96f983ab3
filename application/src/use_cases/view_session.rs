//! View Session use case
//!
//! Read-only snapshot for the presentation layer: the session itself plus
//! the figures a renderer needs (candidate pool, vote tally).

use crate::ports::session_store::{SessionStore, StoreError};
use serde::Serialize;
use shortlist_domain::{Session, VoteTally};
use std::sync::Arc;

/// Rendering-ready view of the shared session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session: Session,
    /// Distinct candidates currently in the pool, sorted
    pub candidate_pool: Vec<String>,
    pub tally: VoteTally,
}

impl SessionView {
    pub fn from_session(session: Session) -> Self {
        let candidate_pool = session
            .candidate_pool()
            .into_iter()
            .map(str::to_string)
            .collect();
        let tally = VoteTally::from_session(&session);
        Self {
            session,
            candidate_pool,
            tally,
        }
    }
}

/// Use case for reading the shared session
pub struct ViewSessionUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
}

impl<S: SessionStore + 'static> ViewSessionUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<SessionView, StoreError> {
        let session = self.store.load_snapshot().await?;
        Ok(SessionView::from_session(session))
    }
}
