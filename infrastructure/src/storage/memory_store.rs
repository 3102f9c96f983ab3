//! In-process session store.
//!
//! Same contract as the file store without durability: an `RwLock` lets
//! any number of readers take snapshots while a single writer holds the
//! write half for the duration of one mutation.

use async_trait::async_trait;
use shortlist_application::{MutateError, Mutation, SessionStore, StoreError};
use shortlist_domain::Session;
use std::time::Duration;
use tokio::sync::{RwLock, RwLockWriteGuard};

pub struct InMemorySessionStore {
    session: RwLock<Session>,
    lock_timeout: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_session(Session::default())
    }

    /// Start from an existing session instead of the default one
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
            lock_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    async fn write(&self) -> Result<RwLockWriteGuard<'_, Session>, StoreError> {
        tokio::time::timeout(self.lock_timeout, self.session.write())
            .await
            .map_err(|_| StoreError::LockTimeout(self.lock_timeout))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load_snapshot(&self) -> Result<Session, StoreError> {
        Ok(self.session.read().await.clone())
    }

    async fn mutate(&self, mutation: Mutation<'_>) -> Result<Session, MutateError> {
        let mut guard = self.write().await?;
        let next = mutation(&*guard)?;
        *guard = next.clone();
        Ok(next)
    }

    async fn reset(&self) -> Result<(), StoreError> {
        *self.write().await? = Session::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shortlist_domain::{Command, Phase, Rejection, SessionEngine};
    use std::sync::Arc;

    fn apply(command: Command) -> Mutation<'static> {
        Box::new(move |session: &Session| {
            SessionEngine::apply(session, &command, &mut StdRng::seed_from_u64(11))
        })
    }

    #[tokio::test]
    async fn test_mutate_and_snapshot() {
        let store = InMemorySessionStore::new();
        store.mutate(apply(Command::open(None::<String>))).await.unwrap();
        store.mutate(apply(Command::submit("a", "x"))).await.unwrap();

        let snapshot = store.load_snapshot().await.unwrap();
        assert_eq!(snapshot.phase, Phase::Collecting);
        assert_eq!(snapshot.submissions.len(), 1);
    }

    #[tokio::test]
    async fn test_rejection_keeps_state() {
        let store = InMemorySessionStore::with_session(Session::opened(None));
        let result = store.mutate(apply(Command::vote("a", "x"))).await;
        assert!(matches!(
            result,
            Err(MutateError::Rejected(Rejection::InvalidPhase { .. }))
        ));
        assert_eq!(store.load_snapshot().await.unwrap(), Session::opened(None));
    }

    #[tokio::test]
    async fn test_reset() {
        let store = InMemorySessionStore::with_session(Session::opened(Some("today".into())));
        store.reset().await.unwrap();
        assert_eq!(store.load_snapshot().await.unwrap(), Session::default());
    }

    #[tokio::test]
    async fn test_concurrent_submissions_merge() {
        let store = Arc::new(InMemorySessionStore::with_session(Session::opened(None)));
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .mutate(apply(Command::submit(format!("p{i}"), "same place")))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let session = store.load_snapshot().await.unwrap();
        assert_eq!(session.submissions.len(), 32);
        assert_eq!(session.candidate_pool().len(), 1);
    }

    #[tokio::test]
    async fn test_write_timeout_while_reader_holds_lock() {
        let store = InMemorySessionStore::new().with_lock_timeout(Duration::from_millis(20));
        let _reader = store.session.read().await;

        let result = store.mutate(apply(Command::open(None::<String>))).await;
        assert!(matches!(
            result,
            Err(MutateError::Store(StoreError::LockTimeout(_)))
        ));
    }
}
