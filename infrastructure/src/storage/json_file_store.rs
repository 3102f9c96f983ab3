//! JSON file session store with crash-safe replacement.
//!
//! The record is a single pretty-printed JSON document. Writes go to a
//! temporary sibling file which is fsynced and then renamed over the
//! record, so readers see either the old or the new document and a crash
//! never leaves a torn record behind.
//!
//! Writers are serialized twice: a tokio mutex inside the process and an
//! advisory [`FileLock`] across processes. Both are bounded by the same
//! deadline.

use super::file_lock::FileLock;
use async_trait::async_trait;
use shortlist_application::{MutateError, Mutation, SessionStore, StoreError};
use shortlist_domain::Session;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// What was found at the record path
enum RecordState {
    Present(Session),
    Missing,
    Corrupt(String),
}

/// Held for the whole load → apply → persist sequence
struct WriterGuard<'a> {
    _file: FileLock,
    _local: MutexGuard<'a, ()>,
}

/// Session store backed by one JSON file
pub struct JsonFileSessionStore {
    path: PathBuf,
    lock_timeout: Duration,
    writer: Mutex<()>,
}

impl JsonFileSessionStore {
    pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: Self::DEFAULT_LOCK_TIMEOUT,
            writer: Mutex::new(()),
        }
    }

    /// Bound how long a writer waits for exclusive access
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.file_name();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.file_name());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn file_name(&self) -> OsString {
        self.path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("session.json"))
    }

    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }

    async fn lock(&self) -> Result<WriterGuard<'_>, StoreError> {
        let deadline = Instant::now() + self.lock_timeout;
        let local = tokio::time::timeout_at(
            tokio::time::Instant::from_std(deadline),
            self.writer.lock(),
        )
        .await
        .map_err(|_| StoreError::LockTimeout(self.lock_timeout))?;
        let file = FileLock::acquire(&self.lock_path(), deadline, self.lock_timeout).await?;
        Ok(WriterGuard {
            _file: file,
            _local: local,
        })
    }

    fn read_record(&self) -> Result<RecordState, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RecordState::Missing),
            Err(e) => return Err(unavailable("reading", &self.path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RecordState::Corrupt("record is empty".to_string()));
        }

        Ok(match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => match session.check_invariants() {
                Ok(()) => RecordState::Present(session),
                Err(violation) => RecordState::Corrupt(violation.to_string()),
            },
            Err(e) => RecordState::Corrupt(e.to_string()),
        })
    }

    /// Load the record, replacing a missing or corrupt one with the default.
    ///
    /// Caller must hold the writer lock.
    fn load_healing(&self) -> Result<Session, StoreError> {
        match self.read_record()? {
            RecordState::Present(session) => Ok(session),
            RecordState::Missing => {
                debug!("No session record at {}, creating one", self.path.display());
                let session = Session::default();
                self.write_record(&session)?;
                Ok(session)
            }
            RecordState::Corrupt(reason) => {
                warn!(
                    "Session record {} is corrupt ({}); replacing it with a fresh session",
                    self.path.display(),
                    reason
                );
                let session = Session::default();
                self.write_record(&session)?;
                Ok(session)
            }
        }
    }

    /// Atomically replace the record. Caller must hold the writer lock.
    fn write_record(&self, session: &Session) -> Result<(), StoreError> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent).map_err(|e| unavailable("creating", parent, e))?;

        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|e| StoreError::Unavailable(format!("serializing session: {}", e)))?;

        let tmp_path = self.temp_path();
        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(unavailable("writing", &tmp_path, e));
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(unavailable("replacing", &self.path, e));
        }

        sync_dir(parent).map_err(|e| unavailable("syncing", parent, e))
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load_snapshot(&self) -> Result<Session, StoreError> {
        // The record is only ever replaced by rename, so an unlocked read
        // always sees a whole document.
        match self.read_record()? {
            RecordState::Present(session) => Ok(session),
            RecordState::Missing | RecordState::Corrupt(_) => {
                let _guard = self.lock().await?;
                self.load_healing()
            }
        }
    }

    async fn mutate(&self, mutation: Mutation<'_>) -> Result<Session, MutateError> {
        let _guard = self.lock().await?;
        let current = self.load_healing()?;
        let next = mutation(&current)?;
        if next != current {
            self.write_record(&next)?;
        }
        Ok(next)
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let _guard = self.lock().await?;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(unavailable("removing", &self.path, e)),
        }
        let parent = self.parent_dir();
        if parent.exists() {
            sync_dir(parent).map_err(|e| unavailable("syncing", parent, e))?;
        }
        info!("Session record {} destroyed", self.path.display());
        Ok(())
    }
}

fn unavailable(operation: &str, path: &Path, error: io::Error) -> StoreError {
    StoreError::Unavailable(format!("{} {}: {}", operation, path.display(), error))
}

/// Make a rename durable by syncing the containing directory
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
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
            SessionEngine::apply(session, &command, &mut StdRng::seed_from_u64(3))
        })
    }

    fn store_in(dir: &tempfile::TempDir) -> JsonFileSessionStore {
        JsonFileSessionStore::new(dir.path().join("session.json"))
    }

    #[tokio::test]
    async fn test_missing_record_yields_and_persists_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.load_snapshot().await.unwrap(), Session::default());
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_mutation_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.mutate(apply(Command::open(Some("monday")))).await.unwrap();
        let after = store.mutate(apply(Command::submit("alice", "pizza"))).await.unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.load_snapshot().await.unwrap(), after);
        assert_eq!(after.submissions["alice"], "pizza");
        assert_eq!(after.target_date.as_deref(), Some("monday"));
    }

    #[tokio::test]
    async fn test_rejection_leaves_record_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.mutate(apply(Command::open(None::<String>))).await.unwrap();
        store.mutate(apply(Command::submit("a", "x"))).await.unwrap();
        let before = fs::read(store.path()).unwrap();

        let result = store.mutate(apply(Command::DrawFinalists)).await;
        assert!(matches!(
            result,
            Err(MutateError::Rejected(Rejection::InsufficientCandidates(1)))
        ));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_corrupt_record_self_heals() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), b"{\"phase\": \"voting\", \"finalists\": [").unwrap();

        assert_eq!(store.load_snapshot().await.unwrap(), Session::default());
        let healed: Session = serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(healed, Session::default());
    }

    #[tokio::test]
    async fn test_invariant_violation_treated_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"phase":"voting","submissions":{},"finalists":["x"],"finalVotes":{}}"#,
        )
        .unwrap();

        let session = store.mutate(apply(Command::open(None::<String>))).await.unwrap();
        assert_eq!(session.phase, Phase::Collecting);
    }

    #[tokio::test]
    async fn test_empty_record_self_heals() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), b"   \n").unwrap();

        assert_eq!(store.load_snapshot().await.unwrap(), Session::default());
    }

    #[tokio::test]
    async fn test_atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.mutate(apply(Command::open(None::<String>))).await.unwrap();

        assert!(!store.temp_path().exists());
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_reset_destroys_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.mutate(apply(Command::open(None::<String>))).await.unwrap();
        store.mutate(apply(Command::submit("a", "x"))).await.unwrap();

        store.reset().await.unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load_snapshot().await.unwrap(), Session::default());

        // Resetting an absent record is fine too.
        store.reset().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_submissions_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let first = Arc::new(store_in(&dir));
        let second = Arc::new(store_in(&dir));
        first.mutate(apply(Command::open(None::<String>))).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = if i % 2 == 0 {
                Arc::clone(&first)
            } else {
                Arc::clone(&second)
            };
            handles.push(tokio::spawn(async move {
                store
                    .mutate(apply(Command::submit(format!("user-{i}"), format!("spot-{i}"))))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let session = second.load_snapshot().await.unwrap();
        assert_eq!(session.submissions.len(), 20);
    }

    #[tokio::test]
    async fn test_concurrent_draws_serialize() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));
        store.mutate(apply(Command::open(None::<String>))).await.unwrap();
        for (participant, text) in [("a", "x"), ("b", "y"), ("c", "z"), ("d", "w")] {
            store.mutate(apply(Command::submit(participant, text))).await.unwrap();
        }

        let a = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.mutate(apply(Command::DrawFinalists)).await }
        });
        let b = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.mutate(apply(Command::DrawFinalists)).await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(MutateError::Rejected(Rejection::InvalidPhase { .. }))
        )));
        assert_eq!(&store.load_snapshot().await.unwrap(), winners[0]);
    }

    #[tokio::test]
    async fn test_lock_timeout_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).with_lock_timeout(Duration::from_millis(40));

        let _held = FileLock::acquire(
            &store.lock_path(),
            Instant::now() + Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        let result = store.mutate(apply(Command::open(None::<String>))).await;
        assert!(matches!(
            result,
            Err(MutateError::Store(StoreError::LockTimeout(_)))
        ));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_unreadable_record_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir(store.path()).unwrap();

        assert!(matches!(
            store.load_snapshot().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.mutate(apply(Command::open(None::<String>))).await,
            Err(MutateError::Store(StoreError::Unavailable(_)))
        ));
        assert!(store.path().is_dir());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.mutate(apply(Command::open(None::<String>))).await.unwrap();
        store.mutate(apply(Command::submit("a", "x"))).await.unwrap();
        let before = fs::read(store.path()).unwrap();

        // A directory in the way of the temp file makes every write fail.
        fs::create_dir(store.temp_path()).unwrap();

        let result = store.mutate(apply(Command::submit("b", "y"))).await;
        assert!(matches!(
            result,
            Err(MutateError::Store(StoreError::Unavailable(_)))
        ));
        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(
            store.load_snapshot().await.unwrap().submissions.len(),
            1
        );
    }

    #[test]
    fn test_sibling_paths() {
        let store = JsonFileSessionStore::new("/tmp/lunch/session.json");
        assert_eq!(store.lock_path(), PathBuf::from("/tmp/lunch/session.json.lock"));
        assert_eq!(store.temp_path(), PathBuf::from("/tmp/lunch/.session.json.tmp"));
    }
}
