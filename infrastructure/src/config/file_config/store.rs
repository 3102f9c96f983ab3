//! Store configuration from TOML (`[store]` section)
//!
//! ```toml
//! [store]
//! path = "~/.local/share/shortlist/session.json"
//! lock_timeout_ms = 5000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the shared session lives and how long writers wait for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// Path of the session record (JSON)
    pub path: String,
    /// Maximum wait for exclusive access, in milliseconds
    pub lock_timeout_ms: u64,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: "shortlist_session.json".to_string(),
            lock_timeout_ms: 5000,
        }
    }
}

impl FileStoreConfig {
    pub fn path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}
