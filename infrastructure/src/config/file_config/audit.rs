//! Audit log configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};

/// JSONL audit trail of every command outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "shortlist_audit.jsonl".to_string(),
        }
    }
}
