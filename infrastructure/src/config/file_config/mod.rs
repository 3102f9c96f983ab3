//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod audit;
mod output;
mod store;

pub use audit::FileAuditConfig;
pub use output::FileOutputConfig;
pub use store::FileStoreConfig;

use serde::{Deserialize, Serialize};
use shortlist_domain::{ConfigIssue, ConfigIssueCode, Severity};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Session record location and locking
    pub store: FileStoreConfig,
    /// Audit trail settings
    pub audit: FileAuditConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.store.path.trim().is_empty() {
            issues.push(empty_path("store.path"));
        }

        if self.audit.enabled && self.audit.path.trim().is_empty() {
            issues.push(empty_path("audit.path"));
        }

        if self.store.lock_timeout_ms == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::ZeroLockTimeout,
                message: "store.lock_timeout_ms is 0; any contended command will time out"
                    .to_string(),
            });
        }

        issues
    }
}

fn empty_path(field: &str) -> ConfigIssue {
    ConfigIssue {
        severity: Severity::Error,
        code: ConfigIssueCode::EmptyPath {
            field: field.to_string(),
        },
        message: format!("{} must not be empty", field),
    }
}
