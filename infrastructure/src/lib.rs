//! Infrastructure layer for shortlist
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.

pub mod config;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAuditConfig, FileConfig, FileOutputConfig, FileStoreConfig,
};
pub use logging::JsonlAuditLogger;
pub use storage::{InMemorySessionStore, JsonFileSessionStore};
