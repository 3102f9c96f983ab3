//! Configuration file loading for shortlist
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SHORTLIST_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./shortlist.toml` or `./.shortlist.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/shortlist/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileAuditConfig, FileConfig, FileOutputConfig, FileStoreConfig};
pub use loader::ConfigLoader;
