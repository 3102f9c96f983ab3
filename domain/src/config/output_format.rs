//! Output format value object

use serde::{Deserialize, Serialize};

/// How a session snapshot is rendered
///
/// This is a domain concept shared by the configuration file and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Everything: submissions, finalists, individual votes and tally
    Full,
    /// Phase, finalists and tally only (default)
    #[default]
    Summary,
    /// JSON output
    Json,
}
