//! Session commands
//!
//! A [`Command`] is the only way to change the shared session. The
//! presentation layer builds one per user action and hands it to the
//! application layer.

use serde::{Deserialize, Serialize};

/// A named operation on the shared session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Start a fresh round, discarding everything from the previous one
    OpenSession { target_date: Option<String> },
    /// Record (or replace) a participant's suggestion
    SubmitCandidate { participant: String, text: String },
    /// Sample three finalists and move to the final vote
    DrawFinalists,
    /// Sample a new set of finalists during the final vote
    RerollFinalists,
    /// Record (or replace) a participant's final vote
    CastVote { participant: String, choice: String },
    /// Abandon the final vote and go back to collecting suggestions
    ReturnToCollecting,
    /// Destroy the session entirely
    ResetAll,
}

impl Command {
    pub fn open(target_date: Option<impl Into<String>>) -> Self {
        Command::OpenSession {
            target_date: target_date.map(Into::into),
        }
    }

    pub fn submit(participant: impl Into<String>, text: impl Into<String>) -> Self {
        Command::SubmitCandidate {
            participant: participant.into(),
            text: text.into(),
        }
    }

    pub fn vote(participant: impl Into<String>, choice: impl Into<String>) -> Self {
        Command::CastVote {
            participant: participant.into(),
            choice: choice.into(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::OpenSession { .. } => CommandKind::OpenSession,
            Command::SubmitCandidate { .. } => CommandKind::SubmitCandidate,
            Command::DrawFinalists => CommandKind::DrawFinalists,
            Command::RerollFinalists => CommandKind::RerollFinalists,
            Command::CastVote { .. } => CommandKind::CastVote,
            Command::ReturnToCollecting => CommandKind::ReturnToCollecting,
            Command::ResetAll => CommandKind::ResetAll,
        }
    }
}

/// Payload-free discriminant of [`Command`], used in rejections and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    OpenSession,
    SubmitCandidate,
    DrawFinalists,
    RerollFinalists,
    CastVote,
    ReturnToCollecting,
    ResetAll,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::OpenSession => "open-session",
            CommandKind::SubmitCandidate => "submit-candidate",
            CommandKind::DrawFinalists => "draw-finalists",
            CommandKind::RerollFinalists => "reroll-finalists",
            CommandKind::CastVote => "cast-vote",
            CommandKind::ReturnToCollecting => "return-to-collecting",
            CommandKind::ResetAll => "reset-all",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
