//! Domain error types

use crate::session::command::CommandKind;
use crate::session::entities::Phase;
use thiserror::Error;

/// Input field that was found blank after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// Participant nickname
    Participant,
    /// Suggested candidate text
    Candidate,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::Participant => "participant",
            InputField::Candidate => "candidate",
        }
    }
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command refused by the session engine.
///
/// Rejections are recoverable: the session is left exactly as it was
/// and the caller decides how to present the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("{command} is not allowed while the session is {phase}")]
    InvalidPhase { command: CommandKind, phase: Phase },

    #[error("The {0} must not be empty")]
    EmptyInput(InputField),

    #[error("At least 3 distinct candidates are required, found {0}")]
    InsufficientCandidates(usize),

    #[error("'{0}' is not one of the finalists")]
    InvalidChoice(String),
}

impl Rejection {
    /// Stable machine-readable code for this rejection kind
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::InvalidPhase { .. } => "invalid_phase",
            Rejection::EmptyInput(_) => "empty_input",
            Rejection::InsufficientCandidates(_) => "insufficient_candidates",
            Rejection::InvalidChoice(_) => "invalid_choice",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_candidates_display() {
        let error = Rejection::InsufficientCandidates(1);
        assert_eq!(
            error.to_string(),
            "At least 3 distinct candidates are required, found 1"
        );
    }

    #[test]
    fn test_invalid_phase_display() {
        let error = Rejection::InvalidPhase {
            command: CommandKind::CastVote,
            phase: Phase::Collecting,
        };
        assert_eq!(
            error.to_string(),
            "cast-vote is not allowed while the session is collecting"
        );
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [
            Rejection::InvalidPhase {
                command: CommandKind::DrawFinalists,
                phase: Phase::Closed,
            }
            .kind(),
            Rejection::EmptyInput(InputField::Candidate).kind(),
            Rejection::InsufficientCandidates(0).kind(),
            Rejection::InvalidChoice("x".to_string()).kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }
}
