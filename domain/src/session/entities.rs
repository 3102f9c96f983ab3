//! Session domain entities

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Number of finalists drawn for the final vote
pub const FINALIST_COUNT: usize = 3;

/// Stage of the shared session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No round in progress
    #[default]
    Closed,
    /// Participants suggest candidates
    Collecting,
    /// Participants vote among the finalists
    Voting,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Closed => "closed",
            Phase::Collecting => "collecting",
            Phase::Voting => "voting",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Closed => "Closed",
            Phase::Collecting => "Collecting suggestions",
            Phase::Voting => "Final vote",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural problem found in a session record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("{phase} session must have {expected} finalists, found {found}")]
    FinalistCount {
        phase: Phase,
        expected: usize,
        found: usize,
    },

    #[error("finalist '{0}' appears more than once")]
    DuplicateFinalist(String),

    #[error("vote by '{participant}' for '{choice}' does not reference a finalist")]
    StaleVote { participant: String, choice: String },
}

/// The single shared record of the current round (Aggregate)
///
/// Maps are ordered so that a given state always serializes to the same
/// bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(default)]
    pub submissions: BTreeMap<String, String>,
    #[serde(default)]
    pub finalists: Vec<String>,
    #[serde(default)]
    pub final_votes: BTreeMap<String, String>,
}

impl Session {
    /// A freshly opened session collecting suggestions
    pub fn opened(target_date: Option<String>) -> Self {
        Self {
            phase: Phase::Collecting,
            target_date,
            ..Self::default()
        }
    }

    /// Deduplicated candidate pool, in lexical order
    pub fn candidate_pool(&self) -> BTreeSet<&str> {
        self.submissions.values().map(String::as_str).collect()
    }

    /// Whether `choice` is one of the current finalists
    pub fn is_finalist(&self, choice: &str) -> bool {
        self.finalists.iter().any(|f| f == choice)
    }

    /// Verify the structural invariants of the record
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let expected = match self.phase {
            Phase::Voting => FINALIST_COUNT,
            Phase::Closed | Phase::Collecting => 0,
        };
        if self.finalists.len() != expected {
            return Err(InvariantViolation::FinalistCount {
                phase: self.phase,
                expected,
                found: self.finalists.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for finalist in &self.finalists {
            if !seen.insert(finalist.as_str()) {
                return Err(InvariantViolation::DuplicateFinalist(finalist.clone()));
            }
        }

        // Outside Voting there are no finalists, so any vote is stale.
        if let Some((participant, choice)) = self
            .final_votes
            .iter()
            .find(|(_, choice)| !self.is_finalist(choice))
        {
            return Err(InvariantViolation::StaleVote {
                participant: participant.clone(),
                choice: choice.clone(),
            });
        }

        Ok(())
    }
}
