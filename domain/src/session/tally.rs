//! Live vote distribution for the final vote

use crate::session::entities::Session;
use serde::{Deserialize, Serialize};

/// Votes received by one finalist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalistTally {
    pub finalist: String,
    pub votes: usize,
    /// Participants who picked this finalist, sorted
    pub voters: Vec<String>,
}

/// Aggregated view of `final_votes`, one row per finalist in draw order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub rows: Vec<FinalistTally>,
    pub total_votes: usize,
}

impl VoteTally {
    pub fn from_session(session: &Session) -> Self {
        let rows: Vec<FinalistTally> = session
            .finalists
            .iter()
            .map(|finalist| {
                // BTreeMap iteration keeps voters sorted.
                let voters: Vec<String> = session
                    .final_votes
                    .iter()
                    .filter(|(_, choice)| *choice == finalist)
                    .map(|(participant, _)| participant.clone())
                    .collect();
                FinalistTally {
                    finalist: finalist.clone(),
                    votes: voters.len(),
                    voters,
                }
            })
            .collect();

        Self {
            total_votes: rows.iter().map(|r| r.votes).sum(),
            rows,
        }
    }

    /// Finalists sharing the highest vote count (empty when nobody voted)
    pub fn leaders(&self) -> Vec<&str> {
        let Some(max) = self.rows.iter().map(|r| r.votes).max().filter(|m| *m > 0) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|r| r.votes == max)
            .map(|r| r.finalist.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total_votes == 0
    }
}
