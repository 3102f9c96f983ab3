//! Session state machine
//!
//! [`SessionEngine::apply`] is a pure function from the current session and
//! a command to either the next session or a [`Rejection`]. It never
//! touches storage; the caller runs it inside the store's exclusive
//! section so the decision is always made against the latest state.
//!
//! ```text
//!            OpenSession                DrawFinalists
//!  Closed ───────────────▶ Collecting ────────────────▶ Voting ─┐
//!    ▲                        ▲   ▲    ReturnToCollecting   │    │ RerollFinalists
//!    │                        │   └─────────────────────────┘    │ CastVote
//!    │ ResetAll (any)         └── OpenSession (any, resets) ◀────┘
//! ```

use crate::core::error::{InputField, Rejection};
use crate::core::string::non_blank;
use crate::session::command::{Command, CommandKind};
use crate::session::entities::{FINALIST_COUNT, Phase, Session};
use rand::RngCore;
use rand::seq::index;

/// Validates and applies [`Command`]s to a [`Session`]
pub struct SessionEngine;

impl SessionEngine {
    /// Apply `command` to `session`
    ///
    /// `rng` is only consulted by the finalist draws; pass a seeded
    /// generator to get reproducible finalists.
    pub fn apply(
        session: &Session,
        command: &Command,
        rng: &mut dyn RngCore,
    ) -> Result<Session, Rejection> {
        match command {
            Command::OpenSession { target_date } => Ok(Session::opened(
                target_date.as_deref().and_then(non_blank).map(str::to_string),
            )),
            Command::SubmitCandidate { participant, text } => {
                Self::submit_candidate(session, participant, text)
            }
            Command::DrawFinalists => {
                Self::require_phase(session, CommandKind::DrawFinalists, Phase::Collecting)?;
                let finalists = Self::draw(session, rng)?;
                Ok(Session {
                    phase: Phase::Voting,
                    finalists,
                    final_votes: Default::default(),
                    ..session.clone()
                })
            }
            Command::RerollFinalists => {
                Self::require_phase(session, CommandKind::RerollFinalists, Phase::Voting)?;
                let finalists = Self::draw(session, rng)?;
                Ok(Session {
                    finalists,
                    final_votes: Default::default(),
                    ..session.clone()
                })
            }
            Command::CastVote {
                participant,
                choice,
            } => Self::cast_vote(session, participant, choice),
            Command::ReturnToCollecting => {
                Self::require_phase(session, CommandKind::ReturnToCollecting, Phase::Voting)?;
                Ok(Session {
                    phase: Phase::Collecting,
                    finalists: Vec::new(),
                    final_votes: Default::default(),
                    ..session.clone()
                })
            }
            Command::ResetAll => Ok(Session::default()),
        }
    }

    fn submit_candidate(
        session: &Session,
        participant: &str,
        text: &str,
    ) -> Result<Session, Rejection> {
        Self::require_phase(session, CommandKind::SubmitCandidate, Phase::Collecting)?;
        let participant =
            non_blank(participant).ok_or(Rejection::EmptyInput(InputField::Participant))?;
        let text = non_blank(text).ok_or(Rejection::EmptyInput(InputField::Candidate))?;

        let mut next = session.clone();
        next.submissions
            .insert(participant.to_string(), text.to_string());
        Ok(next)
    }

    fn cast_vote(session: &Session, participant: &str, choice: &str) -> Result<Session, Rejection> {
        Self::require_phase(session, CommandKind::CastVote, Phase::Voting)?;
        let participant =
            non_blank(participant).ok_or(Rejection::EmptyInput(InputField::Participant))?;
        // A blank choice is simply not a finalist.
        let choice = choice.trim();
        if !session.is_finalist(choice) {
            return Err(Rejection::InvalidChoice(choice.to_string()));
        }

        let mut next = session.clone();
        next.final_votes
            .insert(participant.to_string(), choice.to_string());
        Ok(next)
    }

    fn require_phase(
        session: &Session,
        command: CommandKind,
        expected: Phase,
    ) -> Result<(), Rejection> {
        if session.phase == expected {
            Ok(())
        } else {
            Err(Rejection::InvalidPhase {
                command,
                phase: session.phase,
            })
        }
    }

    /// Sample finalists uniformly without replacement from the distinct pool
    ///
    /// The pool is ordered, so the result depends only on the set of
    /// candidates and the generator, never on who submitted first.
    fn draw(session: &Session, rng: &mut dyn RngCore) -> Result<Vec<String>, Rejection> {
        let pool: Vec<&str> = session.candidate_pool().into_iter().collect();
        if pool.len() < FINALIST_COUNT {
            return Err(Rejection::InsufficientCandidates(pool.len()));
        }

        Ok(index::sample(rng, pool.len(), FINALIST_COUNT)
            .into_iter()
            .map(|i| pool[i].to_string())
            .collect())
    }
}
