//! Shared session domain.
//!
//! - [`entities::Session`]: the single shared record of the current round
//! - [`command::Command`]: operations that move the session forward
//! - [`engine::SessionEngine`]: the phase state machine
//! - [`tally::VoteTally`]: live distribution of final votes

pub mod command;
pub mod engine;
pub mod entities;
pub mod tally;
