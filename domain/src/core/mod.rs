//! Core domain concepts shared across all subdomains.
//!
//! - [`error::Rejection`]: typed refusal returned by the session engine
//! - [`string::non_blank`]: input normalisation for names and candidates

pub mod error;
pub mod string;
