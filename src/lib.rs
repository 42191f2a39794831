//! Individual skill tournament: per-challenge score aggregation, overall
//! ranking and team-role suggestions.

pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod scoring;
pub mod tournament;

pub use error::TournamentError;
