use thiserror::Error;

/// Conditions reported by the tournament core.
///
/// None of these leave the store in a broken state; the caller can always
/// correct its input and retry.
#[derive(Debug, Error, PartialEq)]
pub enum TournamentError {
    #[error("unexpected file format: {0}")]
    Format(String),

    #[error("could not read tournament data: {0}")]
    Read(String),

    #[error("could not save tournament data: {0}")]
    Save(String),

    #[error("player name must not be empty")]
    EmptyName,

    #[error("no players registered; add players before suggesting roles")]
    NoPlayers,

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("unknown challenge: {0}")]
    UnknownChallenge(String),

    #[error("{points} is not a valid score for {challenge} (allowed: {allowed:?})")]
    IllegalScore {
        challenge: String,
        points: i64,
        allowed: Vec<i64>,
    },

    #[error("no unused player id is left")]
    IdsExhausted,

    #[error("tournament lock was poisoned")]
    LockPoisoned,
}

impl TournamentError {
    /// Import/load problems that concern the data itself rather than the caller
    pub fn is_data_error(&self) -> bool {
        matches!(self, TournamentError::Format(_) | TournamentError::Read(_))
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;
