//! Error types.
//!
//! Configuration errors are raised before any board or simulation is
//! built and are never retried internally.

use thiserror::Error;

use super::player::PlayerId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board size must be odd, got {0}")]
    EvenBoardSize(usize),

    #[error("board size must be at least 5, got {0}")]
    BoardTooSmall(usize),

    #[error("at least one reserve piece is required")]
    NoReserves,

    #[error("piece counts add up to {actual}, the board needs exactly {expected}")]
    PieceCountMismatch { expected: usize, actual: usize },

    #[error("player count must be between 1 and 4, got {0}")]
    PlayerCount(usize),

    #[error("{player} has an answer chance of {chance}%, expected 0-100")]
    AnswerChance { player: PlayerId, chance: u8 },

    #[error("{player} has a name of {len} characters, expected 1-12")]
    PlayerName { player: PlayerId, len: usize },

    #[error("at least one simulation run is required")]
    NoRuns,

    #[error("cannot visualize {visualize} games out of {runs} runs")]
    TooManyVisualized { visualize: usize, runs: usize },

    #[error("every answer chance is 0 and there is no turn limit, so no game can end")]
    Unwinnable,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}
