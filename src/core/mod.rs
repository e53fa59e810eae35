//! Core types: geometry, players, RNG, configuration, errors and the
//! per-instance game state.
//!
//! Everything here is independent of how moves are chosen. The decision
//! engine and the simulation runner build on these types.

pub mod geometry;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use geometry::{Direction, Position, Turn};
pub use player::{PawnColor, Player, PlayerId, PlayerMap};
pub use rng::SimRng;
pub use config::{
    validate_players, BoardConfig, PieceCounts, PlayerConfig, SimulationConfig, MAX_NAME_LEN, MAX_PLAYERS,
    PINNED_CELLS,
};
pub use error::ConfigError;
pub use state::{AnswerTally, GameState};
