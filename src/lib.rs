//! # amaze-sim
//!
//! A Monte-Carlo simulator for a tile-shifting maze race board game.
//!
//! One to four pawns start on the corners of an odd-sized grid of maze
//! pieces and race to the treasure chest in the center. Each turn the
//! active player answers a trivia question. A correct answer lets the
//! scripted AI step, shift a row or column, or rotate a piece; a wrong
//! answer only allows a rotation next to the pawn.
//!
//! ## Design
//!
//! 1. **Instance isolation**: every game owns its board, pawns, move log
//!    and RNG. A batch shares nothing but the read-only configuration.
//!
//! 2. **Deterministic seeding**: instance `i` of a batch draws from its own
//!    ChaCha stream derived from the base seed, so results do not depend
//!    on thread count.
//!
//! 3. **Injected collectors**: mutating operations record into a
//!    `DataCollector` passed by the caller instead of a global logger.
//!
//! ## Modules
//!
//! - `core`: geometry, players, RNG, configuration, errors, game state
//! - `maze`: pieces and the board
//! - `record`: move records and collectors
//! - `ai`: the decision engine
//! - `sim`: simulation instances, the parallel runner and reports

pub mod ai;
pub mod core;
pub mod maze;
pub mod record;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    BoardConfig, ConfigError, Direction, GameState, PawnColor, PieceCounts, Player, PlayerConfig, PlayerId,
    PlayerMap, Position, SimRng, SimulationConfig, Turn,
};

pub use crate::maze::{Board, Piece, Shape};

pub use crate::record::{DataCollector, GameLog, LogEntry, MoveRecord, NullCollector};

pub use crate::ai::{DecisionEngine, Stage, Tier};

pub use crate::sim::{
    GameHistory, GameStats, HistoryError, Outcome, PlayerStats, Simulation, SimulationReport, SimulationRunner,
};
