//! Running games: single instances, batches, statistics and recorded
//! histories.
//!
//! - `instance`: `Simulation`, one game from setup to win or timeout
//! - `runner`: `SimulationRunner`, a parallel batch of instances
//! - `stats`: per-game statistics and the aggregate report
//! - `history`: recorded games for the visualizer

mod history;
mod instance;
mod runner;
mod stats;

pub use history::{GameHistory, HistoryError};
pub use instance::Simulation;
pub use runner::SimulationRunner;
pub use stats::{GameStats, Outcome, PlayerStats, SimulationReport};
