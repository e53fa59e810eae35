//! The scripted opponent AI.
//!
//! - `engine`: `DecisionEngine`, the per-turn entry point and strategy tiers
//! - `counter`: counter-moves against opponents (non-regressive shifts and
//!   rotation probes)
//! - `probe`: transactional rotation probes shared by both

pub mod counter;
mod engine;
pub mod probe;

pub use engine::{DecisionEngine, Stage, Tier};
