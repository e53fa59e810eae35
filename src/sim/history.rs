//! Recorded games for the external visualizer.
//!
//! A `GameHistory` holds the initial board, the starting pawns and the full
//! move log of one game. Histories travel encoded with bincode.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Player;
use crate::maze::Board;
use crate::record::{LogEntry, MoveRecord};

use super::stats::Outcome;

#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameHistory {
    /// Instance index within its batch.
    pub index: usize,
    pub base_seed: u64,
    /// Board and reserves before the first turn.
    pub initial_board: Board,
    /// Pawns before the first turn.
    pub players: Vec<Player>,
    /// Move records separated by end-of-turn markers.
    pub entries: Vec<LogEntry>,
    pub turns: u32,
    pub outcome: Outcome,
}

impl GameHistory {
    /// Move records grouped by turn.
    pub fn turns(&self) -> impl Iterator<Item = Vec<&MoveRecord>> {
        self.entries
            .split(|entry| *entry == LogEntry::EndOfTurn)
            .take(self.turns as usize)
            .map(|turn| {
                turn.iter()
                    .filter_map(|entry| match entry {
                        LogEntry::Move(record) => Some(record),
                        LogEntry::EndOfTurn => None,
                    })
                    .collect()
            })
    }

    pub fn encode(&self) -> Result<Vec<u8>, HistoryError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, HistoryError> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), HistoryError> {
        let data = self.encode()?;
        let mut f = fs::File::create(path)?;
        f.write_all(&data)?;
        Ok(())
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let data = fs::read(path)?;
        Self::decode(&data)
    }
}
