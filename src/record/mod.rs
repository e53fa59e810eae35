//! Move records and the data-collector capability.
//!
//! Boards and players never talk to a global logger. Every mutating
//! operation takes a `&mut dyn DataCollector`, so each simulation instance
//! wires in its own collector. The core logic never reads records back,
//! apart from `remove_last_move` used when a rotation probe is undone.

mod collector;

pub use self::collector::{GameLog, LogEntry, MoveCounters};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::geometry::{Direction, Position, Turn};
use crate::core::player::PlayerId;

/// Kind of a recorded move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    PawnMoved,
    HallShifted,
    BlockRotated,
}

/// Named counters a collector keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    PawnMoved,
    HallShifted,
    BlockRotated,
    BlockRotationUndone,
    CorrectAnswer,
    IncorrectAnswer,
}

/// What a move acted on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTarget {
    /// A pawn stepping on its own.
    Player(PlayerId),
    /// A shifted row or column.
    Line {
        index: usize,
        reserve: usize,
        orientation: u8,
        /// Players carried along by the shift.
        displaced: SmallVec<[PlayerId; 4]>,
    },
    /// A rotated cell.
    Cell(Position),
}

/// Direction component of a move record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Step(Direction),
    Turn(Turn),
}

/// One `(kind, target, direction)` move record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub kind: MoveKind,
    pub target: MoveTarget,
    pub direction: MoveDirection,
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = match self.direction {
            MoveDirection::Step(dir) => dir.to_string(),
            MoveDirection::Turn(turn) => turn.to_string(),
        };
        match &self.target {
            MoveTarget::Player(player) => write!(f, "{:?} {} {}", self.kind, player.0, direction),
            MoveTarget::Cell(pos) => write!(f, "{:?} {} {}", self.kind, pos, direction),
            MoveTarget::Line {
                index,
                reserve,
                orientation,
                displaced,
            } => {
                write!(f, "{:?} {},{},{}", self.kind, index, reserve, orientation)?;
                if !displaced.is_empty() {
                    let ids: Vec<String> = displaced.iter().map(|p| p.0.to_string()).collect();
                    write!(f, "-{}", ids.join(":"))?;
                }
                write!(f, " {}", direction)
            }
        }
    }
}

/// Sink for move records and counters.
///
/// Implemented by the per-instance `GameLog`; external consumers may
/// provide their own.
pub trait DataCollector {
    /// Whether move records are retained at all. Counters are always kept.
    fn is_receiving_data(&self) -> bool;

    /// Append one move record.
    fn send_move_data(&mut self, record: MoveRecord);

    /// Increment a named counter.
    fn increment_move_data(&mut self, kind: CounterKind);

    /// Remove the most recently appended move record, if any.
    fn remove_last_move(&mut self);

    /// Mark the end of a turn in the record stream.
    fn end_turn(&mut self) {}
}

/// Collector that keeps nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCollector;

impl DataCollector for NullCollector {
    fn is_receiving_data(&self) -> bool {
        false
    }

    fn send_move_data(&mut self, _record: MoveRecord) {}

    fn increment_move_data(&mut self, _kind: CounterKind) {}

    fn remove_last_move(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_display_shift_record() {
        let record = MoveRecord {
            kind: MoveKind::HallShifted,
            target: MoveTarget::Line {
                index: 3,
                reserve: 1,
                orientation: 2,
                displaced: smallvec![PlayerId::new(0), PlayerId::new(2)],
            },
            direction: MoveDirection::Step(Direction::Left),
        };
        assert_eq!(record.to_string(), "HallShifted 3,1,2-0:2 Left");
    }

    #[test]
    fn test_display_rotation_record() {
        let record = MoveRecord {
            kind: MoveKind::BlockRotated,
            target: MoveTarget::Cell(Position::new(4, 1)),
            direction: MoveDirection::Turn(Turn::Right),
        };
        assert_eq!(record.to_string(), "BlockRotated 4,1 Right");
    }

    #[test]
    fn test_record_serde() {
        let record = MoveRecord {
            kind: MoveKind::PawnMoved,
            target: MoveTarget::Player(PlayerId::new(3)),
            direction: MoveDirection::Step(Direction::Down),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: MoveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
