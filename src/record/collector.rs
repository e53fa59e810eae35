//! Per-instance collector: move counters plus an optional record stream.

use serde::{Deserialize, Serialize};

use super::{CounterKind, DataCollector, MoveKind, MoveRecord};

/// Running totals of one game's actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCounters {
    pub pawns_moved: u32,
    pub rows_shifted: u32,
    /// Net of undone rotation probes.
    pub blocks_rotated: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
}

impl MoveCounters {
    /// Persistent board/pawn actions so far.
    #[must_use]
    pub fn actions(&self) -> u32 {
        self.pawns_moved + self.rows_shifted + self.blocks_rotated
    }
}

/// One entry in a recorded move stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntry {
    Move(MoveRecord),
    EndOfTurn,
}

/// The collector each simulation instance owns.
///
/// Counters are always maintained. Records are retained only when the log
/// was created with [`GameLog::recording`].
#[derive(Clone, Debug, Default)]
pub struct GameLog {
    counters: MoveCounters,
    entries: Option<Vec<LogEntry>>,
}

impl GameLog {
    /// A log that only counts.
    pub fn counting() -> Self {
        Self::default()
    }

    /// A log that counts and keeps every move record.
    pub fn recording() -> Self {
        Self {
            counters: MoveCounters::default(),
            entries: Some(Vec::new()),
        }
    }

    #[must_use]
    pub fn counters(&self) -> &MoveCounters {
        &self.counters
    }

    /// All entries, including end-of-turn markers. Empty when not recording.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        self.entries.as_deref().unwrap_or(&[])
    }

    /// Move records only.
    pub fn moves(&self) -> impl Iterator<Item = &MoveRecord> {
        self.entries().iter().filter_map(|entry| match entry {
            LogEntry::Move(record) => Some(record),
            LogEntry::EndOfTurn => None,
        })
    }

    /// Move records of one kind.
    pub fn moves_of(&self, kind: MoveKind) -> impl Iterator<Item = &MoveRecord> {
        self.moves().filter(move |record| record.kind == kind)
    }

    /// Take the recorded entries, leaving the log counting only.
    pub fn take_entries(&mut self) -> Vec<LogEntry> {
        self.entries.take().unwrap_or_default()
    }
}

impl DataCollector for GameLog {
    fn is_receiving_data(&self) -> bool {
        self.entries.is_some()
    }

    fn send_move_data(&mut self, record: MoveRecord) {
        if let Some(entries) = &mut self.entries {
            entries.push(LogEntry::Move(record));
        }
    }

    fn increment_move_data(&mut self, kind: CounterKind) {
        let counters = &mut self.counters;
        match kind {
            CounterKind::PawnMoved => counters.pawns_moved += 1,
            CounterKind::HallShifted => counters.rows_shifted += 1,
            CounterKind::BlockRotated => counters.blocks_rotated += 1,
            CounterKind::BlockRotationUndone => {
                counters.blocks_rotated = counters.blocks_rotated.saturating_sub(1);
            }
            CounterKind::CorrectAnswer => counters.correct_answers += 1,
            CounterKind::IncorrectAnswer => counters.incorrect_answers += 1,
        }
    }

    fn remove_last_move(&mut self) {
        // Never reaches back across a turn boundary.
        if let Some(entries) = &mut self.entries {
            if matches!(entries.last(), Some(LogEntry::Move(_))) {
                entries.pop();
            }
        }
    }

    fn end_turn(&mut self) {
        if let Some(entries) = &mut self.entries {
            entries.push(LogEntry::EndOfTurn);
        }
    }
}
