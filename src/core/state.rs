//! Game state for one simulation instance.
//!
//! ## GameState
//!
//! Everything one game owns:
//! - The board and its reserves
//! - The pawns, indexed by `PlayerId`
//! - The instance's move log
//! - The instance's RNG
//! - Per-player answer tallies
//!
//! Mutators borrow the board, pawns and log together, so a line shift can
//! carry pawns and report itself in one call.

use serde::{Deserialize, Serialize};

use super::config::{validate_players, PlayerConfig};
use super::error::ConfigError;
use super::geometry::{Direction, Position, Turn};
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::SimRng;
use crate::maze::Board;
use crate::record::{CounterKind, DataCollector, GameLog};

/// Correct and incorrect answers of one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerTally {
    pub correct: u32,
    pub incorrect: u32,
}

impl AnswerTally {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Share of correct answers in percent; 0 before any question.
    #[must_use]
    pub fn percent_correct(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.correct) * 100.0 / f64::from(total),
        }
    }
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    pub board: Board,
    pub players: Vec<Player>,
    pub log: GameLog,
    pub rng: SimRng,
    pub answers: PlayerMap<AnswerTally>,
    /// Completed turns.
    pub turn_number: u32,
}

impl GameState {
    /// Seat one pawn per roster entry on the corners, clockwise from the
    /// top-left.
    pub fn new(board: Board, roster: &[PlayerConfig], log: GameLog, rng: SimRng) -> Result<Self, ConfigError> {
        validate_players(roster)?;

        let size = board.size();
        let players = PlayerId::all(roster.len())
            .zip(roster)
            .map(|(id, config)| {
                let corner = Player::starting_corner(id.index(), size).ok_or(ConfigError::PlayerCount(roster.len()))?;
                Ok(Player::new(id, config.name.clone(), config.color, corner))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self::from_parts(board, players, log, rng))
    }

    /// Assemble a state from pre-placed pawns. Pawn ids must be their seat
    /// indices.
    #[must_use]
    pub fn from_parts(board: Board, players: Vec<Player>, log: GameLog, rng: SimRng) -> Self {
        let answers = PlayerMap::with_default(players.len().max(1));
        Self {
            board,
            players,
            log,
            rng,
            answers,
            turn_number: 0,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.players.len())
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    #[must_use]
    pub fn position(&self, id: PlayerId) -> Position {
        self.player(id).position
    }

    #[must_use]
    pub fn chest(&self) -> Position {
        self.board.center()
    }

    /// Signed `(dx, dy)` from the player to the chest.
    #[must_use]
    pub fn offset_to_chest(&self, id: PlayerId) -> (i32, i32) {
        self.position(id).offset_to(self.chest())
    }

    /// Manhattan distance from `pos` to the chest.
    #[must_use]
    pub fn distance_to_chest(&self, pos: Position) -> u32 {
        pos.distance(self.chest())
    }

    #[must_use]
    pub fn player_distance(&self, id: PlayerId) -> u32 {
        self.distance_to_chest(self.position(id))
    }

    #[must_use]
    pub fn has_won(&self, id: PlayerId) -> bool {
        self.position(id) == self.chest()
    }

    #[must_use]
    pub fn can_move(&self, id: PlayerId, dir: Direction) -> bool {
        self.board.can_player_move(self.position(id), dir)
    }

    #[must_use]
    pub fn can_exit(&self, id: PlayerId, dir: Direction) -> bool {
        self.board.can_player_exit(self.position(id), dir)
    }

    /// Persistent pawn and board actions so far. Undone probes cancel out,
    /// so comparing two readings tells whether anything happened.
    #[must_use]
    pub fn action_count(&self) -> u32 {
        self.log.counters().actions()
    }

    /// Step a pawn if the move is legal.
    pub fn step(&mut self, id: PlayerId, dir: Direction) -> bool {
        if !self.can_move(id, dir) {
            return false;
        }
        self.players[id.index()].step(dir, &mut self.log);
        true
    }

    /// Shift a line with a reserve slot and orientation drawn from the
    /// instance RNG.
    pub fn shift(&mut self, index: usize, dir: Direction) -> bool {
        self.board
            .shift_line(index, dir, &mut self.players, &mut self.log, &mut self.rng)
    }

    /// Single-step rotation that the log records.
    pub fn rotate(&mut self, pos: Position, turn: Turn) -> bool {
        self.board.rotate(pos, turn, 1, false, &mut self.log)
    }

    /// Double-step correction that replaces the previous rotation record.
    pub fn rotate_back(&mut self, pos: Position, turn: Turn) -> bool {
        self.board.rotate(pos, turn, 2, false, &mut self.log)
    }

    pub fn restore_orientation(&mut self, pos: Position, snapshot: u8) -> bool {
        self.board.restore_orientation(pos, snapshot, &mut self.log)
    }

    /// Count one answer for `id`, in the log and in the player's tally.
    pub fn record_answer(&mut self, id: PlayerId, correct: bool) {
        let tally = &mut self.answers[id];
        if correct {
            tally.correct += 1;
            self.log.increment_move_data(CounterKind::CorrectAnswer);
        } else {
            tally.incorrect += 1;
            self.log.increment_move_data(CounterKind::IncorrectAnswer);
        }
    }

    /// Close the current turn.
    pub fn end_turn(&mut self) {
        self.log.end_turn();
        self.turn_number += 1;
    }
}
