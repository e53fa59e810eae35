//! One simulation instance: a single game played to a win or a timeout.

use crate::ai::DecisionEngine;
use crate::core::{ConfigError, GameState, Player, PlayerId, PlayerMap, SimRng, SimulationConfig};
use crate::maze::Board;
use crate::record::GameLog;

use super::history::GameHistory;
use super::stats::{GameStats, Outcome, PlayerStats};

/// A game in progress.
///
/// Owns its board, pawns, log and RNG outright; nothing is shared with
/// other instances.
#[derive(Clone, Debug)]
pub struct Simulation {
    index: usize,
    base_seed: u64,
    state: GameState,
    engine: DecisionEngine,
    answer_chances: Vec<u8>,
    timeout_turns: u32,
    turn_time_secs: u32,
    /// Starting position, kept only for recorded games.
    initial: Option<(Board, Vec<Player>)>,
}

impl Simulation {
    /// Set up instance `index` of a batch seeded with `base_seed`.
    ///
    /// A recorded instance keeps every move record and a copy of the
    /// starting position.
    pub fn new(config: &SimulationConfig, index: usize, base_seed: u64, record: bool) -> Result<Self, ConfigError> {
        let mut rng = SimRng::for_instance(base_seed, index as u64);
        let board = Board::new(&config.board, &mut rng)?;
        let log = if record { GameLog::recording() } else { GameLog::counting() };
        let state = GameState::new(board, &config.players, log, rng)?;
        let answer_chances = config.players.iter().map(|p| p.answer_chance).collect();

        let mut sim = Self::from_state(state, answer_chances)
            .with_timeout(config.timeout_turns)
            .with_turn_time(config.turn_time_secs);
        sim.index = index;
        sim.base_seed = base_seed;
        if record {
            sim.initial = Some((sim.state.board.clone(), sim.state.players.clone()));
        }
        Ok(sim)
    }

    /// Wrap a prepared state. `answer_chances` has one entry per pawn.
    #[must_use]
    pub fn from_state(state: GameState, answer_chances: Vec<u8>) -> Self {
        Self {
            index: 0,
            base_seed: 0,
            state,
            engine: DecisionEngine::default(),
            answer_chances,
            timeout_turns: 0,
            turn_time_secs: 0,
            initial: None,
        }
    }

    /// Turn limit; 0 means unlimited.
    #[must_use]
    pub fn with_timeout(mut self, turns: u32) -> Self {
        self.timeout_turns = turns;
        self
    }

    #[must_use]
    pub fn with_turn_time(mut self, secs: u32) -> Self {
        self.turn_time_secs = secs;
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: DecisionEngine) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Whose turn it is: strict round-robin from seat 0.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        PlayerId::new((self.state.turn_number as usize % self.state.player_count()) as u8)
    }

    /// Play one turn. Returns the winner if this turn ended the game.
    pub fn play_turn(&mut self) -> Option<PlayerId> {
        let player = self.active_player();
        let chance = self.answer_chances.get(player.index()).copied().unwrap_or(0);
        let won = self.engine.execute_next_move(&mut self.state, player, chance);
        self.state.end_turn();
        won.then_some(player)
    }

    /// Play until someone reaches the chest or the turn limit runs out.
    pub fn run(&mut self) -> Outcome {
        loop {
            if self.timeout_turns > 0 && self.state.turn_number >= self.timeout_turns {
                return Outcome::TimedOut;
            }
            if let Some(winner) = self.play_turn() {
                return Outcome::Winner(winner);
            }
        }
    }

    /// Play the game out and produce its statistics.
    pub fn finish(mut self) -> GameStats {
        let outcome = self.run();
        self.stats(outcome)
    }

    /// Play the game out, also returning the history of a recorded game.
    pub fn finish_recorded(mut self) -> (GameStats, Option<GameHistory>) {
        let outcome = self.run();
        let stats = self.stats(outcome);
        let history = self.initial.take().map(|(initial_board, players)| GameHistory {
            index: self.index,
            base_seed: self.base_seed,
            initial_board,
            players,
            entries: self.state.log.take_entries(),
            turns: stats.turns,
            outcome,
        });
        (stats, history)
    }

    fn stats(&self, outcome: Outcome) -> GameStats {
        let state = &self.state;
        let counters = state.log.counters();
        let players = PlayerMap::new(state.player_count(), |id| {
            let player = state.player(id);
            PlayerStats {
                name: player.name.clone(),
                color: player.color,
                answers: state.answers[id],
                moves: player.move_count,
            }
        });
        GameStats {
            index: self.index,
            turns: state.turn_number,
            rows_shifted: counters.rows_shifted,
            blocks_rotated: counters.blocks_rotated,
            pawns_moved: counters.pawns_moved,
            players,
            outcome,
            play_time_secs: u64::from(state.turn_number) * u64::from(self.turn_time_secs),
        }
    }
}
