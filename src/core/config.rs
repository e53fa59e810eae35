//! Simulation configuration.
//!
//! - `PieceCounts`: the multiset of free pieces (board + reserves)
//! - `BoardConfig`: board dimensions, reserve slots and pieces
//! - `PlayerConfig`: one pawn's name, color and answer chance
//! - `SimulationConfig`: everything a batch of simulations needs
//!
//! All configs validate up front; nothing is built from an invalid config.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::{PawnColor, PlayerId};

/// Number of pinned cells on every board: four corners and the chest.
pub const PINNED_CELLS: usize = 5;

/// Most players a board has starting corners for.
pub const MAX_PLAYERS: usize = 4;

/// Longest accepted player name.
pub const MAX_NAME_LEN: usize = 12;

/// Counts of the free piece shapes shared by board and reserves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCounts {
    pub straight: usize,
    pub corner: usize,
    pub tsplit: usize,
}

impl PieceCounts {
    #[must_use]
    pub const fn new(straight: usize, corner: usize, tsplit: usize) -> Self {
        Self { straight, corner, tsplit }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.straight + self.corner + self.tsplit
    }

    /// Scale these counts proportionally so they add up to `total`.
    ///
    /// Straight and corner shares are floored and T-splits take the
    /// remainder. All-zero counts are treated as equal weights.
    #[must_use]
    pub fn rebalanced(&self, total: usize) -> Self {
        let (straight, corner, sum) = if self.total() == 0 {
            (1, 1, 3)
        } else {
            (self.straight, self.corner, self.total())
        };

        let straight = straight * total / sum;
        let corner = corner * total / sum;
        let tsplit = total - straight - corner;

        Self { straight, corner, tsplit }
    }
}

impl Default for PieceCounts {
    fn default() -> Self {
        Self::new(20, 20, 9)
    }
}

/// Board dimensions and piece supply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Width and height. Must be odd and at least 5.
    pub size: usize,
    /// Reserve slots. At least 1.
    pub reserves: usize,
    pub pieces: PieceCounts,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: 7,
            reserves: 5,
            pieces: PieceCounts::default(),
        }
    }
}

impl BoardConfig {
    pub fn new(size: usize, reserves: usize, pieces: PieceCounts) -> Self {
        Self { size, reserves, pieces }
    }

    /// Free pieces the board needs: every unpinned cell plus every reserve.
    #[must_use]
    pub fn required_pieces(&self) -> usize {
        (self.size * self.size + self.reserves).saturating_sub(PINNED_CELLS)
    }

    /// Replace the piece counts with ones that fit this board exactly.
    #[must_use]
    pub fn with_rebalanced_pieces(mut self) -> Self {
        self.pieces = self.pieces.rebalanced(self.required_pieces());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size % 2 == 0 {
            return Err(ConfigError::EvenBoardSize(self.size));
        }
        if self.size < 5 {
            return Err(ConfigError::BoardTooSmall(self.size));
        }
        if self.reserves == 0 {
            return Err(ConfigError::NoReserves);
        }
        let expected = self.required_pieces();
        let actual = self.pieces.total();
        if actual != expected {
            return Err(ConfigError::PieceCountMismatch { expected, actual });
        }
        Ok(())
    }
}

/// One pawn's setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub color: PawnColor,
    /// Percent chance (0-100) of answering a turn's question correctly.
    pub answer_chance: u8,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, color: PawnColor, answer_chance: u8) -> Self {
        Self {
            name: name.into(),
            color,
            answer_chance,
        }
    }

    /// The default setup for seat `index`: "Player N" with the seat's color.
    #[must_use]
    pub fn seat(index: usize) -> Self {
        Self::new(format!("Player {}", index + 1), PawnColor::default_for(index), 50)
    }

    /// Set the answer chance.
    #[must_use]
    pub fn with_answer_chance(mut self, chance: u8) -> Self {
        self.answer_chance = chance;
        self
    }

    fn validate(&self, player: PlayerId) -> Result<(), ConfigError> {
        let len = self.name.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(ConfigError::PlayerName { player, len });
        }
        if self.answer_chance > 100 {
            return Err(ConfigError::AnswerChance {
                player,
                chance: self.answer_chance,
            });
        }
        Ok(())
    }
}

/// Validate a roster of 1-4 players.
pub fn validate_players(players: &[PlayerConfig]) -> Result<(), ConfigError> {
    if players.is_empty() || players.len() > MAX_PLAYERS {
        return Err(ConfigError::PlayerCount(players.len()));
    }
    for (player, config) in PlayerId::all(players.len()).zip(players) {
        config.validate(player)?;
    }
    Ok(())
}

/// Complete configuration for a batch of simulations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub board: BoardConfig,

    pub players: Vec<PlayerConfig>,

    /// Number of independent games to simulate.
    pub runs: usize,

    /// How many games (the lowest indices) stream their move log.
    pub visualize: usize,

    /// Length of one turn in seconds, for play-time estimates.
    pub turn_time_secs: u32,

    /// Turn limit per game (0 = unlimited).
    pub timeout_turns: u32,

    /// Base seed. `None` draws one from the OS at run start.
    pub seed: Option<u64>,

    /// Worker threads. `None` uses the rayon default.
    pub threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            players: (0..MAX_PLAYERS).map(PlayerConfig::seat).collect(),
            runs: 500,
            visualize: 0,
            turn_time_secs: 15,
            timeout_turns: 0,
            seed: None,
            threads: None,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    #[must_use]
    pub fn with_players(mut self, players: Vec<PlayerConfig>) -> Self {
        self.players = players;
        self
    }

    /// Use `count` default seats, all with the same answer chance.
    #[must_use]
    pub fn with_player_count(mut self, count: usize, answer_chance: u8) -> Self {
        self.players = (0..count)
            .map(|i| PlayerConfig::seat(i).with_answer_chance(answer_chance))
            .collect();
        self
    }

    #[must_use]
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    #[must_use]
    pub fn with_visualize(mut self, visualize: usize) -> Self {
        self.visualize = visualize;
        self
    }

    #[must_use]
    pub fn with_turn_time(mut self, secs: u32) -> Self {
        self.turn_time_secs = secs;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, turns: u32) -> Self {
        self.timeout_turns = turns;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        validate_players(&self.players)?;
        if self.runs == 0 {
            return Err(ConfigError::NoRuns);
        }
        if self.visualize > self.runs {
            return Err(ConfigError::TooManyVisualized {
                visualize: self.visualize,
                runs: self.runs,
            });
        }
        if self.timeout_turns == 0 && self.players.iter().all(|p| p.answer_chance == 0) {
            return Err(ConfigError::Unwinnable);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.board.size, 7);
        assert_eq!(config.board.required_pieces(), 49);
        assert_eq!(config.players.len(), 4);
        assert_eq!(config.players[0].name, "Player 1");
        assert_eq!(config.players[3].color, PawnColor::Orange);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nine_by_nine_needs_79() {
        let board = BoardConfig::new(9, 3, PieceCounts::new(30, 30, 19));
        assert_eq!(board.required_pieces(), 79);
        assert!(board.validate().is_ok());

        let off_by_one = BoardConfig::new(9, 3, PieceCounts::new(30, 30, 20));
        assert_eq!(
            off_by_one.validate(),
            Err(ConfigError::PieceCountMismatch { expected: 79, actual: 80 })
        );
    }

    #[test]
    fn test_board_size_rules() {
        let even = BoardConfig::new(8, 5, PieceCounts::new(0, 0, 64));
        assert_eq!(even.validate(), Err(ConfigError::EvenBoardSize(8)));

        let small = BoardConfig::new(3, 1, PieceCounts::new(5, 0, 0));
        assert_eq!(small.validate(), Err(ConfigError::BoardTooSmall(3)));

        let no_reserves = BoardConfig::new(5, 0, PieceCounts::new(20, 0, 0));
        assert_eq!(no_reserves.validate(), Err(ConfigError::NoReserves));
    }

    #[test]
    fn test_rebalanced_hits_total() {
        let counts = PieceCounts::new(10, 10, 5).rebalanced(49);
        assert_eq!(counts.total(), 49);
        assert_eq!(counts.straight, 19);
        assert_eq!(counts.corner, 19);
        assert_eq!(counts.tsplit, 11);

        let zeros = PieceCounts::new(0, 0, 0).rebalanced(30);
        assert_eq!(zeros, PieceCounts::new(10, 10, 10));
    }

    #[test]
    fn test_with_rebalanced_pieces_validates() {
        let board = BoardConfig::new(11, 4, PieceCounts::new(1, 1, 1)).with_rebalanced_pieces();
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_player_rules() {
        assert_eq!(validate_players(&[]), Err(ConfigError::PlayerCount(0)));

        let five: Vec<_> = (0..5).map(PlayerConfig::seat).collect();
        assert_eq!(validate_players(&five), Err(ConfigError::PlayerCount(5)));

        let bad_chance = vec![PlayerConfig::seat(0), PlayerConfig::seat(1).with_answer_chance(101)];
        assert_eq!(
            validate_players(&bad_chance),
            Err(ConfigError::AnswerChance { player: PlayerId::new(1), chance: 101 })
        );

        let long_name = vec![PlayerConfig::new("Bartholomew The Third", PawnColor::Red, 50)];
        assert_eq!(
            validate_players(&long_name),
            Err(ConfigError::PlayerName { player: PlayerId::new(0), len: 21 })
        );
    }

    #[test]
    fn test_run_rules() {
        assert_eq!(SimulationConfig::default().with_runs(0).validate(), Err(ConfigError::NoRuns));
        assert_eq!(
            SimulationConfig::default().with_runs(3).with_visualize(4).validate(),
            Err(ConfigError::TooManyVisualized { visualize: 4, runs: 3 })
        );
        assert_eq!(
            SimulationConfig::default().with_player_count(2, 0).validate(),
            Err(ConfigError::Unwinnable)
        );
        assert!(SimulationConfig::default().with_player_count(2, 0).with_timeout(10).validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SimulationConfig::new()
            .with_player_count(2, 80)
            .with_runs(10)
            .with_timeout(200)
            .with_seed(9)
            .with_threads(2);

        assert_eq!(config.players.len(), 2);
        assert!(config.players.iter().all(|p| p.answer_chance == 80));
        assert_eq!(config.runs, 10);
        assert_eq!(config.timeout_turns, 200);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.threads, Some(2));
    }

    #[test]
    fn test_serialization() {
        let config = SimulationConfig::default().with_seed(5);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
