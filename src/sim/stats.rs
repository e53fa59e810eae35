//! Per-game statistics and the aggregate report of a batch.

use serde::{Deserialize, Serialize};

use crate::core::{AnswerTally, PawnColor, PlayerId, PlayerMap};

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// This player reached the chest.
    Winner(PlayerId),
    /// The turn limit ran out first. A normal result, not a failure.
    TimedOut,
}

impl Outcome {
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::TimedOut => None,
        }
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner() == Some(player)
    }
}

/// One player's line in a game's statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub color: PawnColor,
    pub answers: AnswerTally,
    /// Voluntary steps.
    pub moves: u32,
}

impl PlayerStats {
    #[must_use]
    pub fn percent_correct(&self) -> f64 {
        self.answers.percent_correct()
    }
}

/// Final statistics of one simulation instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Instance index within its batch.
    pub index: usize,
    /// Turns played, the winning turn included.
    pub turns: u32,
    pub rows_shifted: u32,
    /// Net of undone probes.
    pub blocks_rotated: u32,
    pub pawns_moved: u32,
    pub players: PlayerMap<PlayerStats>,
    pub outcome: Outcome,
    /// Estimated table time: turns times the configured turn length.
    pub play_time_secs: u64,
}

/// Aggregate over a batch of games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub base_seed: u64,
    pub runs: usize,
    pub wins: PlayerMap<u32>,
    pub timeouts: u32,
    pub mean_turns: f64,
    pub min_turns: u32,
    pub max_turns: u32,
    pub mean_play_time_secs: f64,
    pub total_rows_shifted: u64,
    pub total_blocks_rotated: u64,
    pub total_pawns_moved: u64,
    /// Mean correct-answer percentage per player.
    pub mean_percent_correct: PlayerMap<f64>,
    pub games: Vec<GameStats>,
}

impl SimulationReport {
    /// Aggregate finished games. `games` must be non-empty and share one
    /// roster of `player_count` players.
    #[must_use]
    pub fn from_games(base_seed: u64, player_count: usize, games: Vec<GameStats>) -> Self {
        let mut wins: PlayerMap<u32> = PlayerMap::with_value(player_count, 0);
        let mut percent: PlayerMap<f64> = PlayerMap::with_value(player_count, 0.0);
        let mut timeouts = 0;
        let (mut rows, mut blocks, mut pawns, mut turns, mut play) = (0u64, 0u64, 0u64, 0u64, 0u64);

        for game in &games {
            match game.outcome {
                Outcome::Winner(player) => wins[player] += 1,
                Outcome::TimedOut => timeouts += 1,
            }
            rows += u64::from(game.rows_shifted);
            blocks += u64::from(game.blocks_rotated);
            pawns += u64::from(game.pawns_moved);
            turns += u64::from(game.turns);
            play += game.play_time_secs;
            for (player, stats) in game.players.iter() {
                percent[player] += stats.percent_correct();
            }
        }

        let n = games.len().max(1) as f64;
        for (_, value) in percent.iter_mut() {
            *value /= n;
        }

        Self {
            base_seed,
            runs: games.len(),
            wins,
            timeouts,
            mean_turns: turns as f64 / n,
            min_turns: games.iter().map(|g| g.turns).min().unwrap_or(0),
            max_turns: games.iter().map(|g| g.turns).max().unwrap_or(0),
            mean_play_time_secs: play as f64 / n,
            total_rows_shifted: rows,
            total_blocks_rotated: blocks,
            total_pawns_moved: pawns,
            mean_percent_correct: percent,
            games,
        }
    }

    /// Share of games `player` won, in percent.
    #[must_use]
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            f64::from(self.wins[player]) * 100.0 / self.runs as f64
        }
    }
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "runs: {} (seed {})", self.runs, self.base_seed)?;
        writeln!(
            f,
            "turns: mean {:.1}, min {}, max {}",
            self.mean_turns, self.min_turns, self.max_turns
        )?;
        writeln!(f, "play time: mean {:.0}s", self.mean_play_time_secs)?;
        writeln!(
            f,
            "actions: {} shifts, {} rotations, {} steps",
            self.total_rows_shifted, self.total_blocks_rotated, self.total_pawns_moved
        )?;
        let names = self.games.first().map(|g| &g.players);
        for (player, wins) in self.wins.iter() {
            let name = names.map_or_else(|| player.to_string(), |p| p[player].name.clone());
            writeln!(
                f,
                "{}: {} wins ({:.1}%), {:.1}% correct",
                name,
                wins,
                self.win_rate(player),
                self.mean_percent_correct[player]
            )?;
        }
        writeln!(f, "timed out: {}", self.timeouts)
    }
}
