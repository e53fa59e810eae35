use std::fs;
use std::path::PathBuf;
use std::thread;

use amaze_sim::core::MAX_PLAYERS;
use amaze_sim::{BoardConfig, PawnColor, PieceCounts, PlayerConfig, SimulationConfig, SimulationRunner};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "amaze", version, about = "Simulate maze race games between scripted players")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value_t = 500)]
    runs: usize,

    /// Number of players (1-4)
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// Percent chance of a correct answer, one value for everyone or one per player
    #[arg(short = 'a', long = "answer-chance", value_delimiter = ',', default_value = "50")]
    answer_chance: Vec<u8>,

    /// Player names, comma separated
    #[arg(long, value_delimiter = ',')]
    names: Vec<String>,

    /// Pawn colors, comma separated
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,

    /// Board width and height (odd, at least 5)
    #[arg(short, long, default_value_t = 7)]
    size: usize,

    /// Reserve slots
    #[arg(long, default_value_t = 5)]
    reserves: usize,

    /// Straight pieces
    #[arg(long, default_value_t = 20)]
    straight: usize,

    /// Corner pieces
    #[arg(long, default_value_t = 20)]
    corner: usize,

    /// T-split pieces
    #[arg(long, default_value_t = 9)]
    tsplit: usize,

    /// Scale the piece counts to fit the board instead of rejecting a mismatch
    #[arg(long)]
    rebalance: bool,

    /// Record the first N games for the visualizer
    #[arg(long, default_value_t = 0)]
    visualize: usize,

    /// Seconds per turn, for play-time estimates
    #[arg(long = "turn-time", default_value_t = 15)]
    turn_time: u32,

    /// Turn limit per game (0 = unlimited)
    #[arg(short, long, default_value_t = 0)]
    timeout: u32,

    /// Base seed for reproducible batches
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write recorded games to this directory as game-<index>.bin
    #[arg(long = "history-dir", value_name = "DIR")]
    history_dir: Option<PathBuf>,
}

impl Args {
    fn roster(&self) -> anyhow::Result<Vec<PlayerConfig>> {
        if self.players == 0 || self.players > MAX_PLAYERS {
            anyhow::bail!("--players must be between 1 and {}, got {}", MAX_PLAYERS, self.players);
        }
        if self.answer_chance.len() != 1 && self.answer_chance.len() != self.players {
            anyhow::bail!(
                "--answer-chance takes one value or one per player, got {} for {} players",
                self.answer_chance.len(),
                self.players
            );
        }

        (0..self.players)
            .map(|i| {
                let mut player = PlayerConfig::seat(i);
                if let Some(name) = self.names.get(i) {
                    player.name = name.clone();
                }
                if let Some(color) = self.colors.get(i) {
                    player.color = PawnColor::parse(color)
                        .ok_or_else(|| anyhow::anyhow!("unknown pawn color '{}'", color))?;
                }
                let chance = self.answer_chance.get(i).or_else(|| self.answer_chance.first());
                player.answer_chance = chance.copied().unwrap_or(50);
                Ok(player)
            })
            .collect()
    }

    fn config(&self) -> anyhow::Result<SimulationConfig> {
        let mut board = BoardConfig::new(
            self.size,
            self.reserves,
            PieceCounts::new(self.straight, self.corner, self.tsplit),
        );
        if self.rebalance {
            board = board.with_rebalanced_pieces();
        }

        let mut config = SimulationConfig::new()
            .with_board(board)
            .with_players(self.roster()?)
            .with_runs(self.runs)
            .with_visualize(self.visualize)
            .with_turn_time(self.turn_time)
            .with_timeout(self.timeout);
        config.seed = self.seed;
        config.threads = self.threads;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let runner = SimulationRunner::new(args.config()?)?;

    let report = match &args.history_dir {
        Some(dir) if args.visualize > 0 => {
            fs::create_dir_all(dir)?;
            let (tx, rx) = runner.history_channel();
            let dir = dir.clone();
            let writer = thread::spawn(move || -> anyhow::Result<usize> {
                let mut written = 0;
                for history in rx {
                    let path = dir.join(format!("game-{}.bin", history.index));
                    history.write_to_path(&path)?;
                    log::debug!("wrote {}", path.display());
                    written += 1;
                }
                Ok(written)
            });

            let report = runner.run_with_histories(tx)?;
            let written = writer
                .join()
                .map_err(|_| anyhow::anyhow!("history writer thread panicked"))??;
            eprintln!("wrote {} histories", written);
            report
        }
        _ => runner.run()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
