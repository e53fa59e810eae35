//! Running many independent games in parallel.
//!
//! Each instance gets its own ChaCha stream derived from the batch's base
//! seed, so results do not depend on thread count or scheduling. Results
//! come back through rayon's ordered `collect`; no counters are shared.
//!
//! The first `visualize` instances are recorded and their histories pushed
//! into a bounded channel with room for all of them, so producers never
//! wait on the consumer.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::core::{ConfigError, SimRng, SimulationConfig};

use super::history::GameHistory;
use super::instance::Simulation;
use super::stats::{GameStats, SimulationReport};

pub struct SimulationRunner {
    config: SimulationConfig,
    base_seed: u64,
    pool: Option<ThreadPool>,
}

impl SimulationRunner {
    /// Validate `config` and prepare the worker pool.
    ///
    /// Without a configured seed a base seed is drawn from the OS and
    /// logged, so the batch can be reproduced.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let base_seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = SimRng::entropy_seed();
                info!("no seed configured, using base seed {}", seed);
                seed
            }
        };

        let pool = config
            .threads
            .map(|threads| {
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| ConfigError::ThreadPool(e.to_string()))
            })
            .transpose()?;

        Ok(Self { config, base_seed, pool })
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// A channel sized to hold every visualized history.
    #[must_use]
    pub fn history_channel(&self) -> (SyncSender<GameHistory>, Receiver<GameHistory>) {
        sync_channel(self.config.visualize.max(1))
    }

    /// Run the batch, discarding histories.
    pub fn run(&self) -> Result<SimulationReport, ConfigError> {
        self.run_batch(None)
    }

    /// Run the batch, sending the history of each visualized instance.
    ///
    /// Histories arrive in completion order. A dropped receiver only stops
    /// delivery; the batch still completes.
    pub fn run_with_histories(&self, histories: SyncSender<GameHistory>) -> Result<SimulationReport, ConfigError> {
        self.run_batch(Some(histories))
    }

    fn run_batch(&self, histories: Option<SyncSender<GameHistory>>) -> Result<SimulationReport, ConfigError> {
        info!(
            "running {} games with {} players (seed {}, {} visualized)",
            self.config.runs,
            self.config.players.len(),
            self.base_seed,
            self.config.visualize
        );

        let work = || {
            (0..self.config.runs)
                .into_par_iter()
                .map_with(histories, |tx, index| self.run_instance(index, tx.as_ref()))
                .collect::<Result<Vec<_>, _>>()
        };
        let games = match &self.pool {
            Some(pool) => pool.install(work)?,
            None => work()?,
        };

        let report = SimulationReport::from_games(self.base_seed, self.config.players.len(), games);
        info!(
            "finished {} games: mean {:.1} turns, {} timed out",
            report.runs, report.mean_turns, report.timeouts
        );
        Ok(report)
    }

    fn run_instance(&self, index: usize, histories: Option<&SyncSender<GameHistory>>) -> Result<GameStats, ConfigError> {
        let record = histories.is_some() && index < self.config.visualize;
        let sim = Simulation::new(&self.config, index, self.base_seed, record)?;
        let (stats, history) = sim.finish_recorded();
        debug!("game {} finished after {} turns: {:?}", index, stats.turns, stats.outcome);

        if let (Some(tx), Some(history)) = (histories, history) {
            if tx.send(history).is_err() {
                debug!("history receiver gone, dropping game {}", index);
            }
        }
        Ok(stats)
    }
}
