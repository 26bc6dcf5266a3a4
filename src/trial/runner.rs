//! Monte Carlo driver: many independent battles per monster, folded into histograms.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{resolve_battle, CombatEntity, Rng, StatProfile};
use crate::data::{MonsterProfile, Scenario};
use crate::parallel::{plan_batches, WorkerPool};
use crate::trial::histogram::Histogram;

pub const DEFAULT_SAMPLE_SIZE: usize = 100_000;

/// Number of sample batches for [run_trial_parallel]. Fixed so results depend on the seed only,
/// not on how many workers run them.
pub const PARALLEL_BATCH_COUNT: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialMode {
    /// Every battle starts from a fresh player and a fresh monster.
    #[default]
    Independent,
    /// Each sample sends one player through every monster in order. Health, resource and
    /// effects carry over; only the working profile is reset between fights.
    Gauntlet,
}

#[derive(Debug, Clone)]
pub struct CombatTrial {
    pub player: Arc<StatProfile>,
    pub monsters: Vec<MonsterProfile>,
    pub sample_size: usize,
    /// `None` seeds from OS entropy, so reruns differ.
    pub seed: Option<u64>,
    pub mode: TrialMode,
}

impl CombatTrial {
    pub fn new(player: Arc<StatProfile>, monsters: Vec<MonsterProfile>) -> Self {
        Self {
            player,
            monsters,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: None,
            mode: TrialMode::default(),
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_mode(mut self, mode: TrialMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build from a loaded scenario. Scenario-level settings win over the defaults.
    pub fn from_scenario(scenario: Scenario) -> Self {
        Self {
            player: scenario.player,
            monsters: scenario.monsters,
            sample_size: scenario.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            seed: scenario.seed,
            mode: scenario.mode.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonsterOutcome {
    pub monster: String,
    pub exp: u32,
    pub turns: Histogram,
    pub hp_lost: Histogram,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialReport {
    pub sample_size: usize,
    pub mode: TrialMode,
    pub seed: Option<u64>,
    pub battles: Vec<MonsterOutcome>,
}

impl TrialReport {
    pub fn outcome(&self, monster: &str) -> Option<&MonsterOutcome> {
        self.battles.iter().find(|o| o.monster.eq_ignore_ascii_case(monster))
    }
}

/// Per-monster histograms, one slot per monster in trial order.
#[derive(Debug, Clone)]
struct Tally {
    turns: Vec<Histogram>,
    hp_lost: Vec<Histogram>,
}

impl Tally {
    fn new(monsters: usize) -> Self {
        Self {
            turns: vec![Histogram::new(); monsters],
            hp_lost: vec![Histogram::new(); monsters],
        }
    }

    fn record(&mut self, index: usize, turns: u32, hp_lost: u32) {
        self.turns[index].record(turns);
        self.hp_lost[index].record(hp_lost);
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (mine, theirs) in self.turns.iter_mut().zip(&other.turns) {
            mine.merge(theirs);
        }
        for (mine, theirs) in self.hp_lost.iter_mut().zip(&other.hp_lost) {
            mine.merge(theirs);
        }
        self
    }

    fn into_report(self, trial: &CombatTrial) -> TrialReport {
        let battles = trial
            .monsters
            .iter()
            .zip(self.turns.into_iter().zip(self.hp_lost))
            .map(|(monster, (turns, hp_lost))| MonsterOutcome {
                monster: monster.name.clone(),
                exp: monster.exp,
                turns,
                hp_lost,
            })
            .collect();
        TrialReport {
            sample_size: trial.sample_size,
            mode: trial.mode,
            seed: trial.seed,
            battles,
        }
    }
}

/// Run the whole trial on the calling thread with a single random source.
pub fn run_trial(trial: &CombatTrial) -> TrialReport {
    let mut rng = Rng::from_optional_seed(trial.seed);
    tracing::info!(
        samples = trial.sample_size,
        monsters = trial.monsters.len(),
        mode = ?trial.mode,
        "running trial"
    );
    let tally = run_samples(trial, trial.sample_size, &mut rng, true);
    tally.into_report(trial)
}

/// Split the samples into [PARALLEL_BATCH_COUNT] batches and run them on the pool. Batch `i`
/// draws from its own generator seeded `base + i`, so a fixed seed gives a fixed report.
pub fn run_trial_parallel(trial: &CombatTrial, pool: &WorkerPool) -> TrialReport {
    let base_seed = trial.seed.unwrap_or_else(|| Rng::from_entropy().next_u64());
    let batches = plan_batches(trial.sample_size, PARALLEL_BATCH_COUNT, base_seed);
    tracing::info!(
        samples = trial.sample_size,
        monsters = trial.monsters.len(),
        batches = batches.len(),
        workers = pool.workers,
        mode = ?trial.mode,
        "running parallel trial"
    );

    let tallies: Vec<Tally> = pool.install(|| {
        batches
            .par_iter()
            .map(|batch| {
                let mut rng = Rng::new(batch.seed);
                let tally = run_samples(trial, batch.samples, &mut rng, false);
                tracing::debug!(batch = batch.index, samples = batch.samples, "batch finished");
                tally
            })
            .collect()
    });

    tallies
        .into_iter()
        .fold(Tally::new(trial.monsters.len()), Tally::merge)
        .into_report(trial)
}

fn run_samples(trial: &CombatTrial, samples: usize, rng: &mut Rng, log_progress: bool) -> Tally {
    let mut tally = Tally::new(trial.monsters.len());
    match trial.mode {
        TrialMode::Independent => {
            for (index, monster) in trial.monsters.iter().enumerate() {
                if log_progress {
                    tracing::info!(monster = %monster.name, "simulating battles");
                }
                for _ in 0..samples {
                    let mut player = CombatEntity::from_profile(Arc::clone(&trial.player));
                    let (turns, hp_lost) = fight(&mut player, monster, rng);
                    tally.record(index, turns, hp_lost);
                }
            }
        }
        TrialMode::Gauntlet => {
            for _ in 0..samples {
                let mut player = CombatEntity::from_profile(Arc::clone(&trial.player));
                for (index, monster) in trial.monsters.iter().enumerate() {
                    let (turns, hp_lost) = fight(&mut player, monster, rng);
                    tally.record(index, turns, hp_lost);
                }
            }
        }
    }
    tally
}

/// One battle against a fresh monster. Returns rounds and the player's health lost.
fn fight(player: &mut CombatEntity, monster: &MonsterProfile, rng: &mut Rng) -> (u32, u32) {
    player.reset_working_profile();
    let starting_hp = player.cur_hp;
    let mut foe = CombatEntity::from_profile(Arc::clone(&monster.stats));
    let turns = resolve_battle(player, &mut foe, rng);
    (turns, starting_hp - player.cur_hp)
}
