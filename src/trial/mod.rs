//! Monte Carlo trials: run a battle many times per monster and collect outcome distributions.

pub mod histogram;
pub mod report;
pub mod runner;

pub use histogram::Histogram;
pub use report::{describe_profile, render_json, render_text};
pub use runner::{
    run_trial, run_trial_parallel, CombatTrial, MonsterOutcome, TrialMode, TrialReport,
    DEFAULT_SAMPLE_SIZE, PARALLEL_BATCH_COUNT,
};
