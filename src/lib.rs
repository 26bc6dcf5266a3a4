//! Turn-based combat simulator for balance tuning.
//!
//! [combat] resolves single battles between two entities; [trial] runs them by the
//! hundred thousand and reports turn-count and damage-taken distributions.

pub mod cli;
pub mod combat;
pub mod data;
pub mod logging;
pub mod parallel;
pub mod trial;
