pub mod catalog;
pub mod loader;

use std::sync::Arc;

use serde::Serialize;

use crate::combat::StatProfile;

pub use loader::{load_scenario, parse_scenario, DataError, Scenario, ScenarioFormat};

/// A named monster preset. `exp` is reported but plays no part in combat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonsterProfile {
    pub name: String,
    pub exp: u32,
    pub stats: Arc<StatProfile>,
}
