use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Status conditions an entity can carry. Keys only; the duration lives in [EffectTimers].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    Confusion,
}

/// Remaining turns per active effect. An absent key means inactive; zero is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectTimers {
    remaining: BTreeMap<Effect, u32>,
}

impl EffectTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self, effect: Effect) -> u32 {
        self.remaining.get(&effect).copied().unwrap_or(0)
    }

    pub fn is_active(&self, effect: Effect) -> bool {
        self.remaining(effect) > 0
    }

    /// Set the timer to `max(current, turns)`. Durations refresh, they never stack.
    pub fn refresh(&mut self, effect: Effect, turns: u32) {
        if turns == 0 {
            return;
        }
        let slot = self.remaining.entry(effect).or_insert(0);
        *slot = (*slot).max(turns);
    }

    /// Count every timer down by one and drop the ones that reach zero.
    pub fn tick(&mut self) {
        self.remaining.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Effect, u32)> + '_ {
        self.remaining.iter().map(|(effect, turns)| (*effect, *turns))
    }
}
