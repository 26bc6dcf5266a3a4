use std::sync::Arc;

use serde::Serialize;

use crate::combat::effect::{Effect, EffectTimers};
use crate::combat::skill::Skill;
use crate::combat::stats::StatProfile;

/// Live battle state for one participant.
///
/// `stats` is the working profile and may be swapped between battles; `base_stats`
/// is the template the entity was created from and is never replaced. Health and
/// resource should only be changed by the turn resolver.
#[derive(Debug, Clone, Serialize)]
pub struct CombatEntity {
    pub stats: Arc<StatProfile>,
    pub base_stats: Arc<StatProfile>,
    pub cur_hp: u32,
    pub cur_mp: u32,
    pub effects: EffectTimers,
}

impl CombatEntity {
    /// The only way to get an entity with fresh health and resource.
    pub fn from_profile(profile: Arc<StatProfile>) -> Self {
        Self {
            cur_hp: profile.max_hp,
            cur_mp: profile.max_mp,
            stats: Arc::clone(&profile),
            base_stats: profile,
            effects: EffectTimers::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.cur_hp > 0
    }

    pub fn can_afford(&self, skill: &Skill) -> bool {
        self.cur_mp >= skill.cost
    }

    pub fn has_effect(&self, effect: Effect) -> bool {
        self.effects.is_active(effect)
    }

    /// Swap the working profile back to the base template. Health and resource are untouched.
    pub fn reset_working_profile(&mut self) {
        self.stats = Arc::clone(&self.base_stats);
    }

    /// Subtract up to `amount` health, flooring at zero. Returns what was actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.cur_hp);
        self.cur_hp -= dealt;
        dealt
    }

    /// Pay a resource cost, flooring at zero. Not re-validated against affordability.
    pub fn spend_resource(&mut self, cost: u32) {
        self.cur_mp = self.cur_mp.saturating_sub(cost);
    }
}
