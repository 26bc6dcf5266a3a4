//! Skills: the actions an entity can take on its turn.
//!
//! A skill is shared, immutable data. All battle state lives on the entities an
//! [Engagement] borrows, so one `Arc<Skill>` can sit in any number of kits.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::combat::effect::Effect;
use crate::combat::entity::CombatEntity;
use crate::combat::rng::Rng;
use crate::combat::stats::DamageSchool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkillKind {
    /// Randomized hit. `power` is carried but does not enter the damage formula.
    Damage { power: u32 },
    /// Puts `effect` on the target for `duration` of the target's own turns.
    Inflict { effect: Effect, duration: u32 },
    /// Forwards to `inner` when a 1..=100 roll is at most `bias`.
    CoinFlip { bias: u32, inner: Arc<Skill> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub school: DamageSchool,
    pub cost: u32,
    #[serde(flatten)]
    pub kind: SkillKind,
}

/// Which side of an [Engagement] a skill lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSide {
    Opponent,
    Actor,
}

/// The acting entity, its opponent, and who the current action hits.
///
/// Holding both sides lets a confused actor target itself without two live
/// mutable borrows of the same entity.
#[derive(Debug)]
pub struct Engagement<'a> {
    pub actor: &'a mut CombatEntity,
    pub opponent: &'a mut CombatEntity,
    pub side: TargetSide,
}

impl<'a> Engagement<'a> {
    pub fn new(
        actor: &'a mut CombatEntity,
        opponent: &'a mut CombatEntity,
        side: TargetSide,
    ) -> Self {
        Self { actor, opponent, side }
    }

    pub fn source(&self) -> &CombatEntity {
        &*self.actor
    }

    pub fn target(&self) -> &CombatEntity {
        match self.side {
            TargetSide::Opponent => &*self.opponent,
            TargetSide::Actor => &*self.actor,
        }
    }

    pub fn target_mut(&mut self) -> &mut CombatEntity {
        match self.side {
            TargetSide::Opponent => &mut *self.opponent,
            TargetSide::Actor => &mut *self.actor,
        }
    }
}

impl Skill {
    pub fn damage(name: impl Into<String>, school: DamageSchool, cost: u32, power: u32) -> Self {
        Self {
            name: name.into(),
            school,
            cost,
            kind: SkillKind::Damage { power },
        }
    }

    pub fn inflict(
        name: impl Into<String>,
        school: DamageSchool,
        cost: u32,
        effect: Effect,
        duration: u32,
    ) -> Self {
        Self {
            name: name.into(),
            school,
            cost,
            kind: SkillKind::Inflict { effect, duration },
        }
    }

    /// Wrap `inner` behind a percentile roll. The wrapper's own `cost` is what gets paid.
    pub fn coin_flip(
        name: impl Into<String>,
        school: DamageSchool,
        cost: u32,
        bias: u32,
        inner: Arc<Skill>,
    ) -> Self {
        Self {
            name: name.into(),
            school,
            cost,
            kind: SkillKind::CoinFlip { bias, inner },
        }
    }

    /// Affordability only; no variant overrides it today.
    pub fn can_use(&self, engagement: &Engagement<'_>) -> bool {
        engagement.source().can_afford(self)
    }

    /// Resolve this skill against the engagement's current target. Returns damage dealt
    /// (0 for anything that does not hit health). Does not pay the cost.
    pub fn apply(&self, engagement: &mut Engagement<'_>, rng: &mut Rng) -> u32 {
        match &self.kind {
            SkillKind::Damage { .. } => {
                let damage = roll_damage(
                    engagement.source(),
                    engagement.target(),
                    self.school,
                    rng,
                );
                engagement.target_mut().take_damage(damage);
                damage
            }
            SkillKind::Inflict { effect, duration } => {
                engagement.target_mut().effects.refresh(*effect, *duration);
                0
            }
            SkillKind::CoinFlip { bias, inner } => {
                if rng.percentile() <= *bias {
                    inner.apply(engagement, rng)
                } else {
                    0
                }
            }
        }
    }
}

/// `max(1, offense - defense / 2)` for the school, then a uniform ±10% spread (at least ±1),
/// clamped to `1..=u32::MAX`.
pub fn roll_damage(
    attacker: &CombatEntity,
    defender: &CombatEntity,
    school: DamageSchool,
    rng: &mut Rng,
) -> u32 {
    let offense = i64::from(attacker.stats.offense(school));
    let defense = i64::from(defender.stats.defense(school));
    let base = (offense - defense / 2).max(1);
    let variance = (base / 10).max(1);
    let draw = rng.range_inclusive(base - variance, base + variance);
    u32::try_from(draw.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::stats::{SkillKit, StatProfile};

    fn entity(watk: u32, wdef: u32, hp: u32, mp: u32) -> CombatEntity {
        let strike = Arc::new(Skill::damage("STRIKE", DamageSchool::Physical, 0, 10));
        CombatEntity::from_profile(Arc::new(StatProfile::new(
            watk,
            wdef,
            watk,
            wdef,
            hp,
            mp,
            SkillKit::single(strike),
        )))
    }

    #[test]
    fn damage_stays_within_variance_band() {
        let attacker = entity(50, 0, 10, 0);
        let defender = entity(0, 20, 10, 0);
        let mut rng = Rng::new(9);
        // base = 50 - 10 = 40, variance = 4
        for _ in 0..2_000 {
            let dmg = roll_damage(&attacker, &defender, DamageSchool::Physical, &mut rng);
            assert!((36..=44).contains(&dmg), "damage {dmg} outside band");
        }
    }

    #[test]
    fn damage_is_never_below_one() {
        let attacker = entity(0, 0, 10, 0);
        let defender = entity(0, 200, 10, 0);
        let mut rng = Rng::new(1);
        for _ in 0..2_000 {
            assert!(roll_damage(&attacker, &defender, DamageSchool::Magic, &mut rng) >= 1);
        }
    }

    #[test]
    fn huge_offense_saturates_instead_of_wrapping() {
        let attacker = entity(u32::MAX, 0, 10, 0);
        let defender = entity(0, 0, 10, 0);
        let mut rng = Rng::new(1);
        // base = u32::MAX, variance = u32::MAX / 10; the upper half of the band is clamped
        let floor = u32::MAX - u32::MAX / 10;
        let mut saturated = 0;
        for _ in 0..1_000 {
            let dmg = roll_damage(&attacker, &defender, DamageSchool::Physical, &mut rng);
            assert!(dmg >= floor, "damage {dmg} wrapped below {floor}");
            if dmg == u32::MAX {
                saturated += 1;
            }
        }
        assert!(saturated > 0);
    }

    #[test]
    fn damage_skill_lowers_target_health() {
        let mut actor = entity(2, 0, 10, 0);
        let mut opponent = entity(0, 0, 4, 0);
        let skill = Skill::damage("STRIKE", DamageSchool::Physical, 0, 10);
        let mut rng = Rng::new(3);
        let mut engagement = Engagement::new(&mut actor, &mut opponent, TargetSide::Opponent);
        let dealt = skill.apply(&mut engagement, &mut rng);
        assert!((1..=3).contains(&dealt));
        assert_eq!(opponent.cur_hp, 4 - dealt);
        assert_eq!(actor.cur_hp, 10);
    }

    #[test]
    fn self_targeted_damage_hits_the_actor() {
        let mut actor = entity(4, 0, 10, 0);
        let mut opponent = entity(0, 0, 10, 0);
        let skill = Skill::damage("STRIKE", DamageSchool::Physical, 0, 10);
        let mut rng = Rng::new(4);
        let mut engagement = Engagement::new(&mut actor, &mut opponent, TargetSide::Actor);
        let dealt = skill.apply(&mut engagement, &mut rng);
        assert_eq!(actor.cur_hp, 10 - dealt);
        assert_eq!(opponent.cur_hp, 10);
    }

    #[test]
    fn inflict_refreshes_without_stacking() {
        let mut actor = entity(1, 1, 10, 10);
        let mut opponent = entity(1, 1, 10, 10);
        opponent.effects.refresh(Effect::Confusion, 3);
        let skill = Skill::inflict("HEX", DamageSchool::Magic, 3, Effect::Confusion, 2);
        let mut rng = Rng::new(5);
        let mut engagement = Engagement::new(&mut actor, &mut opponent, TargetSide::Opponent);
        assert_eq!(skill.apply(&mut engagement, &mut rng), 0);
        assert_eq!(opponent.effects.remaining(Effect::Confusion), 3);
        // the source pays, not the target, and apply alone pays nothing
        assert_eq!(opponent.cur_mp, 10);
        assert_eq!(actor.cur_mp, 10);
    }

    #[test]
    fn coin_flip_bias_hundred_always_delegates() {
        let inner = Arc::new(Skill::inflict("HEX", DamageSchool::Magic, 0, Effect::Confusion, 1));
        let wrapper = Skill::coin_flip("MAYBE HEX", DamageSchool::Magic, 0, 100, inner);
        let mut rng = Rng::new(6);
        for _ in 0..1_000 {
            let mut actor = entity(1, 1, 10, 0);
            let mut opponent = entity(1, 1, 10, 0);
            let mut engagement = Engagement::new(&mut actor, &mut opponent, TargetSide::Opponent);
            wrapper.apply(&mut engagement, &mut rng);
            assert!(opponent.has_effect(Effect::Confusion));
        }
    }

    #[test]
    fn coin_flip_bias_zero_never_delegates() {
        let inner = Arc::new(Skill::damage("STRIKE", DamageSchool::Physical, 0, 10));
        let wrapper = Skill::coin_flip("WHIFF", DamageSchool::Physical, 0, 0, inner);
        let mut rng = Rng::new(8);
        let mut actor = entity(5, 0, 10, 0);
        let mut opponent = entity(0, 0, u32::MAX, 0);
        let mut engagement = Engagement::new(&mut actor, &mut opponent, TargetSide::Opponent);
        let hits = (0..10_000)
            .filter(|_| wrapper.apply(&mut engagement, &mut rng) > 0)
            .count();
        assert_eq!(hits, 0);
        assert_eq!(opponent.cur_hp, u32::MAX);
    }

    #[test]
    fn can_use_checks_source_resource() {
        let mut actor = entity(1, 1, 10, 2);
        let mut opponent = entity(1, 1, 10, 50);
        let spell = Skill::inflict("HEX", DamageSchool::Magic, 3, Effect::Confusion, 1);
        let engagement = Engagement::new(&mut actor, &mut opponent, TargetSide::Opponent);
        assert!(!spell.can_use(&engagement));
    }
}
