//! One entity's action: target pick, weighted skill lottery, apply, pay, tick.

use std::sync::Arc;

use serde::Serialize;

use crate::combat::effect::Effect;
use crate::combat::entity::CombatEntity;
use crate::combat::rng::Rng;
use crate::combat::skill::{Engagement, Skill, TargetSide};
use crate::combat::stats::SkillKit;

/// What happened on a single turn, as seen after all five steps ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub skill: String,
    pub target: TargetSide,
    pub damage: u32,
    /// True when no skill won the lottery and the first skill was taken regardless of cost.
    pub fallback: bool,
    pub actor_hp: u32,
    pub actor_mp: u32,
    pub opponent_hp: u32,
}

/// Outcome of the weighted walk: the chosen index and whether it was the last-resort default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillChoice {
    pub index: usize,
    pub fallback: bool,
}

/// Walk skills and weights together. A skill is taken when `choice <= weight` and it is usable;
/// otherwise its weight is subtracted and the walk continues. Once `choice` drops to zero or below,
/// the next usable skill wins. If nothing qualifies, index 0 is returned even if unusable.
pub fn select_skill<F>(kit: &SkillKit, mut usable: F, choice: u32) -> SkillChoice
where
    F: FnMut(&Skill) -> bool,
{
    let mut remaining = i64::from(choice);
    for (index, (skill, weight)) in kit.entries().enumerate() {
        let weight = i64::from(weight);
        if remaining <= weight && usable(skill) {
            return SkillChoice {
                index,
                fallback: false,
            };
        }
        remaining -= weight;
    }
    SkillChoice {
        index: 0,
        fallback: true,
    }
}

/// Run one turn for `actor` against `opponent`. Every step mutates shared state in order:
/// target, skill, apply, cost, then the actor's own effect timers.
pub fn resolve_turn(
    actor: &mut CombatEntity,
    opponent: &mut CombatEntity,
    rng: &mut Rng,
) -> TurnRecord {
    let side = if actor.has_effect(Effect::Confusion) && rng.coin_flip() {
        TargetSide::Actor
    } else {
        TargetSide::Opponent
    };

    // Held separately so the kit outlives borrows of the entity.
    let profile = Arc::clone(&actor.stats);
    let kit = &profile.kit;

    let mut engagement = Engagement::new(actor, opponent, side);
    let choice = rng.range_inclusive(1, i64::from(kit.denominator)) as u32;
    let picked = select_skill(kit, |skill| skill.can_use(&engagement), choice);
    let skill = &kit.skills[picked.index];

    if picked.fallback && !skill.can_use(&engagement) {
        tracing::trace!(
            skill = %skill.name,
            cost = skill.cost,
            mp = engagement.source().cur_mp,
            "fallback picked an unaffordable skill"
        );
    }

    let damage = skill.apply(&mut engagement, rng);

    let actor = engagement.actor;
    let opponent = engagement.opponent;
    actor.spend_resource(skill.cost);
    actor.effects.tick();

    TurnRecord {
        skill: skill.name.clone(),
        target: side,
        damage,
        fallback: picked.fallback,
        actor_hp: actor.cur_hp,
        actor_mp: actor.cur_mp,
        opponent_hp: opponent.cur_hp,
    }
}
