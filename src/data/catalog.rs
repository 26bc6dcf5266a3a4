//! Built-in skill and stat presets.
//!
//! Skills are defined first and handed to profiles explicitly; nothing here
//! depends on initialization order.

use std::sync::Arc;

use serde::Serialize;

use crate::combat::{DamageSchool, Effect, Skill, SkillKit, StatProfile};
use crate::data::MonsterProfile;

pub const ATTACK_NAME: &str = "ATTACK";
pub const CONFUSE_NAME: &str = "CONFUSE";

/// Plain physical hit. Free to use.
pub fn attack() -> Arc<Skill> {
    Arc::new(Skill::damage(ATTACK_NAME, DamageSchool::Physical, 0, 10))
}

/// Confuses the target for its next turn.
pub fn confuse() -> Arc<Skill> {
    Arc::new(Skill::inflict(
        CONFUSE_NAME,
        DamageSchool::Magic,
        3,
        Effect::Confusion,
        1,
    ))
}

pub fn skills() -> Vec<Arc<Skill>> {
    vec![attack(), confuse()]
}

pub fn find_skill(name: &str) -> Option<Arc<Skill>> {
    skills()
        .into_iter()
        .find(|skill| skill.name.eq_ignore_ascii_case(name))
}

/// Kit used by profiles that do not declare one: always attack.
pub fn default_kit() -> SkillKit {
    SkillKit::single(attack())
}

/// Level-one player.
pub fn level_one_player() -> Arc<StatProfile> {
    Arc::new(StatProfile::new(2, 1, 1, 1, 10, 10, default_kit()))
}

pub fn bat() -> MonsterProfile {
    MonsterProfile {
        name: "BAT".to_string(),
        exp: 2,
        stats: Arc::new(StatProfile::new(
            1,
            0,
            0,
            0,
            4,
            6,
            SkillKit::weighted([(attack(), 75), (confuse(), 25)]),
        )),
    }
}

pub fn monsters() -> Vec<MonsterProfile> {
    vec![bat()]
}

pub fn find_monster(name: &str) -> Option<MonsterProfile> {
    monsters()
        .into_iter()
        .find(|monster| monster.name.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub skills: Vec<Arc<Skill>>,
    pub monsters: Vec<MonsterProfile>,
    pub player: Arc<StatProfile>,
}

pub fn listing() -> CatalogListing {
    CatalogListing {
        skills: skills(),
        monsters: monsters(),
        player: level_one_player(),
    }
}
