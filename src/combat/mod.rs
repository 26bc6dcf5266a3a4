pub mod battle;
pub mod effect;
pub mod entity;
pub mod rng;
pub mod skill;
pub mod stats;
pub mod turn;

pub use battle::{resolve_battle, resolve_battle_traced, BattleLog, Side, TracedTurn};
pub use effect::{Effect, EffectTimers};
pub use entity::CombatEntity;
pub use rng::Rng;
pub use skill::{roll_damage, Engagement, Skill, SkillKind, TargetSide};
pub use stats::{DamageSchool, ProfileError, SkillKit, StatProfile, DEFAULT_SKILL_DENOMINATOR};
pub use turn::{resolve_turn, select_skill, SkillChoice, TurnRecord};
