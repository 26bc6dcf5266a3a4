//! Stat profiles: the immutable template an entity is built from.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::skill::Skill;

/// Weights are expressed on a 100-point scale unless a kit says otherwise.
pub const DEFAULT_SKILL_DENOMINATOR: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageSchool {
    Physical,
    Magic,
}

/// Skills a profile can pick from plus their parallel lottery weights.
///
/// Weights are not required to sum to `denominator`. Any draw past the last
/// weight falls through to the first skill (see [crate::combat::turn::select_skill]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillKit {
    pub skills: Vec<Arc<Skill>>,
    pub distribution: Vec<u32>,
    #[serde(default = "default_denominator")]
    pub denominator: u32,
}

fn default_denominator() -> u32 {
    DEFAULT_SKILL_DENOMINATOR
}

impl SkillKit {
    /// A kit that always picks `skill`.
    pub fn single(skill: Arc<Skill>) -> Self {
        Self {
            skills: vec![skill],
            distribution: vec![DEFAULT_SKILL_DENOMINATOR],
            denominator: DEFAULT_SKILL_DENOMINATOR,
        }
    }

    /// Build from `(skill, weight)` pairs on the default 100-point scale.
    pub fn weighted<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Arc<Skill>, u32)>,
    {
        let (skills, distribution) = entries.into_iter().unzip();
        Self {
            skills,
            distribution,
            denominator: DEFAULT_SKILL_DENOMINATOR,
        }
    }

    pub fn with_denominator(mut self, denominator: u32) -> Self {
        self.denominator = denominator;
        self
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Arc<Skill>, u32)> + '_ {
        self.skills.iter().zip(self.distribution.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("skill list has {skills} entries but distribution has {weights}")]
    LengthMismatch { skills: usize, weights: usize },
    #[error("profile has no skills")]
    EmptyKit,
    #[error("skill distribution denominator must be positive")]
    ZeroDenominator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatProfile {
    pub watk: u32,
    pub wdef: u32,
    pub matk: u32,
    pub mdef: u32,
    pub max_hp: u32,
    pub max_mp: u32,
    pub kit: SkillKit,
}

impl StatProfile {
    pub fn new(
        watk: u32,
        wdef: u32,
        matk: u32,
        mdef: u32,
        max_hp: u32,
        max_mp: u32,
        kit: SkillKit,
    ) -> Self {
        Self {
            watk,
            wdef,
            matk,
            mdef,
            max_hp,
            max_mp,
            kit,
        }
    }

    /// Replace the kit. The profile owns its own vectors; only the skills themselves are shared.
    pub fn with_kit(mut self, kit: SkillKit) -> Self {
        self.kit = kit;
        self
    }

    pub const fn offense(&self, school: DamageSchool) -> u32 {
        match school {
            DamageSchool::Physical => self.watk,
            DamageSchool::Magic => self.matk,
        }
    }

    pub const fn defense(&self, school: DamageSchool) -> u32 {
        match school {
            DamageSchool::Physical => self.wdef,
            DamageSchool::Magic => self.mdef,
        }
    }

    /// Structural checks for profiles coming from outside the crate. The engine itself never
    /// calls this.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.kit.skills.len() != self.kit.distribution.len() {
            return Err(ProfileError::LengthMismatch {
                skills: self.kit.skills.len(),
                weights: self.kit.distribution.len(),
            });
        }
        if self.kit.is_empty() {
            return Err(ProfileError::EmptyKit);
        }
        if self.kit.denominator == 0 {
            return Err(ProfileError::ZeroDenominator);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::skill::Skill;

    fn strike() -> Arc<Skill> {
        Arc::new(Skill::damage("STRIKE", DamageSchool::Physical, 0, 10))
    }

    #[test]
    fn offense_and_defense_follow_school() {
        let profile = StatProfile::new(5, 4, 3, 2, 10, 10, SkillKit::single(strike()));
        assert_eq!(profile.offense(DamageSchool::Physical), 5);
        assert_eq!(profile.defense(DamageSchool::Physical), 4);
        assert_eq!(profile.offense(DamageSchool::Magic), 3);
        assert_eq!(profile.defense(DamageSchool::Magic), 2);
    }

    #[test]
    fn validate_rejects_mismatched_lengths() {
        let mut kit = SkillKit::single(strike());
        kit.distribution.push(10);
        let profile = StatProfile::new(1, 1, 1, 1, 1, 1, kit);
        assert_eq!(
            profile.validate(),
            Err(ProfileError::LengthMismatch { skills: 1, weights: 2 })
        );
    }

    #[test]
    fn validate_rejects_empty_kit_and_zero_denominator() {
        let empty = StatProfile::new(1, 1, 1, 1, 1, 1, SkillKit::weighted(Vec::new()));
        assert_eq!(empty.validate(), Err(ProfileError::EmptyKit));

        let kit = SkillKit::single(strike()).with_denominator(0);
        let zero = StatProfile::new(1, 1, 1, 1, 1, 1, kit);
        assert_eq!(zero.validate(), Err(ProfileError::ZeroDenominator));
    }

    #[test]
    fn profiles_do_not_alias_kits() {
        let base = StatProfile::new(1, 1, 1, 1, 1, 1, SkillKit::single(strike()));
        let mut other = base.clone();
        other.kit.distribution[0] = 40;
        assert_eq!(base.kit.distribution, vec![100]);
    }
}
