//! Scenario files: custom skills, a player profile and a monster lineup, in JSON or YAML.
//!
//! Skill references resolve against skills declared earlier in the file, then against the
//! built-in catalog. Every profile is validated before it is handed to the engine.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::combat::{
    DamageSchool, Effect, ProfileError, Skill, SkillKit, StatProfile, DEFAULT_SKILL_DENOMINATOR,
};
use crate::data::{catalog, MonsterProfile};
use crate::trial::TrialMode;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read scenario file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported scenario extension '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
    #[error("skill '{name}' is declared more than once")]
    DuplicateSkill { name: String },
    #[error("'{owner}' references unknown skill '{name}'")]
    UnknownSkill { owner: String, name: String },
    #[error("skill '{name}' has bias {bias}; expected 0..=100")]
    InvalidBias { name: String, bias: u32 },
    #[error("invalid profile for '{owner}': {source}")]
    InvalidProfile {
        owner: String,
        #[source]
        source: ProfileError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Json,
    Yaml,
}

impl ScenarioFormat {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(DataError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A fully resolved scenario, ready to become a [crate::trial::CombatTrial].
#[derive(Debug, Clone)]
pub struct Scenario {
    pub player: Arc<StatProfile>,
    pub monsters: Vec<MonsterProfile>,
    pub sample_size: Option<usize>,
    pub seed: Option<u64>,
    pub mode: Option<TrialMode>,
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    skills: Vec<SkillEntry>,
    player: ProfileEntry,
    #[serde(default)]
    monsters: Vec<MonsterEntry>,
    #[serde(default)]
    sample_size: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    mode: Option<TrialMode>,
}

#[derive(Debug, Deserialize)]
struct SkillEntry {
    name: String,
    school: DamageSchool,
    #[serde(default)]
    cost: u32,
    #[serde(flatten)]
    kind: SkillEntryKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SkillEntryKind {
    Damage {
        #[serde(default)]
        power: u32,
    },
    Inflict {
        effect: Effect,
        duration: u32,
    },
    CoinFlip {
        bias: u32,
        inner: String,
    },
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    watk: u32,
    wdef: u32,
    matk: u32,
    mdef: u32,
    max_hp: u32,
    max_mp: u32,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    distribution: Vec<u32>,
    #[serde(default = "default_denominator")]
    denominator: u32,
}

fn default_denominator() -> u32 {
    DEFAULT_SKILL_DENOMINATOR
}

#[derive(Debug, Deserialize)]
struct MonsterEntry {
    name: String,
    #[serde(default)]
    exp: u32,
    #[serde(flatten)]
    stats: ProfileEntry,
}

/// Read and resolve a scenario file. The format follows the file extension.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario, DataError> {
    let path = path.as_ref();
    let format = ScenarioFormat::from_path(path)?;
    let raw = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let scenario = parse_scenario(&raw, format)?;
    tracing::debug!(
        path = %path.display(),
        monsters = scenario.monsters.len(),
        "scenario loaded"
    );
    Ok(scenario)
}

pub fn parse_scenario(raw: &str, format: ScenarioFormat) -> Result<Scenario, DataError> {
    let file: ScenarioFile = match format {
        ScenarioFormat::Json => serde_json::from_str(raw)?,
        ScenarioFormat::Yaml => serde_yaml::from_str(raw)?,
    };
    resolve(file)
}

fn resolve(file: ScenarioFile) -> Result<Scenario, DataError> {
    let registry = build_skill_registry(file.skills)?;

    let player = Arc::new(build_profile("player", file.player, &registry)?);
    let monsters = file
        .monsters
        .into_iter()
        .map(|entry| {
            let stats = build_profile(&entry.name, entry.stats, &registry)?;
            Ok(MonsterProfile {
                name: entry.name,
                exp: entry.exp,
                stats: Arc::new(stats),
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    Ok(Scenario {
        player,
        monsters,
        sample_size: file.sample_size,
        seed: file.seed,
        mode: file.mode,
    })
}

struct SkillRegistry {
    declared: HashMap<String, Arc<Skill>>,
}

impl SkillRegistry {
    fn lookup(&self, owner: &str, name: &str) -> Result<Arc<Skill>, DataError> {
        self.declared
            .get(&normalize_skill_name(name))
            .cloned()
            .or_else(|| catalog::find_skill(name))
            .ok_or_else(|| DataError::UnknownSkill {
                owner: owner.to_string(),
                name: name.to_string(),
            })
    }
}

fn normalize_skill_name(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

fn build_skill_registry(entries: Vec<SkillEntry>) -> Result<SkillRegistry, DataError> {
    let mut registry = SkillRegistry {
        declared: HashMap::new(),
    };
    for entry in entries {
        let key = normalize_skill_name(&entry.name);
        if registry.declared.contains_key(&key) {
            return Err(DataError::DuplicateSkill { name: entry.name });
        }
        let skill = match entry.kind {
            SkillEntryKind::Damage { power } => {
                Skill::damage(entry.name, entry.school, entry.cost, power)
            }
            SkillEntryKind::Inflict { effect, duration } => {
                Skill::inflict(entry.name, entry.school, entry.cost, effect, duration)
            }
            SkillEntryKind::CoinFlip { bias, inner } => {
                if bias > 100 {
                    return Err(DataError::InvalidBias { name: entry.name, bias });
                }
                let inner = registry.lookup(&entry.name, &inner)?;
                Skill::coin_flip(entry.name, entry.school, entry.cost, bias, inner)
            }
        };
        registry.declared.insert(key, Arc::new(skill));
    }
    Ok(registry)
}

fn build_profile(
    owner: &str,
    entry: ProfileEntry,
    registry: &SkillRegistry,
) -> Result<StatProfile, DataError> {
    let kit = if entry.skills.is_empty() && entry.distribution.is_empty() {
        catalog::default_kit()
    } else {
        let skills = entry
            .skills
            .iter()
            .map(|name| registry.lookup(owner, name))
            .collect::<Result<Vec<_>, _>>()?;
        SkillKit {
            skills,
            distribution: entry.distribution,
            denominator: entry.denominator,
        }
    };
    let profile = StatProfile::new(
        entry.watk,
        entry.wdef,
        entry.matk,
        entry.mdef,
        entry.max_hp,
        entry.max_mp,
        kit,
    );
    profile.validate().map_err(|source| DataError::InvalidProfile {
        owner: owner.to_string(),
        source,
    })?;
    Ok(profile)
}
