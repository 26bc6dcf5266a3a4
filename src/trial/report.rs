//! Human-readable and JSON renderings of a [TrialReport].

use std::fmt::Write as _;

use crate::combat::StatProfile;
use crate::data::MonsterProfile;
use crate::trial::histogram::Histogram;
use crate::trial::runner::{CombatTrial, TrialReport};

/// One-line summary of a profile: stats then `skill:weight` pairs.
pub fn describe_profile(profile: &StatProfile) -> String {
    let kit = profile
        .kit
        .entries()
        .map(|(skill, weight)| format!("{}:{weight}", skill.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "watk={} wdef={} matk={} mdef={} max_hp={} max_mp={} skills=[{kit}]/{}",
        profile.watk,
        profile.wdef,
        profile.matk,
        profile.mdef,
        profile.max_hp,
        profile.max_mp,
        profile.kit.denominator,
    )
}

fn describe_monster(monster: &MonsterProfile) -> String {
    format!("{} (exp={}) {}", monster.name, monster.exp, describe_profile(&monster.stats))
}

fn write_histogram(out: &mut String, label: &str, prefix: &str, histogram: &Histogram, total: u64) {
    for (outcome, pct) in histogram.percentages(total) {
        let count = histogram.count(outcome);
        let _ = writeln!(out, "{label}={prefix}{outcome} {pct:.2}% ({count}/{total})");
    }
}

/// The classic report: header, then per monster the turn distribution and the health-lost
/// distribution, each line `outcome pct% (count/total)` in ascending order.
pub fn render_text(trial: &CombatTrial, report: &TrialReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Player: {}", describe_profile(&trial.player));
    let _ = writeln!(out, "VS:");
    for monster in &trial.monsters {
        let _ = writeln!(out, "{}", describe_monster(monster));
    }
    let _ = writeln!(out, "=== {} trials ===", report.sample_size);

    let total = report.sample_size as u64;
    for (index, outcome) in report.battles.iter().enumerate() {
        let _ = writeln!(out, "BATTLE #{index}\n---");
        write_histogram(&mut out, "turns", "", &outcome.turns, total);
        let _ = writeln!(out);
        write_histogram(&mut out, "hp", "-", &outcome.hp_lost, total);
        if let (Some(turns), Some(hp)) = (outcome.turns.mean(), outcome.hp_lost.mean()) {
            let _ = writeln!(out, "mean turns={turns:.2} mean hp lost={hp:.2}");
        }
        let _ = writeln!(out, "---\n");
    }
    out
}

pub fn render_json(report: &TrialReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
