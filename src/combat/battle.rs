//! Alternating turns between two entities until one of them falls.

use serde::Serialize;

use crate::combat::entity::CombatEntity;
use crate::combat::rng::Rng;
use crate::combat::turn::{resolve_turn, TurnRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The entity that acts first each round (the player in a trial).
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TracedTurn {
    pub round: u32,
    pub side: Side,
    #[serde(flatten)]
    pub record: TurnRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleLog {
    pub turns: u32,
    /// `None` only when the battle was handed an already-fallen entity.
    pub winner: Option<Side>,
    pub events: Vec<TracedTurn>,
}

/// Run a battle to completion and return the number of rounds. A round is `a` acting, then `b`
/// acting if it is still standing. There is no round limit: two entities that cannot hurt each
/// other will loop forever.
pub fn resolve_battle(a: &mut CombatEntity, b: &mut CombatEntity, rng: &mut Rng) -> u32 {
    run_battle(a, b, rng, |_, _, _| {})
}

/// Same loop as [resolve_battle], keeping every turn.
pub fn resolve_battle_traced(
    a: &mut CombatEntity,
    b: &mut CombatEntity,
    rng: &mut Rng,
) -> BattleLog {
    let mut events = Vec::new();
    let turns = run_battle(a, b, rng, |round, side, record| {
        events.push(TracedTurn { round, side, record });
    });
    let winner = match (a.is_alive(), b.is_alive()) {
        (true, false) => Some(Side::First),
        (false, true) => Some(Side::Second),
        _ => None,
    };
    BattleLog { turns, winner, events }
}

fn run_battle<F>(a: &mut CombatEntity, b: &mut CombatEntity, rng: &mut Rng, mut on_turn: F) -> u32
where
    F: FnMut(u32, Side, TurnRecord),
{
    let mut rounds = 0u32;
    while a.is_alive() && b.is_alive() {
        let round = rounds + 1;
        let record = resolve_turn(a, b, rng);
        on_turn(round, Side::First, record);
        if b.is_alive() {
            let record = resolve_turn(b, a, rng);
            on_turn(round, Side::Second, record);
        }
        rounds = round;
    }
    tracing::trace!(rounds, first_hp = a.cur_hp, second_hp = b.cur_hp, "battle concluded");
    rounds
}
