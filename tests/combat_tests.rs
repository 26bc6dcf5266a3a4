use std::sync::Arc;

use blu::combat::{
    resolve_battle, resolve_battle_traced, resolve_turn, roll_damage, CombatEntity, DamageSchool,
    Effect, Rng, Side, Skill, SkillKit, StatProfile, TargetSide,
};
use blu::data::catalog;

fn strike(name: &str) -> Arc<Skill> {
    Arc::new(Skill::damage(name, DamageSchool::Physical, 0, 10))
}

fn profile(watk: u32, wdef: u32, hp: u32, mp: u32, kit: SkillKit) -> Arc<StatProfile> {
    Arc::new(StatProfile::new(watk, wdef, watk, wdef, hp, mp, kit))
}

#[test]
fn damage_is_at_least_one_across_stat_grid() {
    let mut rng = Rng::new(31);
    for atk in [0u32, 1, 2, 5, 30, 250] {
        for def in [0u32, 1, 3, 60, 999] {
            let a = CombatEntity::from_profile(profile(atk, 0, 10, 0, catalog::default_kit()));
            let d = CombatEntity::from_profile(profile(0, def, 10, 0, catalog::default_kit()));
            for school in [DamageSchool::Physical, DamageSchool::Magic] {
                for _ in 0..50 {
                    let dmg = roll_damage(&a, &d, school, &mut rng);
                    assert!(dmg >= 1, "atk={atk} def={def} dealt {dmg}");
                }
            }
        }
    }
}

#[test]
fn reference_player_hits_bat_for_one_to_three() {
    let player = CombatEntity::from_profile(catalog::level_one_player());
    let bat = CombatEntity::from_profile(catalog::bat().stats);
    let mut rng = Rng::new(8);
    let mut seen = [false; 4];
    for _ in 0..5_000 {
        let dmg = roll_damage(&player, &bat, DamageSchool::Physical, &mut rng);
        assert!((1..=3).contains(&dmg));
        seen[dmg as usize] = true;
    }
    assert!(seen[1] && seen[2] && seen[3]);
}

#[test]
fn weighted_selection_converges_to_configured_distribution() {
    let kit = SkillKit::weighted([(strike("A"), 75), (strike("B"), 25)]);
    let actor_profile = profile(0, 0, u32::MAX, 0, kit);
    let dummy = profile(0, u32::MAX / 2, u32::MAX, 0, catalog::default_kit());
    let mut actor = CombatEntity::from_profile(actor_profile);
    let mut target = CombatEntity::from_profile(dummy);
    let mut rng = Rng::new(2024);

    let draws = 100_000;
    let picked_a = (0..draws)
        .filter(|_| resolve_turn(&mut actor, &mut target, &mut rng).skill == "A")
        .count();
    let share = picked_a as f64 / draws as f64 * 100.0;
    assert!((share - 75.0).abs() <= 1.0, "A picked {share:.2}% of the time");
}

#[test]
fn confusion_self_targeting_is_a_fair_coin_only_while_active() {
    let kit = SkillKit::single(strike("A"));
    let mut actor = CombatEntity::from_profile(profile(1, 0, u32::MAX, 0, kit.clone()));
    let mut target = CombatEntity::from_profile(profile(1, 0, u32::MAX, 0, kit));
    let mut rng = Rng::new(55);

    let mut self_hits = 0u32;
    for _ in 0..20_000 {
        actor.effects.refresh(Effect::Confusion, 1);
        if resolve_turn(&mut actor, &mut target, &mut rng).target == TargetSide::Actor {
            self_hits += 1;
        }
    }
    let share = f64::from(self_hits) / 20_000.0;
    assert!((share - 0.5).abs() < 0.02, "self-target share {share}");

    for _ in 0..5_000 {
        assert_eq!(resolve_turn(&mut actor, &mut target, &mut rng).target, TargetSide::Opponent);
    }
}

#[test]
fn status_lasts_exactly_its_duration_in_owner_turns() {
    let lasting = Arc::new(Skill::inflict("DAZE", DamageSchool::Magic, 0, Effect::Confusion, 3));
    let caster = profile(0, 0, u32::MAX, 0, SkillKit::single(lasting));
    let victim_profile = profile(0, 0, u32::MAX, 0, SkillKit::single(strike("A")));
    let mut caster = CombatEntity::from_profile(caster);
    let mut victim = CombatEntity::from_profile(victim_profile);
    let mut rng = Rng::new(3);

    resolve_turn(&mut caster, &mut victim, &mut rng);
    assert_eq!(victim.effects.remaining(Effect::Confusion), 3);

    for expected in [2, 1] {
        resolve_turn(&mut victim, &mut caster, &mut rng);
        assert_eq!(victim.effects.remaining(Effect::Confusion), expected);
    }
    resolve_turn(&mut victim, &mut caster, &mut rng);
    assert!(victim.effects.is_empty(), "expired effect must be gone");
}

#[test]
fn coin_flip_wrapper_cost_is_paid_even_when_it_whiffs() {
    let wrapper = Arc::new(Skill::coin_flip(
        "LONG SHOT",
        DamageSchool::Physical,
        2,
        0,
        strike("A"),
    ));
    let shooter = profile(50, 0, 10, 10, SkillKit::single(wrapper));
    let mut shooter = CombatEntity::from_profile(shooter);
    let mut target = CombatEntity::from_profile(profile(0, 0, 10, 0, catalog::default_kit()));
    let mut rng = Rng::new(17);

    let record = resolve_turn(&mut shooter, &mut target, &mut rng);
    assert_eq!(record.damage, 0);
    assert_eq!(target.cur_hp, 10);
    assert_eq!(shooter.cur_mp, 8);
}

#[test]
fn bat_confuse_is_paid_by_bat_and_lands_on_player() {
    let confuse_only = catalog::bat()
        .stats
        .as_ref()
        .clone()
        .with_kit(SkillKit::single(catalog::confuse()));
    let mut bat = CombatEntity::from_profile(Arc::new(confuse_only));
    let mut player = CombatEntity::from_profile(catalog::level_one_player());
    let mut rng = Rng::new(1);

    resolve_turn(&mut bat, &mut player, &mut rng);
    assert_eq!(bat.cur_mp, 3);
    assert_eq!(player.cur_mp, 10);
    assert!(player.has_effect(Effect::Confusion));

    resolve_turn(&mut bat, &mut player, &mut rng);
    // out of resource: the fallback still casts, floored at zero
    let record = resolve_turn(&mut bat, &mut player, &mut rng);
    assert!(record.fallback);
    assert_eq!(bat.cur_mp, 0);
}

#[test]
fn battles_end_with_one_side_down_and_clamped_values() {
    let mut rng = Rng::new(404);
    for _ in 0..2_000 {
        let mut player = CombatEntity::from_profile(catalog::level_one_player());
        let mut bat = CombatEntity::from_profile(catalog::bat().stats);
        let log = resolve_battle_traced(&mut player, &mut bat, &mut rng);
        assert!(log.turns >= 1);
        assert!(player.is_alive() ^ bat.is_alive());
        assert!(log.winner.is_some());
        for event in &log.events {
            assert!(event.record.actor_hp <= 10);
            assert!(event.record.actor_mp <= 10);
        }
        assert!(player.cur_hp <= 10 && bat.cur_hp <= 4);
    }
}

#[test]
fn player_always_needs_at_least_two_rounds_against_bat() {
    let mut rng = Rng::new(9);
    for _ in 0..5_000 {
        let mut player = CombatEntity::from_profile(catalog::level_one_player());
        let mut bat = CombatEntity::from_profile(catalog::bat().stats);
        assert!(resolve_battle(&mut player, &mut bat, &mut rng) >= 2);
    }
}

#[test]
fn trace_records_alternate_sides_within_a_round() {
    let mut player = CombatEntity::from_profile(catalog::level_one_player());
    let mut bat = CombatEntity::from_profile(catalog::bat().stats);
    let log = resolve_battle_traced(&mut player, &mut bat, &mut Rng::new(12));
    for pair in log.events.chunks(2) {
        assert_eq!(pair[0].side, Side::First);
        if let Some(second) = pair.get(1) {
            assert_eq!(second.side, Side::Second);
            assert_eq!(second.round, pair[0].round);
        }
    }
}
