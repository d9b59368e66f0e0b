//! End-to-end combat scenarios through the simulation loop.

use combat_core::combatant::Combatant;
use combat_core::hit::{apply_hit, resolve_hit};
use combat_core::prelude::*;
use combat_test_utils::fixtures::{self, px};

const LEFT_SHOULDER: MountPoint = MountPoint::new(ArmSide::Left, MountSlot::Shoulder);
const RIGHT_GRIP: MountPoint = MountPoint::new(ArmSide::Right, MountSlot::Grip);
const RIGHT_SHOULDER: MountPoint = MountPoint::new(ArmSide::Right, MountSlot::Shoulder);

fn terminal_hp<R: CombatRng>(sim: &Simulation<R>, id: EntityId) -> u32 {
    sim.combatant(id)
        .and_then(Combatant::as_simple)
        .map_or(0, |t| t.health.current)
}

fn standard_mech(id: EntityId) -> StructuredCombatant {
    StructuredCombatant::assemble(
        id,
        Faction::Player,
        px(0, 0),
        &fixtures::standard_loadout(),
        &fixtures::standard_catalog(),
        &CombatConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_min_range_rejects_without_side_effects() {
    let catalog = fixtures::standard_catalog();
    let mut sim = Simulation::with_rng(CombatConfig::default(), fixtures::always_hit());
    let mech = sim
        .add_structured(Faction::Player, px(0, 0), &fixtures::standard_loadout(), &catalog)
        .unwrap();

    // Missile pod minimum range is 3 tiles (120 px)
    let outcome = sim.request_fire(mech, RIGHT_SHOULDER, px(50, 0)).unwrap();
    assert_eq!(outcome, FireOutcome::Rejected(FireRejection::TooClose));
    assert!(sim.projectiles().is_empty());

    let slot = sim
        .combatant(mech)
        .and_then(Combatant::as_structured)
        .and_then(|m| m.mount(RIGHT_SHOULDER).weapon())
        .unwrap();
    assert!(slot.is_ready());
    assert_eq!(sim.tick(16).spawned_count(), 0);

    // Same weapon fires once the target is far enough away
    assert!(sim.request_fire(mech, RIGHT_SHOULDER, px(200, 0)).unwrap().is_fired());
}

#[test]
fn test_fire_on_non_weapon_mounts() {
    let catalog = fixtures::standard_catalog();
    let mut sim = Simulation::new(CombatConfig::default(), 1);
    let blade_loadout = fixtures::loadout(
        ArmMounts {
            grip: Some(fixtures::BLADE_ID),
            shoulder: Some(fixtures::SHIELD_ID),
        },
        ArmMounts::default(),
    );
    let mech = sim
        .add_structured(Faction::Player, px(0, 0), &blade_loadout, &catalog)
        .unwrap();

    let grip = MountPoint::new(ArmSide::Left, MountSlot::Grip);
    assert_eq!(
        sim.request_fire(mech, grip, px(20, 0)).unwrap(),
        FireOutcome::Rejected(FireRejection::Unsupported)
    );
    assert_eq!(
        sim.request_fire(mech, LEFT_SHOULDER, px(20, 0)).unwrap(),
        FireOutcome::Rejected(FireRejection::NotAWeapon)
    );
    assert_eq!(
        sim.request_fire(mech, RIGHT_GRIP, px(20, 0)).unwrap(),
        FireOutcome::Rejected(FireRejection::EmptyMount)
    );
}

#[test]
fn test_fire_from_destroyed_arm_rejected() {
    let catalog = fixtures::standard_catalog();
    let mut sim = Simulation::new(CombatConfig::default(), 1);
    let mech = sim
        .add_structured(Faction::Player, px(0, 0), &fixtures::standard_loadout(), &catalog)
        .unwrap();
    sim.combatant_mut(mech)
        .and_then(Combatant::as_structured_mut)
        .unwrap()
        .damage_part(PartKey::ArmRight, 1_000);

    assert_eq!(
        sim.request_fire(mech, RIGHT_GRIP, px(100, 0)).unwrap(),
        FireOutcome::Rejected(FireRejection::MountDestroyed)
    );
}

#[test]
fn test_shield_raises_effective_defense() {
    let attacker_accuracy = 20_000;
    let attack = 20;

    let shielded: Combatant = standard_mech(1).into();
    // Hit roll, then the part draw lands on the body
    let mut rng = ScriptedRng::from_ratios(&[0, 0]);
    let outcome = resolve_hit(attacker_accuracy, attack, &shielded, &mut rng);
    assert!(outcome.hit);
    assert_eq!(outcome.part, Some(PartKey::Body));
    // Body defense 10 + shield 12: round(400 / 42) = 10
    assert_eq!(outcome.damage, 10);

    let mut bare = standard_mech(2);
    bare.damage_part(PartKey::ArmLeft, 1_000);
    let bare: Combatant = bare.into();
    let mut rng = ScriptedRng::from_ratios(&[0, 0]);
    let outcome = resolve_hit(attacker_accuracy, attack, &bare, &mut rng);
    // Shield arm gone: round(400 / 30) = 13
    assert_eq!(outcome.damage, 13);
}

#[test]
fn test_miss_leaves_target_untouched() {
    let mut target: Combatant = standard_mech(1).into();
    let before = target.as_structured().unwrap().parts().clone();

    let mut rng = fixtures::always_miss();
    let outcome = resolve_hit(9_000, 50, &target, &mut rng);
    assert_eq!(outcome, HitOutcome::MISS);
    assert_eq!(rng.consumed(), 1);

    assert!(apply_hit(&mut target, &outcome).is_none());
    assert_eq!(target.as_structured().unwrap().parts(), &before);
}

#[test]
fn test_body_destruction_destroys_mech() {
    let mut target: Combatant = standard_mech(1).into();
    let mut rng = ScriptedRng::from_ratios(&[0, 0]);

    // 35 damage per hit against body defense 10 + shield 12
    for _ in 0..10 {
        let outcome = resolve_hit(20_000, 50, &target, &mut rng);
        let applied = apply_hit(&mut target, &outcome).unwrap();
        if applied.destroyed_now {
            break;
        }
    }
    assert!(target.is_destroyed());
    let mech = target.as_structured().unwrap();
    assert_eq!(mech.part(PartKey::Body).current_hp, 0);
    assert_eq!(mech.part(PartKey::Legs).current_hp, 150);
}

#[test]
fn test_ranged_enemy_hits_terminal() {
    let catalog = fixtures::standard_catalog();
    let mut sim = Simulation::with_rng(CombatConfig::default(), fixtures::always_hit());
    let terminal = sim.add_simple(fixtures::terminal(px(0, 0)));
    sim.spawn_enemy("spitter", &catalog, px(150, 0)).unwrap();

    let mut damage = Vec::new();
    for _ in 0..60 {
        let events = sim.tick(16);
        damage.extend(events.events.into_iter().filter_map(|e| match e {
            CombatEvent::DamageApplied { target, damage, .. } => Some((target, damage)),
            _ => None,
        }));
    }

    // Attack 14 against defense 0
    assert_eq!(damage, vec![(terminal, 14)]);
    assert_eq!(terminal_hp(&sim, terminal), 986);
    assert!(sim.projectiles().is_empty());
}

#[test]
fn test_turret_kill_credits_bounty() {
    let catalog = fixtures::standard_catalog();
    let mut sim = Simulation::with_rng(CombatConfig::default(), fixtures::always_hit());
    sim.add_simple(fixtures::terminal(px(0, 0)));
    sim.add_turret(Faction::Player, px(0, 50), fixtures::tower_gun())
        .unwrap();
    let grunt = sim.spawn_enemy("grunt", &catalog, px(200, 50)).unwrap();

    let mut bounty = 0;
    let mut destroyed = Vec::new();
    for _ in 0..100 {
        let events = sim.tick(16);
        bounty += events.bounty_for(Faction::Player);
        destroyed.extend(events.destroyed());
    }

    assert_eq!(destroyed, vec![grunt]);
    assert_eq!(bounty, 10);
    assert!(sim.combatant(grunt).is_none());
}

#[test]
fn test_destroyed_mech_pays_loadout_bounty() {
    let catalog = fixtures::standard_catalog();
    let mut sim = Simulation::with_rng(CombatConfig::default(), fixtures::always_hit());
    sim.add_turret(Faction::Player, px(0, 0), fixtures::tower_gun())
        .unwrap();

    let mut loadout = fixtures::standard_loadout();
    loadout.bounty = 40;
    let mech = sim
        .add_structured(Faction::Enemy, px(150, 0), &loadout, &catalog)
        .unwrap();
    assert_eq!(sim.combatant(mech).unwrap().bounty(), 40);

    // Only the body is left to hit, and it is one shot from destruction
    let target = sim
        .combatant_mut(mech)
        .and_then(Combatant::as_structured_mut)
        .unwrap();
    for key in [PartKey::ArmLeft, PartKey::ArmRight, PartKey::Legs] {
        target.damage_part(key, 1000);
    }
    target.damage_part(PartKey::Body, 195);

    let mut bounty = 0;
    let mut destroyed = Vec::new();
    for _ in 0..100 {
        let events = sim.tick(16);
        bounty += events.bounty_for(Faction::Player);
        destroyed.extend(events.destroyed());
    }

    assert_eq!(destroyed, vec![mech]);
    assert_eq!(bounty, 40);
}

#[test]
fn test_projectile_blocked_by_terrain() {
    let catalog = fixtures::standard_catalog();
    let mut sim = Simulation::with_rng(CombatConfig::default(), fixtures::always_hit());
    sim.set_terrain(|p: Vec2Fixed| p.x >= Fixed::from_num(100) && p.x < Fixed::from_num(110));

    let mech = sim
        .add_structured(Faction::Player, px(0, 0), &fixtures::standard_loadout(), &catalog)
        .unwrap();
    let dummy = sim.add_simple(
        SimpleCombatant::new(0, Faction::Enemy, px(200, 0), HitShape::circle_from_size(30), 100)
            .with_bounty(5),
    );

    // Machinegun shots stop at the wall
    assert!(sim.request_fire(mech, RIGHT_GRIP, px(200, 0)).unwrap().is_fired());
    let damage: usize = (0..60).map(|_| sim.tick(16).damage_events().count()).sum();
    assert_eq!(damage, 0);
    assert_eq!(terminal_hp(&sim, dummy), 100);

    // Missiles arc over it
    assert!(sim.request_fire(mech, RIGHT_SHOULDER, px(200, 0)).unwrap().is_fired());
    let damage: usize = (0..120).map(|_| sim.tick(16).damage_events().count()).sum();
    assert_eq!(damage, 1);
}
