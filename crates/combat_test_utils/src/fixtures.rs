//! Test fixtures and helpers.
//!
//! A small, fixed catalog of parts, weapons and enemies so that every test
//! and benchmark shares the same numbers.

use combat_core::prelude::*;
use fixed::types::I32F32;

/// Standard body part id.
pub const BODY_ID: u32 = 11_001;
/// Standard arm part id.
pub const ARM_ID: u32 = 12_001;
/// Standard legs part id.
pub const LEGS_ID: u32 = 13_001;

/// Single-shot machinegun.
pub const MACHINEGUN_ID: u32 = 21_001;
/// Five-pellet fan shotgun.
pub const SHOTGUN_ID: u32 = 21_002;
/// Four-round sequential burst rifle.
pub const BURST_RIFLE_ID: u32 = 21_003;
/// Arcing missile pod.
pub const MISSILE_ID: u32 = 22_001;
/// Light shield generator.
pub const SHIELD_ID: u32 = 23_001;
/// Melee blade. Swing delivery is not supported by the firing path.
pub const BLADE_ID: u32 = 24_001;
/// Defensive tower gun.
pub const TOWER_GUN_ID: u32 = 30_001;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Pixel position shorthand.
#[must_use]
pub fn px(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::from_pixels(x, y)
}

fn firing(id: u32, name: &str) -> WeaponDefinition {
    WeaponDefinition {
        id,
        name: name.to_string(),
        kind: WeaponKind::Firing,
        attack: 10,
        accuracy_ratio: 10_000,
        defense: 0,
        range_min: 0,
        range_max: 6,
        projectiles_per_round: 1,
        delivery: DeliveryType::Linear,
        sequential_fire: false,
        attack_interval_ms: 1000,
        local_attack_speed_mod: 0,
        weight: 0,
        projectile_speed: 400,
        arcing: false,
    }
}

/// Machinegun: fast single shots.
#[must_use]
pub fn machinegun() -> WeaponDefinition {
    WeaponDefinition {
        attack: 12,
        accuracy_ratio: 9_000,
        attack_interval_ms: 200,
        weight: 150,
        ..firing(MACHINEGUN_ID, "Machinegun")
    }
}

/// Shotgun: five pellets in a fan.
#[must_use]
pub fn shotgun() -> WeaponDefinition {
    WeaponDefinition {
        attack: 8,
        accuracy_ratio: 8_000,
        range_max: 4,
        projectiles_per_round: 5,
        delivery: DeliveryType::Fan,
        attack_interval_ms: 1200,
        weight: 200,
        ..firing(SHOTGUN_ID, "Shotgun")
    }
}

/// Burst rifle: four rounds one after another.
#[must_use]
pub fn burst_rifle() -> WeaponDefinition {
    WeaponDefinition {
        attack: 15,
        range_max: 8,
        projectiles_per_round: 4,
        sequential_fire: true,
        attack_interval_ms: 1500,
        weight: 180,
        projectile_speed: 500,
        ..firing(BURST_RIFLE_ID, "Burst Rifle")
    }
}

/// Missile pod: arcing, with a minimum range of 3 tiles.
#[must_use]
pub fn missile_pod() -> WeaponDefinition {
    WeaponDefinition {
        attack: 40,
        range_min: 3,
        range_max: 12,
        attack_interval_ms: 3000,
        weight: 300,
        projectile_speed: 250,
        arcing: true,
        ..firing(MISSILE_ID, "Missile Pod")
    }
}

/// Light shield: +12 defense while active, 2 second recharge.
#[must_use]
pub fn light_shield() -> WeaponDefinition {
    WeaponDefinition {
        kind: WeaponKind::Shield,
        attack: 0,
        defense: 12,
        range_max: 0,
        attack_interval_ms: 2000,
        weight: 120,
        ..firing(SHIELD_ID, "Light Shield")
    }
}

/// Blade: melee swing.
#[must_use]
pub fn blade() -> WeaponDefinition {
    WeaponDefinition {
        attack: 30,
        range_max: 1,
        delivery: DeliveryType::Swing,
        attack_interval_ms: 800,
        weight: 100,
        ..firing(BLADE_ID, "Blade")
    }
}

/// Tower gun used by defensive turrets.
#[must_use]
pub fn tower_gun() -> WeaponDefinition {
    WeaponDefinition {
        attack: 25,
        ..firing(TOWER_GUN_ID, "Tower Gun")
    }
}

fn part(id: u32, name: &str, part_type: PartType, hp: u32) -> PartRecord {
    PartRecord {
        id,
        name: name.to_string(),
        part_type,
        hp,
        defense: 0,
        accuracy_ratio: 10_000,
        weight: 0,
        power_output: 0,
    }
}

/// Standard body: 200 HP, provides all the power.
#[must_use]
pub fn standard_body() -> PartRecord {
    PartRecord {
        defense: 10,
        weight: 500,
        power_output: 2_000,
        ..part(BODY_ID, "Standard Body", PartType::Body, 200)
    }
}

/// Standard arm: 100 HP, 95% accuracy.
#[must_use]
pub fn standard_arm() -> PartRecord {
    PartRecord {
        defense: 5,
        accuracy_ratio: 9_500,
        weight: 150,
        ..part(ARM_ID, "Standard Arm", PartType::Arm, 100)
    }
}

/// Standard legs: 150 HP.
#[must_use]
pub fn standard_legs() -> PartRecord {
    PartRecord {
        defense: 8,
        weight: 400,
        ..part(LEGS_ID, "Standard Legs", PartType::Legs, 150)
    }
}

/// Melee grunt: walks up and hits for 10.
#[must_use]
pub fn grunt() -> EnemyDefinition {
    EnemyDefinition {
        name: "grunt".to_string(),
        hp: 20,
        defense: 0,
        evasion: Some(0),
        attack: 10,
        accuracy_ratio: 9_000,
        range: 40,
        attack_interval_ms: 1000,
        style: AttackStyle::Melee,
        projectile_speed: 300,
        size: 30,
        bounty: 10,
    }
}

/// Ranged spitter: lobs projectiles from 5 tiles.
#[must_use]
pub fn spitter() -> EnemyDefinition {
    EnemyDefinition {
        name: "spitter".to_string(),
        hp: 35,
        defense: 2,
        evasion: None,
        attack: 14,
        accuracy_ratio: 8_000,
        range: 200,
        attack_interval_ms: 2000,
        style: AttackStyle::Ranged,
        projectile_speed: 300,
        size: 30,
        bounty: 15,
    }
}

/// Every fixture definition as raw catalog data.
#[must_use]
pub fn standard_catalog_data() -> CatalogData {
    CatalogData {
        parts: vec![standard_body(), standard_arm(), standard_legs()],
        weapons: vec![
            machinegun(),
            shotgun(),
            burst_rifle(),
            missile_pod(),
            light_shield(),
            blade(),
            tower_gun(),
        ],
        enemies: vec![grunt(), spitter()],
    }
}

/// The fixture catalog, validated and indexed.
///
/// # Panics
///
/// Panics if the fixture data fails validation.
#[must_use]
pub fn standard_catalog() -> DataCatalog {
    DataCatalog::from_data(standard_catalog_data()).expect("fixture catalog is valid")
}

/// Loadout with the given weapon ids on each arm.
#[must_use]
pub fn loadout(left: ArmMounts, right: ArmMounts) -> LoadoutSpec {
    LoadoutSpec {
        body: BODY_ID,
        arm_left: ARM_ID,
        arm_right: ARM_ID,
        legs: LEGS_ID,
        left,
        right,
        attack_speed_mods: Vec::new(),
        bounty: 0,
    }
}

/// Burst rifle in the left grip, shield on the left shoulder, machinegun in
/// the right grip and missiles on the right shoulder.
#[must_use]
pub fn standard_loadout() -> LoadoutSpec {
    loadout(
        ArmMounts {
            grip: Some(BURST_RIFLE_ID),
            shoulder: Some(SHIELD_ID),
        },
        ArmMounts {
            grip: Some(MACHINEGUN_ID),
            shoulder: Some(MISSILE_ID),
        },
    )
}

/// The player's base terminal: a 60x60 box with 1000 HP.
#[must_use]
pub fn terminal(position: Vec2Fixed) -> SimpleCombatant {
    SimpleCombatant::new(
        0,
        Faction::Player,
        position,
        HitShape::rect_from_size(60, 60),
        1000,
    )
}

/// A generator whose every draw is 0, so every roll hits and every part
/// draw lands on the body.
#[must_use]
pub fn always_hit() -> ScriptedRng {
    ScriptedRng::from_ratios(&[0])
}

/// A generator whose every draw is just below 1, so every roll short of a
/// certain hit misses.
#[must_use]
pub fn always_miss() -> ScriptedRng {
    ScriptedRng::new([Fixed::ONE])
}
