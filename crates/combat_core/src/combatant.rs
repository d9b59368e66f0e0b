//! Combatants: structured mechs and simple single-HP entities.
//!
//! A structured combatant has four independently damageable parts and two
//! mounts per arm. A simple combatant (enemies, the terminal) has one health
//! pool, one defense value and optionally an attack of its own.

use crate::components::{
    ArmSide, CombatantPart, EntityId, Faction, Health, HitShape, MountPoint, MountSlot, PartKey,
};
use crate::data::{AttackStyle, CombatConfig, DataCatalog, EnemyDefinition, LoadoutSpec};
use crate::error::{CombatError, Result};
use crate::formulas;
use crate::math::{Fixed, Vec2Fixed};
use crate::slots::{Mount, ShieldSlot, ShieldState, SlotTick, WeaponSlot};

// ============================================================================
// Structured Combatant
// ============================================================================

/// A mech assembled from part records and weapon definitions.
#[derive(Debug, Clone)]
pub struct StructuredCombatant {
    /// Entity id.
    pub id: EntityId,
    /// Side it fights for.
    pub faction: Faction,
    /// World position.
    pub position: Vec2Fixed,
    /// Collision footprint.
    pub shape: HitShape,
    /// Credits paid to the opposing side on destruction.
    pub bounty: u32,
    parts: [CombatantPart; 4],
    mounts: [[Mount; 2]; 2],
    evasion: u32,
    move_efficiency: u32,
    base_speed: u32,
}

impl StructuredCombatant {
    /// Assemble a mech from a loadout.
    ///
    /// Unknown or mismatched part ids are errors. Unknown weapon ids are
    /// logged and leave the mount empty.
    pub fn assemble(
        id: EntityId,
        faction: Faction,
        position: Vec2Fixed,
        loadout: &LoadoutSpec,
        catalog: &DataCatalog,
        config: &CombatConfig,
    ) -> Result<Self> {
        let mut parts = Vec::with_capacity(4);
        for key in PartKey::ALL {
            let part_id = loadout.part_id(key);
            let record = catalog
                .part(part_id)
                .ok_or(CombatError::UnknownPart { slot: key, id: part_id })?;
            if !record.part_type.fits(key) {
                return Err(CombatError::PartTypeMismatch { slot: key, id: part_id });
            }
            parts.push(record.instantiate());
        }
        let parts: [CombatantPart; 4] = parts
            .try_into()
            .map_err(|_| CombatError::InvalidDefinition {
                name: format!("loadout for entity {id}"),
                reason: "expected exactly four parts".to_string(),
            })?;

        let mounts = ArmSide::ALL.map(|arm| {
            let arm_accuracy = parts[arm.part().index()].accuracy_ratio;
            let ids = loadout.mounts(arm);
            MountSlot::ALL.map(|slot| {
                let Some(weapon_id) = ids.get(slot) else {
                    return Mount::Empty;
                };
                match catalog.weapon(weapon_id) {
                    None => {
                        tracing::warn!(
                            entity = id,
                            weapon_id,
                            ?arm,
                            ?slot,
                            "Unknown weapon in loadout, mount left empty"
                        );
                        Mount::Empty
                    }
                    Some(def) if def.is_shield() => Mount::Shield(ShieldSlot::new(
                        def.clone(),
                        &loadout.attack_speed_mods,
                        config,
                    )),
                    Some(def) => Mount::Weapon(WeaponSlot::new(
                        def.clone(),
                        arm_accuracy,
                        &loadout.attack_speed_mods,
                        config,
                    )),
                }
            })
        });

        let mut mech = Self {
            id,
            faction,
            position,
            shape: HitShape::circle_from_size(config.mech_size),
            bounty: loadout.bounty,
            parts,
            mounts,
            evasion: 0,
            move_efficiency: formulas::FALLBACK_MOVE_EFFICIENCY,
            base_speed: config.mech_base_speed,
        };
        mech.recompute_mobility();

        tracing::debug!(
            entity = id,
            weight = mech.total_weight(),
            power = mech.total_power(),
            evasion = mech.evasion,
            move_efficiency = mech.move_efficiency,
            "Mech assembled"
        );
        Ok(mech)
    }

    /// Set the bounty paid on destruction.
    #[must_use]
    pub fn with_bounty(mut self, bounty: u32) -> Self {
        self.bounty = bounty;
        self
    }

    fn recompute_mobility(&mut self) {
        let weight = self.total_weight();
        let power = self.total_power();
        self.evasion = formulas::evasion(weight, power);
        self.move_efficiency = formulas::move_efficiency(weight, power);
    }

    /// All four parts in targeting order.
    #[must_use]
    pub fn parts(&self) -> &[CombatantPart; 4] {
        &self.parts
    }

    /// One part.
    #[must_use]
    pub fn part(&self, key: PartKey) -> &CombatantPart {
        &self.parts[key.index()]
    }

    /// Apply damage to one part, returning the damage actually dealt.
    pub fn damage_part(&mut self, key: PartKey, amount: u32) -> u32 {
        self.parts[key.index()].apply_damage(amount)
    }

    /// Restore HP to one part. A repaired arm unfreezes its mounts.
    pub fn repair_part(&mut self, key: PartKey, amount: u32) -> u32 {
        self.parts[key.index()].repair(amount)
    }

    /// Contents of a mount point.
    #[must_use]
    pub fn mount(&self, point: MountPoint) -> &Mount {
        &self.mounts[point.arm.index()][point.slot.index()]
    }

    /// Mutable contents of a mount point.
    pub fn mount_mut(&mut self, point: MountPoint) -> &mut Mount {
        &mut self.mounts[point.arm.index()][point.slot.index()]
    }

    /// Whether the arm carrying `arm`'s mounts still has HP.
    #[must_use]
    pub fn arm_alive(&self, arm: ArmSide) -> bool {
        !self.part(arm.part()).is_destroyed()
    }

    /// A mech is destroyed once its body reaches 0 HP.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.part(PartKey::Body).is_destroyed()
    }

    /// Evasion (10000-scale) derived from weight and power.
    #[must_use]
    pub const fn evasion(&self) -> u32 {
        self.evasion
    }

    /// Move efficiency (10000-scale) derived from weight and power.
    #[must_use]
    pub const fn move_efficiency(&self) -> u32 {
        self.move_efficiency
    }

    /// Parts plus everything mounted.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        let parts: u32 = self.parts.iter().map(|p| p.weight).sum();
        let mounted: u32 = self.mounts.iter().flatten().map(Mount::weight).sum();
        parts.saturating_add(mounted)
    }

    /// Sum of part power output.
    #[must_use]
    pub fn total_power(&self) -> u32 {
        self.parts.iter().map(|p| p.power_output).sum()
    }

    /// Sum of the defense of every Active shield on a live arm.
    #[must_use]
    pub fn active_shield_bonus(&self) -> u32 {
        ArmSide::ALL
            .into_iter()
            .filter(|&arm| self.arm_alive(arm))
            .flat_map(|arm| self.mounts[arm.index()].iter())
            .filter_map(Mount::shield)
            .map(ShieldSlot::defense_bonus)
            .sum()
    }

    /// Movement speed in pixels per second.
    #[must_use]
    pub fn move_speed(&self, additive_mod: i32, status_multipliers: &[u32]) -> u32 {
        formulas::actual_speed(
            self.base_speed,
            additive_mod,
            self.move_efficiency,
            status_multipliers,
        )
    }

    /// Advance every slot by `dt_ms`.
    pub(crate) fn tick_slots(&mut self, dt_ms: u32) -> MountTicks {
        let mut ticks = MountTicks::default();
        let origin = self.position;

        for point in MountPoint::ALL {
            let alive = self.arm_alive(point.arm);
            match self.mount_mut(point) {
                Mount::Empty => {}
                Mount::Weapon(slot) => {
                    let tick = slot.tick(dt_ms, alive, origin);
                    if !tick.spawned.is_empty() || tick.burst_aborted > 0 {
                        ticks.weapons.push((point, tick));
                    }
                }
                Mount::Shield(slot) => {
                    if let Some(state) = slot.tick(dt_ms, alive) {
                        ticks.shields.push((point, state));
                    }
                }
            }
        }
        ticks
    }
}

/// Per-mount results of one slot update.
#[derive(Debug, Default)]
pub(crate) struct MountTicks {
    pub weapons: Vec<(MountPoint, SlotTick)>,
    pub shields: Vec<(MountPoint, ShieldState)>,
}

// ============================================================================
// Simple Combatant
// ============================================================================

/// An attack carried by a simple combatant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyAttack {
    /// Attack stat.
    pub attack: u32,
    /// Accuracy (10000-scale).
    pub accuracy_ratio: u32,
    /// Reach in pixels.
    pub range: Fixed,
    /// Time between attacks.
    pub interval_ms: u32,
    /// Time until the next attack is allowed.
    pub cooldown_remaining_ms: u32,
    /// Melee or ranged.
    pub style: AttackStyle,
    /// Projectile speed (ranged only).
    pub projectile_speed: Fixed,
}

impl EnemyAttack {
    /// Build from an enemy definition.
    #[must_use]
    pub fn from_definition(def: &EnemyDefinition) -> Self {
        Self {
            attack: def.attack,
            accuracy_ratio: def.accuracy_ratio,
            range: Fixed::from_num(def.range),
            interval_ms: def.attack_interval_ms,
            cooldown_remaining_ms: 0,
            style: def.style,
            projectile_speed: Fixed::from_num(def.projectile_speed),
        }
    }

    /// Check if the attack can be used.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown_remaining_ms == 0
    }

    /// Decay the cooldown.
    pub fn cool_down(&mut self, dt_ms: u32) {
        self.cooldown_remaining_ms = self.cooldown_remaining_ms.saturating_sub(dt_ms);
    }

    /// Consume the attack, restarting the cooldown.
    pub fn trigger(&mut self) {
        self.cooldown_remaining_ms = self.interval_ms;
    }
}

/// A single-HP combatant (enemies, the terminal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCombatant {
    /// Entity id.
    pub id: EntityId,
    /// Side it fights for.
    pub faction: Faction,
    /// World position.
    pub position: Vec2Fixed,
    /// Collision footprint.
    pub shape: HitShape,
    /// Health pool.
    pub health: Health,
    /// Defense against incoming hits.
    pub defense: u32,
    /// Evasion (10000-scale), if it can dodge at all.
    pub evasion: Option<u32>,
    /// Credits paid to the opposing side on destruction.
    pub bounty: u32,
    /// Its own attack, if any.
    pub attack: Option<EnemyAttack>,
}

impl SimpleCombatant {
    /// Create a passive combatant with no evasion, bounty or attack.
    #[must_use]
    pub fn new(id: EntityId, faction: Faction, position: Vec2Fixed, shape: HitShape, hp: u32) -> Self {
        Self {
            id,
            faction,
            position,
            shape,
            health: Health::new(hp),
            defense: 0,
            evasion: None,
            bounty: 0,
            attack: None,
        }
    }

    /// Spawn an enemy from its definition.
    #[must_use]
    pub fn from_definition(id: EntityId, def: &EnemyDefinition, position: Vec2Fixed) -> Self {
        Self::new(
            id,
            Faction::Enemy,
            position,
            HitShape::circle_from_size(def.size),
            def.hp,
        )
        .with_defense(def.defense)
        .with_bounty(def.bounty)
        .with_attack(EnemyAttack::from_definition(def))
        .with_evasion(def.evasion)
    }

    /// Set defense.
    #[must_use]
    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = defense;
        self
    }

    /// Set evasion.
    #[must_use]
    pub fn with_evasion(mut self, evasion: Option<u32>) -> Self {
        self.evasion = evasion;
        self
    }

    /// Set bounty.
    #[must_use]
    pub fn with_bounty(mut self, bounty: u32) -> Self {
        self.bounty = bounty;
        self
    }

    /// Give it an attack.
    #[must_use]
    pub fn with_attack(mut self, attack: EnemyAttack) -> Self {
        self.attack = Some(attack);
        self
    }

    /// Check if dead.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.health.is_dead()
    }
}

// ============================================================================
// Combatant
// ============================================================================

/// Anything that can be targeted.
#[derive(Debug, Clone)]
pub enum Combatant {
    /// A multi-part mech.
    Structured(Box<StructuredCombatant>),
    /// A single-HP entity.
    Simple(SimpleCombatant),
}

impl Combatant {
    /// Entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        match self {
            Self::Structured(c) => c.id,
            Self::Simple(c) => c.id,
        }
    }

    /// Side it fights for.
    #[must_use]
    pub fn faction(&self) -> Faction {
        match self {
            Self::Structured(c) => c.faction,
            Self::Simple(c) => c.faction,
        }
    }

    /// World position.
    #[must_use]
    pub fn position(&self) -> Vec2Fixed {
        match self {
            Self::Structured(c) => c.position,
            Self::Simple(c) => c.position,
        }
    }

    /// Move to a new position.
    pub fn set_position(&mut self, position: Vec2Fixed) {
        match self {
            Self::Structured(c) => c.position = position,
            Self::Simple(c) => c.position = position,
        }
    }

    /// Collision footprint.
    #[must_use]
    pub fn shape(&self) -> HitShape {
        match self {
            Self::Structured(c) => c.shape,
            Self::Simple(c) => c.shape,
        }
    }

    /// Bounty paid on destruction.
    #[must_use]
    pub fn bounty(&self) -> u32 {
        match self {
            Self::Structured(c) => c.bounty,
            Self::Simple(c) => c.bounty,
        }
    }

    /// Evasion used by the accuracy roll. Simple combatants without one use 0.
    #[must_use]
    pub fn evasion(&self) -> u32 {
        match self {
            Self::Structured(c) => c.evasion(),
            Self::Simple(c) => c.evasion.unwrap_or(0),
        }
    }

    /// Check if destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        match self {
            Self::Structured(c) => c.is_destroyed(),
            Self::Simple(c) => c.is_destroyed(),
        }
    }

    /// The mech, if this is one.
    #[must_use]
    pub fn as_structured(&self) -> Option<&StructuredCombatant> {
        match self {
            Self::Structured(c) => Some(c.as_ref()),
            Self::Simple(_) => None,
        }
    }

    /// The mech, mutably, if this is one.
    pub fn as_structured_mut(&mut self) -> Option<&mut StructuredCombatant> {
        match self {
            Self::Structured(c) => Some(c.as_mut()),
            Self::Simple(_) => None,
        }
    }

    /// The simple combatant, if this is one.
    #[must_use]
    pub fn as_simple(&self) -> Option<&SimpleCombatant> {
        match self {
            Self::Structured(_) => None,
            Self::Simple(c) => Some(c),
        }
    }
}

impl From<StructuredCombatant> for Combatant {
    fn from(value: StructuredCombatant) -> Self {
        Self::Structured(Box::new(value))
    }
}

impl From<SimpleCombatant> for Combatant {
    fn from(value: SimpleCombatant) -> Self {
        Self::Simple(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        ArmMounts, CatalogData, DeliveryType, PartRecord, PartType, WeaponDefinition, WeaponKind,
    };

    fn part(id: u32, part_type: PartType, hp: u32, weight: u32, power: u32) -> PartRecord {
        PartRecord {
            id,
            name: format!("Part {id}"),
            part_type,
            hp,
            defense: 10,
            accuracy_ratio: 9000,
            weight,
            power_output: power,
        }
    }

    fn gun(id: u32, kind: WeaponKind, weight: u32) -> WeaponDefinition {
        WeaponDefinition {
            id,
            name: format!("Weapon {id}"),
            kind,
            attack: 20,
            accuracy_ratio: 10_000,
            defense: 12,
            range_min: 0,
            range_max: 8,
            projectiles_per_round: 1,
            delivery: DeliveryType::Linear,
            sequential_fire: false,
            attack_interval_ms: 1000,
            local_attack_speed_mod: 0,
            weight,
            projectile_speed: 400,
            arcing: false,
        }
    }

    fn catalog() -> DataCatalog {
        DataCatalog::from_data(CatalogData {
            parts: vec![
                part(1, PartType::Body, 300, 400, 2000),
                part(2, PartType::Arm, 150, 150, 0),
                part(3, PartType::Legs, 200, 300, 0),
            ],
            weapons: vec![gun(10, WeaponKind::Firing, 100), gun(11, WeaponKind::Shield, 100)],
            enemies: vec![],
        })
        .unwrap()
    }

    fn loadout() -> LoadoutSpec {
        LoadoutSpec {
            body: 1,
            arm_left: 2,
            arm_right: 2,
            legs: 3,
            left: ArmMounts {
                grip: Some(10),
                shoulder: None,
            },
            right: ArmMounts {
                grip: Some(99),
                shoulder: Some(11),
            },
            attack_speed_mods: vec![],
            bounty: 0,
        }
    }

    fn mech() -> StructuredCombatant {
        StructuredCombatant::assemble(
            1,
            Faction::Player,
            Vec2Fixed::ZERO,
            &loadout(),
            &catalog(),
            &CombatConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_assembly_fills_mounts() {
        let mech = mech();
        let left_grip = MountPoint::new(ArmSide::Left, MountSlot::Grip);
        let right_grip = MountPoint::new(ArmSide::Right, MountSlot::Grip);
        let right_shoulder = MountPoint::new(ArmSide::Right, MountSlot::Shoulder);

        assert_eq!(mech.mount(left_grip).weapon().unwrap().combined_accuracy(), 9000);
        assert!(mech.mount(right_grip).is_empty(), "unknown weapon id stays empty");
        assert!(mech.mount(right_shoulder).shield().is_some());
    }

    #[test]
    fn test_weight_and_evasion() {
        let mech = mech();
        // Parts 400 + 150 + 150 + 300, weapons 100 + 100
        assert_eq!(mech.total_weight(), 1200);
        assert_eq!(mech.total_power(), 2000);
        // ratio 6000: 10000 - (3000 * 10 / 7) = 5715
        assert_eq!(mech.evasion(), 5715);
        assert_eq!(mech.move_efficiency(), 10_000);
        assert_eq!(mech.move_speed(0, &[]), 200);
    }

    #[test]
    fn test_shield_bonus_requires_live_arm() {
        let mut mech = mech();
        assert_eq!(mech.active_shield_bonus(), 12);
        mech.damage_part(PartKey::ArmRight, 1000);
        assert_eq!(mech.active_shield_bonus(), 0);
        mech.repair_part(PartKey::ArmRight, 10);
        assert_eq!(mech.active_shield_bonus(), 12);
    }

    #[test]
    fn test_unknown_part_is_error() {
        let mut spec = loadout();
        spec.legs = 77;
        let err = StructuredCombatant::assemble(
            1,
            Faction::Player,
            Vec2Fixed::ZERO,
            &spec,
            &catalog(),
            &CombatConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CombatError::UnknownPart {
                slot: PartKey::Legs,
                id: 77
            }
        ));
    }

    #[test]
    fn test_part_type_mismatch_is_error() {
        let mut spec = loadout();
        spec.body = 2;
        let err = StructuredCombatant::assemble(
            1,
            Faction::Player,
            Vec2Fixed::ZERO,
            &spec,
            &catalog(),
            &CombatConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CombatError::PartTypeMismatch { .. }));
    }

    #[test]
    fn test_destroyed_when_body_gone() {
        let mut mech = mech();
        mech.damage_part(PartKey::Legs, 1000);
        assert!(!mech.is_destroyed());
        mech.damage_part(PartKey::Body, 1000);
        assert!(mech.is_destroyed());
    }

    #[test]
    fn test_simple_from_definition() {
        let def = EnemyDefinition {
            name: "Grunt".to_string(),
            hp: 50,
            defense: 5,
            evasion: None,
            attack: 8,
            accuracy_ratio: 9000,
            range: 40,
            attack_interval_ms: 1000,
            style: AttackStyle::Melee,
            projectile_speed: 300,
            size: 30,
            bounty: 10,
        };
        let enemy: Combatant = SimpleCombatant::from_definition(5, &def, Vec2Fixed::ZERO).into();
        assert_eq!(enemy.faction(), Faction::Enemy);
        assert_eq!(enemy.evasion(), 0);
        assert_eq!(enemy.bounty(), 10);
        assert_eq!(enemy.shape(), HitShape::circle_from_size(30));
    }
}
