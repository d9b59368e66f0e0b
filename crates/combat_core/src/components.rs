//! Component definitions shared by every combat module.
//!
//! Components are plain data. Named part and mount lookups use small
//! enums indexing fixed arrays rather than string-keyed maps.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Unique identifier for combatants, turrets and projectiles.
pub type EntityId = u64;

// ============================================================================
// Factions
// ============================================================================

/// Side an entity fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The player's mech, terminal and turrets.
    Player,
    /// Hostile waves.
    Enemy,
}

impl Faction {
    /// The faction this one fights against.
    #[must_use]
    pub const fn opposing(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }

    /// Stable index for per-faction tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Player => 0,
            Self::Enemy => 1,
        }
    }
}

// ============================================================================
// Structured Parts
// ============================================================================

/// One of the four independently damageable parts of a structured combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKey {
    /// Core part. The combatant is dead when this reaches 0 HP.
    Body,
    /// Left arm, carries the left grip and shoulder mounts.
    ArmLeft,
    /// Right arm, carries the right grip and shoulder mounts.
    ArmRight,
    /// Locomotion.
    Legs,
}

impl PartKey {
    /// All parts in targeting order.
    pub const ALL: [Self; 4] = [Self::Body, Self::ArmLeft, Self::ArmRight, Self::Legs];

    /// Array index of this part.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Body => 0,
            Self::ArmLeft => 1,
            Self::ArmRight => 2,
            Self::Legs => 3,
        }
    }

    /// Relative weight of this part in the hit-location roll.
    #[must_use]
    pub const fn hit_weight(self) -> u32 {
        match self {
            Self::Body => 1,
            Self::ArmLeft | Self::ArmRight => 2,
            Self::Legs => 3,
        }
    }

    /// The arm this part represents, if it is an arm.
    #[must_use]
    pub const fn arm(self) -> Option<ArmSide> {
        match self {
            Self::ArmLeft => Some(ArmSide::Left),
            Self::ArmRight => Some(ArmSide::Right),
            Self::Body | Self::Legs => None,
        }
    }
}

/// A weapon-bearing arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmSide {
    /// Left arm.
    Left,
    /// Right arm.
    Right,
}

impl ArmSide {
    /// Both arms, left first.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Array index of this arm.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// The part that carries this arm's mounts.
    #[must_use]
    pub const fn part(self) -> PartKey {
        match self {
            Self::Left => PartKey::ArmLeft,
            Self::Right => PartKey::ArmRight,
        }
    }
}

/// Mount position on an arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MountSlot {
    /// Hand-held weapon.
    Grip,
    /// Shoulder-mounted weapon or shield.
    Shoulder,
}

impl MountSlot {
    /// Both mount slots, grip first.
    pub const ALL: [Self; 2] = [Self::Grip, Self::Shoulder];

    /// Array index of this slot.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Grip => 0,
            Self::Shoulder => 1,
        }
    }
}

/// Fully qualified mount location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountPoint {
    /// Arm the mount is on.
    pub arm: ArmSide,
    /// Grip or shoulder.
    pub slot: MountSlot,
}

impl MountPoint {
    /// Create a mount point.
    #[must_use]
    pub const fn new(arm: ArmSide, slot: MountSlot) -> Self {
        Self { arm, slot }
    }

    /// All four mount points in a stable order.
    pub const ALL: [Self; 4] = [
        Self::new(ArmSide::Left, MountSlot::Grip),
        Self::new(ArmSide::Left, MountSlot::Shoulder),
        Self::new(ArmSide::Right, MountSlot::Grip),
        Self::new(ArmSide::Right, MountSlot::Shoulder),
    ];
}

/// A damageable part of a structured combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantPart {
    /// Display name, taken from the part record.
    pub name: String,
    /// Current hit points, always in `[0, max_hp]`.
    pub current_hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Defense used by the damage formula.
    pub defense: u32,
    /// Accuracy contribution (10000-scale). Only meaningful for arms.
    pub accuracy_ratio: u32,
    /// Weight contribution to evasion and move efficiency.
    pub weight: u32,
    /// Power output contribution to evasion and move efficiency.
    pub power_output: u32,
}

impl CombatantPart {
    /// Whether this part has been shot off.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage, returning actual damage dealt.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current_hp);
        self.current_hp -= actual;
        actual
    }

    /// Restore hit points up to the maximum, returning the amount healed.
    pub fn repair(&mut self, amount: u32) -> u32 {
        let headroom = self.max_hp.saturating_sub(self.current_hp);
        let actual = amount.min(headroom);
        self.current_hp += actual;
        actual
    }
}

/// Health pool for single-part combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current health points.
    pub current: u32,
    /// Maximum health points.
    pub max: u32,
}

impl Health {
    /// Create new health component at full health.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Check if entity is dead (health == 0).
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Apply damage, returning actual damage dealt.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }
}

// ============================================================================
// Collision Shapes
// ============================================================================

/// Collision footprint of a target, centered on its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitShape {
    /// Round footprint (mechs, most enemies).
    Circle {
        /// Radius in pixels.
        #[serde(with = "fixed_serde")]
        radius: Fixed,
    },
    /// Axis-aligned box (the terminal, buildings).
    Rect {
        /// Half the box width in pixels.
        #[serde(with = "fixed_serde")]
        half_width: Fixed,
        /// Half the box height in pixels.
        #[serde(with = "fixed_serde")]
        half_height: Fixed,
    },
}

impl HitShape {
    /// Circle from a diameter in whole pixels.
    #[must_use]
    pub fn circle_from_size(size: u32) -> Self {
        Self::Circle {
            radius: Fixed::from_num(size) / Fixed::from_num(2),
        }
    }

    /// Box from a width and height in whole pixels.
    #[must_use]
    pub fn rect_from_size(width: u32, height: u32) -> Self {
        Self::Rect {
            half_width: Fixed::from_num(width) / Fixed::from_num(2),
            half_height: Fixed::from_num(height) / Fixed::from_num(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(hp: u32) -> CombatantPart {
        CombatantPart {
            name: "Arm A".to_string(),
            current_hp: hp,
            max_hp: 100,
            defense: 10,
            accuracy_ratio: 10000,
            weight: 100,
            power_output: 0,
        }
    }

    #[test]
    fn test_hit_weights_total_eight() {
        let total: u32 = PartKey::ALL.iter().map(|k| k.hit_weight()).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_part_damage_clamps_at_zero() {
        let mut p = part(30);
        assert_eq!(p.apply_damage(50), 30);
        assert_eq!(p.current_hp, 0);
        assert!(p.is_destroyed());
    }

    #[test]
    fn test_part_repair_clamps_at_max() {
        let mut p = part(90);
        assert_eq!(p.repair(50), 10);
        assert_eq!(p.current_hp, 100);
    }

    #[test]
    fn test_faction_opposing() {
        assert_eq!(Faction::Player.opposing(), Faction::Enemy);
        assert_eq!(Faction::Enemy.opposing(), Faction::Player);
    }

    #[test]
    fn test_arm_part_mapping() {
        for arm in ArmSide::ALL {
            assert_eq!(arm.part().arm(), Some(arm));
        }
        assert_eq!(PartKey::Body.arm(), None);
    }
}
