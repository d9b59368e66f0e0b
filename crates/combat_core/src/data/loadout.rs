//! Mech loadout specifications.

use serde::{Deserialize, Serialize};

use crate::components::{ArmSide, MountSlot, PartKey};

/// Weapon ids mounted on one arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmMounts {
    /// Weapon id in the grip mount.
    #[serde(default)]
    pub grip: Option<u32>,
    /// Weapon id in the shoulder mount.
    #[serde(default)]
    pub shoulder: Option<u32>,
}

impl ArmMounts {
    /// Weapon id at `slot`.
    #[must_use]
    pub const fn get(&self, slot: MountSlot) -> Option<u32> {
        match slot {
            MountSlot::Grip => self.grip,
            MountSlot::Shoulder => self.shoulder,
        }
    }
}

/// Part and weapon ids for assembling a structured combatant.
///
/// # Example RON
///
/// ```ron
/// LoadoutSpec(
///     body: 11001,
///     arm_left: 12001,
///     arm_right: 12001,
///     legs: 13001,
///     left: (grip: Some(21003)),
///     right: (grip: Some(21001), shoulder: Some(22001)),
///     bounty: 50,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutSpec {
    /// Body part id.
    pub body: u32,
    /// Left arm part id.
    pub arm_left: u32,
    /// Right arm part id.
    pub arm_right: u32,
    /// Legs part id.
    pub legs: u32,
    /// Left arm mounts.
    #[serde(default)]
    pub left: ArmMounts,
    /// Right arm mounts.
    #[serde(default)]
    pub right: ArmMounts,
    /// Global attack speed modifiers applied to every weapon (10000-scale).
    #[serde(default)]
    pub attack_speed_mods: Vec<i32>,
    /// Credits paid to the opposing side when the mech is destroyed.
    #[serde(default)]
    pub bounty: u32,
}

impl LoadoutSpec {
    /// Part id for a part slot.
    #[must_use]
    pub const fn part_id(&self, key: PartKey) -> u32 {
        match key {
            PartKey::Body => self.body,
            PartKey::ArmLeft => self.arm_left,
            PartKey::ArmRight => self.arm_right,
            PartKey::Legs => self.legs,
        }
    }

    /// Mounts on one arm.
    #[must_use]
    pub const fn mounts(&self, arm: ArmSide) -> &ArmMounts {
        match arm {
            ArmSide::Left => &self.left,
            ArmSide::Right => &self.right,
        }
    }
}
