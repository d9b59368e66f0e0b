//! Enemy definitions.

use serde::{Deserialize, Serialize};

/// How an enemy delivers its attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttackStyle {
    /// Resolved immediately against a target in reach; no projectile.
    #[default]
    Melee,
    /// Spawns one projectile aimed at the target.
    Ranged,
}

/// Data-driven enemy definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    /// Unique name, referenced by encounter data.
    pub name: String,
    /// Hit points.
    pub hp: u32,
    /// Defense against incoming hits.
    #[serde(default)]
    pub defense: u32,
    /// Evasion (10000-scale). `None` means the enemy never dodges.
    #[serde(default)]
    pub evasion: Option<u32>,
    /// Attack stat.
    #[serde(default)]
    pub attack: u32,
    /// Accuracy (10000-scale).
    #[serde(default = "default_accuracy")]
    pub accuracy_ratio: u32,
    /// Attack reach in pixels.
    #[serde(default = "default_reach")]
    pub range: u32,
    /// Time between attacks (ms).
    #[serde(default = "default_interval")]
    pub attack_interval_ms: u32,
    /// Melee or ranged.
    #[serde(default)]
    pub style: AttackStyle,
    /// Projectile speed in pixels per second (ranged only).
    #[serde(default = "default_projectile_speed")]
    pub projectile_speed: u32,
    /// Collision diameter in pixels.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Credits paid to the player when this enemy dies.
    #[serde(default)]
    pub bounty: u32,
}

const fn default_accuracy() -> u32 {
    9_000
}

const fn default_reach() -> u32 {
    40
}

const fn default_interval() -> u32 {
    1_000
}

const fn default_projectile_speed() -> u32 {
    300
}

const fn default_size() -> u32 {
    30
}
