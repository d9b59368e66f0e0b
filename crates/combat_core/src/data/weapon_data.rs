//! Weapon definitions.

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};

/// Spatial pattern of a weapon's projectiles per firing round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryType {
    /// Projectiles travel along the aim direction.
    #[default]
    Linear,
    /// All projectiles of a round spawn together, spread across a fan.
    Fan,
    /// Melee swing. Recognized in data but not implemented; firing is a no-op.
    Swing,
}

/// Whether a weapon fires or projects a shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeaponKind {
    /// A firing weapon, assembled into a weapon slot.
    #[default]
    Firing,
    /// A shield generator, assembled into a shield slot.
    Shield,
}

/// Data-driven weapon definition.
///
/// # Example RON
///
/// ```ron
/// WeaponDefinition(
///     id: 21003,
///     name: "Machinegun A",
///     attack: 12,
///     accuracy_ratio: 8500,
///     range_max: 6,
///     attack_interval_ms: 200,
///     weight: 80,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    /// Unique numeric identifier referenced by loadouts.
    pub id: u32,

    /// Display name.
    pub name: String,

    /// Firing weapon or shield.
    #[serde(default)]
    pub kind: WeaponKind,

    /// Attack stat fed into the damage formula.
    #[serde(default)]
    pub attack: u32,

    /// Base accuracy (10000-scale), combined with the mounting arm's accuracy.
    #[serde(default = "default_accuracy")]
    pub accuracy_ratio: u32,

    /// Defense bonus granted while a shield is active. Ignored for firing weapons.
    #[serde(default)]
    pub defense: u32,

    /// Minimum engagement range in tiles.
    #[serde(default)]
    pub range_min: u32,

    /// Maximum engagement range in tiles.
    #[serde(default)]
    pub range_max: u32,

    /// Projectiles emitted per trigger pull.
    #[serde(default = "default_projectiles_per_round")]
    pub projectiles_per_round: u32,

    /// Spatial pattern of each round.
    #[serde(default)]
    pub delivery: DeliveryType,

    /// Whether multi-projectile linear rounds are spread over time.
    #[serde(default)]
    pub sequential_fire: bool,

    /// Base interval between trigger pulls (ms). For shields, the recharge time.
    pub attack_interval_ms: u32,

    /// Weapon-local attack speed modifier (10000-scale, additive).
    #[serde(default)]
    pub local_attack_speed_mod: i32,

    /// Weight added to the carrying combatant.
    #[serde(default)]
    pub weight: u32,

    /// Projectile travel speed in pixels per second.
    #[serde(default = "default_projectile_speed")]
    pub projectile_speed: u32,

    /// Projectiles arc over terrain instead of colliding with it.
    #[serde(default)]
    pub arcing: bool,
}

const fn default_accuracy() -> u32 {
    10_000
}

const fn default_projectiles_per_round() -> u32 {
    1
}

const fn default_projectile_speed() -> u32 {
    400
}

impl WeaponDefinition {
    /// Check if this definition is a shield.
    #[must_use]
    pub const fn is_shield(&self) -> bool {
        matches!(self.kind, WeaponKind::Shield)
    }

    /// Check if firing this weapon queues a timed burst.
    #[must_use]
    pub const fn is_burst(&self) -> bool {
        matches!(self.delivery, DeliveryType::Linear)
            && self.sequential_fire
            && self.projectiles_per_round > 1
    }

    /// Reject definitions the slot machines cannot run.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| CombatError::InvalidDefinition {
            name: format!("{} ({})", self.name, self.id),
            reason: reason.to_string(),
        };

        if self.projectiles_per_round == 0 {
            return Err(invalid("projectiles_per_round must be at least 1"));
        }
        if !self.is_shield() && self.range_max < self.range_min {
            return Err(invalid("range_max is below range_min"));
        }
        Ok(())
    }
}
