//! Combat configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::Fixed;

/// Immutable tuning constants for the combat core.
///
/// Built once and handed to slot constructors and the simulation; nothing
/// reads configuration from shared state. Missing RON fields take the
/// default values.
///
/// # Example RON
///
/// ```ron
/// (
///     intra_burst_interval_ms: 80,
///     shield_active_duration_ms: 4000,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Tile edge length in pixels. Weapon ranges are given in tiles.
    pub tile_size: u32,
    /// Delay between queued rounds of a sequential burst (ms).
    pub intra_burst_interval_ms: u32,
    /// How long a shield stays up once active (ms).
    pub shield_active_duration_ms: u32,
    /// Total spread of a fan round, in degrees.
    pub fan_spread_degrees: u32,
    /// Projectile collision radius in pixels.
    pub projectile_radius: u32,
    /// Upper bound on a single tick's delta time (ms).
    pub max_tick_ms: u32,
    /// Base mech movement speed before modifiers (pixels per second).
    pub mech_base_speed: u32,
    /// Mech collision diameter in pixels.
    pub mech_size: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            tile_size: 40,
            intra_burst_interval_ms: 100,
            shield_active_duration_ms: 5000,
            fan_spread_degrees: 20,
            projectile_radius: 4,
            max_tick_ms: 100,
            mech_base_speed: 200,
            mech_size: 40,
        }
    }
}

impl CombatConfig {
    /// Parse a configuration from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        super::parse_ron("combat config", text)
    }

    /// Convert a tile count to pixels.
    #[must_use]
    pub fn tiles_to_pixels(&self, tiles: u32) -> Fixed {
        Fixed::saturating_from_num(u64::from(tiles) * u64::from(self.tile_size))
    }

    /// Fan spread in radians.
    #[must_use]
    pub fn fan_spread_radians(&self) -> f64 {
        f64::from(self.fan_spread_degrees).to_radians()
    }

    /// Clamp a raw frame delta to the configured maximum.
    #[must_use]
    pub fn clamp_delta(&self, dt_ms: u32) -> u32 {
        dt_ms.min(self.max_tick_ms)
    }
}
