//! Shield slot: Active / Recharging cycle.

use serde::{Deserialize, Serialize};

use crate::data::{CombatConfig, WeaponDefinition};
use crate::formulas;

/// Phase of a shield's cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldState {
    /// Shield is up and contributes its defense.
    Active,
    /// Shield is down, waiting out its interval.
    Recharging,
}

/// A mounted shield generator.
///
/// Starts Active. While the mount is alive it cycles on its own:
/// `active_duration_ms` up, then `interval_ms` down. Time left over after a
/// flip carries into the next phase, so one full cycle always lasts exactly
/// `active_duration_ms + interval_ms`.
#[derive(Debug, Clone)]
pub struct ShieldSlot {
    definition: WeaponDefinition,
    interval_ms: u32,
    active_duration_ms: u32,
    active_remaining_ms: u32,
    cooldown_remaining_ms: u32,
    state: ShieldState,
}

impl ShieldSlot {
    /// Build a shield slot.
    ///
    /// The recharge interval goes through the same speed modifiers as a
    /// weapon's attack interval, so it never drops below the 100 ms floor.
    #[must_use]
    pub fn new(
        definition: WeaponDefinition,
        global_speed_mods: &[i32],
        config: &CombatConfig,
    ) -> Self {
        let active_duration_ms = config.shield_active_duration_ms;
        Self {
            interval_ms: formulas::attack_interval(
                definition.attack_interval_ms,
                definition.local_attack_speed_mod,
                global_speed_mods,
            ),
            definition,
            active_duration_ms,
            active_remaining_ms: active_duration_ms,
            cooldown_remaining_ms: 0,
            state: ShieldState::Active,
        }
    }

    /// The shield's definition.
    #[must_use]
    pub fn definition(&self) -> &WeaponDefinition {
        &self.definition
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> ShieldState {
        self.state
    }

    /// Check if the shield is up.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == ShieldState::Active
    }

    /// Time left in the active window.
    #[must_use]
    pub const fn active_remaining_ms(&self) -> u32 {
        self.active_remaining_ms
    }

    /// Time left until the shield comes back up.
    #[must_use]
    pub const fn cooldown_remaining_ms(&self) -> u32 {
        self.cooldown_remaining_ms
    }

    /// Defense this shield currently contributes.
    #[must_use]
    pub fn defense_bonus(&self) -> u32 {
        if self.is_active() {
            self.definition.defense
        } else {
            0
        }
    }

    /// Advance the cycle. A dead mount freezes the shield in place.
    ///
    /// Returns the new state if the phase at the end of the tick differs
    /// from the phase at the start.
    pub fn tick(&mut self, dt_ms: u32, mount_alive: bool) -> Option<ShieldState> {
        if !mount_alive {
            return None;
        }

        let before = self.state;
        let mut remaining = dt_ms;
        loop {
            match self.state {
                ShieldState::Active => {
                    if remaining < self.active_remaining_ms {
                        self.active_remaining_ms -= remaining;
                        break;
                    }
                    remaining -= self.active_remaining_ms;
                    self.active_remaining_ms = 0;
                    self.cooldown_remaining_ms = self.interval_ms;
                    self.state = ShieldState::Recharging;
                }
                ShieldState::Recharging => {
                    if remaining < self.cooldown_remaining_ms {
                        self.cooldown_remaining_ms -= remaining;
                        break;
                    }
                    remaining -= self.cooldown_remaining_ms;
                    self.cooldown_remaining_ms = 0;
                    self.active_remaining_ms = self.active_duration_ms;
                    self.state = ShieldState::Active;
                }
            }
        }

        if self.state == before {
            None
        } else {
            tracing::debug!(
                shield = %self.definition.name,
                state = ?self.state,
                "Shield state changed"
            );
            Some(self.state)
        }
    }
}
