//! Weapon slot: cooldown and burst sequencing.

use serde::{Deserialize, Serialize};

use crate::data::{CombatConfig, DeliveryType, WeaponDefinition};
use crate::formulas;
use crate::math::{Fixed, Vec2Fixed};
use crate::projectile::ProjectileSpawn;

/// Why a fire request produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireRejection {
    /// The mount holds no weapon.
    EmptyMount,
    /// The mount holds a shield, which cannot be fired.
    NotAWeapon,
    /// The part carrying the mount is destroyed.
    MountDestroyed,
    /// Delivery type has no implementation (swing).
    Unsupported,
    /// The weapon is still cooling down.
    Cooling,
    /// Target is inside the minimum range.
    TooClose,
    /// Target is beyond the maximum range.
    OutOfRange,
}

/// Result of a fire request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// The trigger was pulled; these projectiles spawn this tick.
    Fired(Vec<ProjectileSpawn>),
    /// Nothing happened and no cooldown was consumed.
    Rejected(FireRejection),
}

impl FireOutcome {
    /// Check if the request was accepted.
    #[must_use]
    pub const fn is_fired(&self) -> bool {
        matches!(self, Self::Fired(_))
    }

    /// Projectiles spawned by an accepted request.
    #[must_use]
    pub fn spawns(&self) -> &[ProjectileSpawn] {
        match self {
            Self::Fired(spawns) => spawns,
            Self::Rejected(_) => &[],
        }
    }
}

/// What a slot did during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTick {
    /// Burst rounds emitted this tick.
    pub spawned: Vec<ProjectileSpawn>,
    /// Queued burst rounds discarded because the mount died.
    pub burst_aborted: u32,
}

#[derive(Debug, Clone, Copy)]
struct BurstState {
    remaining: u32,
    timer_ms: u32,
    direction: Vec2Fixed,
}

/// A mounted firing weapon.
#[derive(Debug, Clone)]
pub struct WeaponSlot {
    definition: WeaponDefinition,
    interval_ms: u32,
    combined_accuracy: u32,
    cooldown_remaining_ms: u32,
    bursts: Vec<BurstState>,
    range_min: Fixed,
    range_max: Fixed,
    intra_burst_interval_ms: u32,
    fan_spread_radians: f64,
}

impl WeaponSlot {
    /// Build a slot for `definition` mounted on a part with `mount_accuracy`.
    ///
    /// `global_speed_mods` are the owner's attack speed modifiers; they are
    /// folded into the interval once, here.
    #[must_use]
    pub fn new(
        definition: WeaponDefinition,
        mount_accuracy: u32,
        global_speed_mods: &[i32],
        config: &CombatConfig,
    ) -> Self {
        let interval_ms = formulas::attack_interval(
            definition.attack_interval_ms,
            definition.local_attack_speed_mod,
            global_speed_mods,
        );
        let combined_accuracy =
            formulas::combine_accuracy(definition.accuracy_ratio, mount_accuracy);

        Self {
            interval_ms,
            combined_accuracy,
            cooldown_remaining_ms: 0,
            bursts: Vec::new(),
            range_min: config.tiles_to_pixels(definition.range_min),
            range_max: config.tiles_to_pixels(definition.range_max),
            intra_burst_interval_ms: config.intra_burst_interval_ms,
            fan_spread_radians: config.fan_spread_radians(),
            definition,
        }
    }

    /// The weapon's definition.
    #[must_use]
    pub fn definition(&self) -> &WeaponDefinition {
        &self.definition
    }

    /// Interval between trigger pulls after all modifiers.
    #[must_use]
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Weapon accuracy combined with the mounting part's accuracy.
    #[must_use]
    pub const fn combined_accuracy(&self) -> u32 {
        self.combined_accuracy
    }

    /// Time until the next trigger pull is allowed.
    #[must_use]
    pub const fn cooldown_remaining_ms(&self) -> u32 {
        self.cooldown_remaining_ms
    }

    /// Check if the trigger can be pulled.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown_remaining_ms == 0
    }

    /// Queued burst rounds not yet emitted, across every pending trigger.
    #[must_use]
    pub fn burst_remaining(&self) -> u32 {
        self.bursts.iter().map(|b| b.remaining).sum()
    }

    /// Minimum range in pixels.
    #[must_use]
    pub const fn range_min(&self) -> Fixed {
        self.range_min
    }

    /// Maximum range in pixels.
    #[must_use]
    pub const fn range_max(&self) -> Fixed {
        self.range_max
    }

    /// Check if a target at `distance` is inside `[range_min, range_max]`.
    #[must_use]
    pub fn in_range(&self, distance: Fixed) -> bool {
        distance >= self.range_min && distance <= self.range_max
    }

    /// Pull the trigger from `origin` toward `aim_point`.
    ///
    /// Rejections leave the slot untouched. On acceptance the cooldown
    /// restarts at the full interval immediately, however many rounds the
    /// weapon goes on to produce. A burst still queued from an earlier
    /// trigger keeps running alongside the new one.
    pub fn try_fire(
        &mut self,
        origin: Vec2Fixed,
        aim_point: Vec2Fixed,
        mount_alive: bool,
    ) -> FireOutcome {
        if !mount_alive {
            return FireOutcome::Rejected(FireRejection::MountDestroyed);
        }
        if self.definition.delivery == DeliveryType::Swing {
            return FireOutcome::Rejected(FireRejection::Unsupported);
        }
        if !self.is_ready() {
            return FireOutcome::Rejected(FireRejection::Cooling);
        }

        let distance = origin.distance(aim_point);
        if distance < self.range_min {
            tracing::trace!(weapon = %self.definition.name, %distance, "Target inside minimum range");
            return FireOutcome::Rejected(FireRejection::TooClose);
        }
        if distance > self.range_max {
            tracing::trace!(weapon = %self.definition.name, %distance, "Target out of range");
            return FireOutcome::Rejected(FireRejection::OutOfRange);
        }

        let direction = aim_direction(origin, aim_point);
        self.cooldown_remaining_ms = self.interval_ms;

        let rounds = self.definition.projectiles_per_round;
        let spawns = match self.definition.delivery {
            DeliveryType::Fan if rounds > 1 => self.fan(origin, direction, rounds),
            _ if self.definition.is_burst() => {
                self.bursts.push(BurstState {
                    remaining: rounds - 1,
                    timer_ms: self.intra_burst_interval_ms,
                    direction,
                });
                vec![self.spawn(origin, direction)]
            }
            _ => (0..rounds).map(|_| self.spawn(origin, direction)).collect(),
        };

        FireOutcome::Fired(spawns)
    }

    /// Advance cooldown and any queued burst by `dt_ms`.
    ///
    /// `origin` is where burst rounds spawn from this tick. A dead mount
    /// discards the queued rounds before anything is emitted.
    pub fn tick(&mut self, dt_ms: u32, mount_alive: bool, origin: Vec2Fixed) -> SlotTick {
        self.cooldown_remaining_ms = self.cooldown_remaining_ms.saturating_sub(dt_ms);

        let mut result = SlotTick::default();
        if self.bursts.is_empty() {
            return result;
        }

        if !mount_alive {
            result.burst_aborted = self.burst_remaining();
            self.bursts.clear();
            tracing::debug!(
                weapon = %self.definition.name,
                discarded = result.burst_aborted,
                "Burst aborted, mount destroyed"
            );
            return result;
        }

        let mut bursts = std::mem::take(&mut self.bursts);
        for burst in &mut bursts {
            let mut elapsed = dt_ms;
            while burst.remaining > 0 && elapsed >= burst.timer_ms {
                elapsed -= burst.timer_ms;
                burst.remaining -= 1;
                burst.timer_ms = self.intra_burst_interval_ms;
                result.spawned.push(self.spawn(origin, burst.direction));
            }
            if burst.remaining > 0 {
                burst.timer_ms -= elapsed;
            }
        }
        bursts.retain(|b| b.remaining > 0);
        self.bursts = bursts;
        result
    }

    fn fan(&self, origin: Vec2Fixed, direction: Vec2Fixed, rounds: u32) -> Vec<ProjectileSpawn> {
        let spread = self.fan_spread_radians;
        let step = spread / f64::from(rounds - 1);
        (0..rounds)
            .map(|i| {
                let offset = -spread / 2.0 + step * f64::from(i);
                self.spawn(origin, direction.rotate(offset))
            })
            .collect()
    }

    fn spawn(&self, origin: Vec2Fixed, direction: Vec2Fixed) -> ProjectileSpawn {
        ProjectileSpawn {
            origin,
            direction,
            speed: Fixed::from_num(self.definition.projectile_speed),
            attack: self.definition.attack,
            accuracy_ratio: self.combined_accuracy,
            max_range: self.range_max,
            arcing: self.definition.arcing,
        }
    }
}

/// Unit direction from `origin` to `aim_point`, facing +x when they coincide.
pub(crate) fn aim_direction(origin: Vec2Fixed, aim_point: Vec2Fixed) -> Vec2Fixed {
    let direction = (aim_point - origin).normalize();
    if direction == Vec2Fixed::ZERO {
        Vec2Fixed::new(Fixed::ONE, Fixed::ZERO)
    } else {
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeaponKind;

    fn weapon(rounds: u32, delivery: DeliveryType, sequential: bool) -> WeaponDefinition {
        WeaponDefinition {
            id: 21001,
            name: "Test Gun".to_string(),
            kind: WeaponKind::Firing,
            attack: 10,
            accuracy_ratio: 9000,
            defense: 0,
            range_min: 2,
            range_max: 10,
            projectiles_per_round: rounds,
            delivery,
            sequential_fire: sequential,
            attack_interval_ms: 1000,
            local_attack_speed_mod: 0,
            weight: 50,
            projectile_speed: 400,
            arcing: false,
        }
    }

    fn slot(def: WeaponDefinition) -> WeaponSlot {
        WeaponSlot::new(def, 8000, &[], &CombatConfig::default())
    }

    fn origin() -> Vec2Fixed {
        Vec2Fixed::ZERO
    }

    fn aim() -> Vec2Fixed {
        Vec2Fixed::from_pixels(200, 0)
    }

    #[test]
    fn test_combined_accuracy_and_interval() {
        let mut def = weapon(1, DeliveryType::Linear, false);
        def.local_attack_speed_mod = 5000;
        let slot = slot(def);
        assert_eq!(slot.combined_accuracy(), 7200);
        assert_eq!(slot.interval_ms(), 666);
    }

    #[test]
    fn test_fire_sets_cooldown_immediately() {
        let mut slot = slot(weapon(4, DeliveryType::Linear, true));
        let outcome = slot.try_fire(origin(), aim(), true);
        assert_eq!(outcome.spawns().len(), 1);
        assert_eq!(slot.cooldown_remaining_ms(), 1000);
        assert_eq!(slot.burst_remaining(), 3);
    }

    #[test]
    fn test_inside_min_range_is_silent_noop() {
        let mut slot = slot(weapon(1, DeliveryType::Linear, false));
        let close = Vec2Fixed::from_pixels(40, 0);
        assert_eq!(
            slot.try_fire(origin(), close, true),
            FireOutcome::Rejected(FireRejection::TooClose)
        );
        assert!(slot.is_ready());
    }

    #[test]
    fn test_beyond_max_range_rejected() {
        let mut slot = slot(weapon(1, DeliveryType::Linear, false));
        let far = Vec2Fixed::from_pixels(401, 0);
        assert_eq!(
            slot.try_fire(origin(), far, true),
            FireOutcome::Rejected(FireRejection::OutOfRange)
        );
        assert!(slot.is_ready());
    }

    #[test]
    fn test_cooling_rejects_until_decayed() {
        let mut slot = slot(weapon(1, DeliveryType::Linear, false));
        assert!(slot.try_fire(origin(), aim(), true).is_fired());
        assert_eq!(
            slot.try_fire(origin(), aim(), true),
            FireOutcome::Rejected(FireRejection::Cooling)
        );
        slot.tick(999, true, origin());
        assert!(!slot.is_ready());
        slot.tick(50, true, origin());
        assert_eq!(slot.cooldown_remaining_ms(), 0);
        assert!(slot.try_fire(origin(), aim(), true).is_fired());
    }

    #[test]
    fn test_swing_is_unsupported_and_keeps_cooldown() {
        let mut slot = slot(weapon(1, DeliveryType::Swing, false));
        assert_eq!(
            slot.try_fire(origin(), aim(), true),
            FireOutcome::Rejected(FireRejection::Unsupported)
        );
        assert!(slot.is_ready());
    }

    #[test]
    fn test_dead_mount_cannot_fire() {
        let mut slot = slot(weapon(1, DeliveryType::Linear, false));
        assert_eq!(
            slot.try_fire(origin(), aim(), false),
            FireOutcome::Rejected(FireRejection::MountDestroyed)
        );
    }

    #[test]
    fn test_fan_spreads_symmetrically() {
        let mut slot = slot(weapon(5, DeliveryType::Fan, false));
        let outcome = slot.try_fire(origin(), aim(), true);
        let spawns = outcome.spawns();
        assert_eq!(spawns.len(), 5);

        let angles: Vec<f64> = spawns.iter().map(|s| s.direction.angle()).collect();
        let half = 10f64.to_radians();
        assert!((angles[0] + half).abs() < 1e-6);
        assert!(angles[2].abs() < 1e-6);
        assert!((angles[4] - half).abs() < 1e-6);
        assert_eq!(slot.burst_remaining(), 0);
    }

    #[test]
    fn test_non_sequential_linear_spawns_together() {
        let mut slot = slot(weapon(3, DeliveryType::Linear, false));
        let outcome = slot.try_fire(origin(), aim(), true);
        assert_eq!(outcome.spawns().len(), 3);
        assert!(outcome
            .spawns()
            .iter()
            .all(|s| s.direction == outcome.spawns()[0].direction));
        assert!(outcome.spawns()[0].direction.angle().abs() < 1e-6);
    }

    #[test]
    fn test_burst_emits_on_intra_interval() {
        let mut slot = slot(weapon(4, DeliveryType::Linear, true));
        slot.try_fire(origin(), aim(), true);

        assert!(slot.tick(60, true, origin()).spawned.is_empty());
        assert_eq!(slot.tick(40, true, origin()).spawned.len(), 1);
        assert_eq!(slot.tick(250, true, origin()).spawned.len(), 2);
        assert_eq!(slot.burst_remaining(), 0);
        assert!(slot.tick(1000, true, origin()).spawned.is_empty());
    }

    #[test]
    fn test_burst_keeps_trigger_direction() {
        let mut slot = slot(weapon(2, DeliveryType::Linear, true));
        slot.try_fire(origin(), Vec2Fixed::from_pixels(0, 200), true);
        let tick = slot.tick(100, true, Vec2Fixed::from_pixels(50, 50));
        let heading = tick.spawned[0].direction.angle();
        assert!((heading - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(tick.spawned[0].origin, Vec2Fixed::from_pixels(50, 50));
    }

    #[test]
    fn test_dead_mount_aborts_burst() {
        let mut slot = slot(weapon(4, DeliveryType::Linear, true));
        slot.try_fire(origin(), aim(), true);
        assert_eq!(slot.tick(100, true, origin()).spawned.len(), 1);

        let tick = slot.tick(100, false, origin());
        assert!(tick.spawned.is_empty());
        assert_eq!(tick.burst_aborted, 2);
        assert_eq!(slot.burst_remaining(), 0);
    }

    #[test]
    fn test_retrigger_keeps_queued_rounds() {
        let mut def = weapon(4, DeliveryType::Linear, true);
        def.attack_interval_ms = 200;
        let mut slot = slot(def);

        let mut total = slot.try_fire(origin(), aim(), true).spawns().len();
        total += slot.tick(200, true, origin()).spawned.len();
        assert_eq!(slot.burst_remaining(), 1);

        let refire = slot.try_fire(origin(), Vec2Fixed::from_pixels(0, 200), true);
        assert!(refire.is_fired());
        total += refire.spawns().len();
        assert_eq!(slot.burst_remaining(), 4);

        for _ in 0..10 {
            total += slot.tick(100, true, origin()).spawned.len();
        }
        assert_eq!(total, 8);
        assert_eq!(slot.burst_remaining(), 0);
    }

    #[test]
    fn test_dead_mount_aborts_every_queued_burst() {
        let mut def = weapon(4, DeliveryType::Linear, true);
        def.attack_interval_ms = 100;
        let mut slot = slot(def);

        slot.try_fire(origin(), aim(), true);
        assert_eq!(slot.tick(100, true, origin()).spawned.len(), 1);
        slot.try_fire(origin(), aim(), true);

        let tick = slot.tick(16, false, origin());
        assert!(tick.spawned.is_empty());
        assert_eq!(tick.burst_aborted, 5);
        assert_eq!(slot.burst_remaining(), 0);
    }
}
