//! Auto-targeting defensive structures.

use crate::components::{EntityId, Faction};
use crate::data::{CombatConfig, WeaponDefinition};
use crate::formulas::RATIO_SCALE;
use crate::math::Vec2Fixed;
use crate::projectile::{ProjectileSpawn, Terrain};
use crate::slots::{FireOutcome, WeaponSlot};

/// A stationary structure that fires a weapon at the nearest-in-line enemy.
///
/// Targeting keeps the current target while it is alive, in range and in
/// line of sight; otherwise it takes the first candidate that qualifies.
#[derive(Debug, Clone)]
pub struct Turret {
    /// Entity id.
    pub id: EntityId,
    /// Side it fights for.
    pub faction: Faction,
    /// World position.
    pub position: Vec2Fixed,
    slot: WeaponSlot,
    target: Option<EntityId>,
}

impl Turret {
    /// Build a turret around a weapon. Turrets have no arm, so the weapon's
    /// own accuracy is used as is.
    #[must_use]
    pub fn new(
        id: EntityId,
        faction: Faction,
        position: Vec2Fixed,
        weapon: WeaponDefinition,
        config: &CombatConfig,
    ) -> Self {
        Self {
            id,
            faction,
            position,
            slot: WeaponSlot::new(weapon, RATIO_SCALE, &[], config),
            target: None,
        }
    }

    /// The turret's weapon slot.
    #[must_use]
    pub fn slot(&self) -> &WeaponSlot {
        &self.slot
    }

    /// Currently tracked target.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Advance one tick against `candidates`, the live opposing targets in
    /// iteration order. Returns every projectile spawned this tick.
    pub fn update(
        &mut self,
        dt_ms: u32,
        candidates: &[(EntityId, Vec2Fixed)],
        terrain: &dyn Terrain,
    ) -> Vec<ProjectileSpawn> {
        let mut spawned = self.slot.tick(dt_ms, true, self.position).spawned;

        let engageable = |&(_, position): &(EntityId, Vec2Fixed)| {
            self.slot.in_range(self.position.distance(position))
                && terrain.has_line_of_sight(self.position, position)
        };

        let current = self
            .target
            .and_then(|id| candidates.iter().find(|(cid, _)| *cid == id))
            .filter(|candidate| engageable(candidate));
        let target = current.or_else(|| candidates.iter().find(|candidate| engageable(candidate)));

        if target.map(|(id, _)| *id) != self.target {
            tracing::trace!(turret = self.id, acquired = ?target.map(|(id, _)| *id), "Turret retargeted");
        }
        self.target = target.map(|(id, _)| *id);

        if let Some(&(_, aim)) = target {
            if let FireOutcome::Fired(spawns) = self.slot.try_fire(self.position, aim, true) {
                spawned.extend(spawns);
            }
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DeliveryType, WeaponKind};
    use crate::projectile::OpenTerrain;

    fn tower_gun() -> WeaponDefinition {
        WeaponDefinition {
            id: 30001,
            name: "Tower Gun".to_string(),
            kind: WeaponKind::Firing,
            attack: 25,
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

    fn turret() -> Turret {
        Turret::new(
            1,
            Faction::Player,
            Vec2Fixed::ZERO,
            tower_gun(),
            &CombatConfig::default(),
        )
    }

    #[test]
    fn test_acquires_first_in_range() {
        let mut turret = turret();
        let candidates = [
            (10, Vec2Fixed::from_pixels(500, 0)),
            (11, Vec2Fixed::from_pixels(100, 0)),
            (12, Vec2Fixed::from_pixels(50, 0)),
        ];
        let spawned = turret.update(16, &candidates, &OpenTerrain);
        assert_eq!(turret.target(), Some(11));
        assert_eq!(spawned.len(), 1);
        assert!(!turret.slot().is_ready());
    }

    #[test]
    fn test_keeps_target_until_invalid() {
        let mut turret = turret();
        turret.update(16, &[(11, Vec2Fixed::from_pixels(100, 0))], &OpenTerrain);

        let candidates = [
            (10, Vec2Fixed::from_pixels(20, 0)),
            (11, Vec2Fixed::from_pixels(120, 0)),
        ];
        turret.update(16, &candidates, &OpenTerrain);
        assert_eq!(turret.target(), Some(11));

        // Target 11 gone from the candidate list (dead)
        turret.update(16, &candidates[..1], &OpenTerrain);
        assert_eq!(turret.target(), Some(10));
    }

    #[test]
    fn test_line_of_sight_blocks_acquisition() {
        struct Wall;
        impl Terrain for Wall {
            fn is_solid(&self, _point: Vec2Fixed) -> bool {
                false
            }
            fn has_line_of_sight(&self, _from: Vec2Fixed, to: Vec2Fixed) -> bool {
                to.y >= crate::math::Fixed::ZERO
            }
        }

        let mut turret = turret();
        let candidates = [
            (10, Vec2Fixed::from_pixels(0, -100)),
            (11, Vec2Fixed::from_pixels(0, 100)),
        ];
        turret.update(16, &candidates, &Wall);
        assert_eq!(turret.target(), Some(11));
    }

    #[test]
    fn test_no_target_no_fire() {
        let mut turret = turret();
        let spawned = turret.update(16, &[(10, Vec2Fixed::from_pixels(1000, 0))], &OpenTerrain);
        assert!(spawned.is_empty());
        assert_eq!(turret.target(), None);
        assert!(turret.slot().is_ready());
    }
}
