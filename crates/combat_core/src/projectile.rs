//! Projectile flight and expiry.
//!
//! A projectile is either flying or expired. Expiry is terminal: it happens
//! on impact, on solid terrain (non-arcing only) or once the distance flown
//! reaches the weapon's maximum range.

use serde::{Deserialize, Serialize};

use crate::components::{EntityId, Faction};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Terrain queries the combat core needs from the map.
pub trait Terrain {
    /// Whether `point` is inside solid terrain.
    fn is_solid(&self, point: Vec2Fixed) -> bool;

    /// Whether a straight line between two points is unobstructed.
    fn has_line_of_sight(&self, _from: Vec2Fixed, _to: Vec2Fixed) -> bool {
        true
    }
}

/// Terrain with no obstacles.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTerrain;

impl Terrain for OpenTerrain {
    fn is_solid(&self, _point: Vec2Fixed) -> bool {
        false
    }
}

impl<F> Terrain for F
where
    F: Fn(Vec2Fixed) -> bool,
{
    fn is_solid(&self, point: Vec2Fixed) -> bool {
        self(point)
    }
}

/// Flight state of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Still moving and able to hit.
    Flying,
    /// Consumed. Removed by the orchestrator on the same tick.
    Expired,
}

/// Everything a slot decides about a new projectile.
///
/// Owner and faction are filled in by whoever spawns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileSpawn {
    /// Spawn position.
    pub origin: Vec2Fixed,
    /// Unit flight direction.
    pub direction: Vec2Fixed,
    /// Speed in pixels per second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Attack stat carried to the hit resolver.
    pub attack: u32,
    /// Accuracy (10000-scale) carried to the hit resolver.
    pub accuracy_ratio: u32,
    /// Distance after which the projectile expires.
    #[serde(with = "fixed_serde")]
    pub max_range: Fixed,
    /// Arcing projectiles fly over terrain.
    pub arcing: bool,
}

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Projectile id.
    pub id: EntityId,
    /// Entity that fired it.
    pub source: EntityId,
    /// Side that fired it. Only the opposing side can be hit.
    pub faction: Faction,
    /// Current position.
    pub position: Vec2Fixed,
    /// Unit flight direction.
    pub direction: Vec2Fixed,
    /// Speed in pixels per second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Attack stat.
    pub attack: u32,
    /// Accuracy (10000-scale).
    pub accuracy_ratio: u32,
    /// Distance flown so far.
    #[serde(with = "fixed_serde")]
    pub distance_traveled: Fixed,
    /// Distance at which the projectile expires.
    #[serde(with = "fixed_serde")]
    pub max_range: Fixed,
    /// Ignores terrain collision.
    pub arcing: bool,
    /// Collision radius.
    #[serde(with = "fixed_serde")]
    pub radius: Fixed,
    /// Flight state.
    pub state: ProjectileState,
}

impl Projectile {
    /// Create a flying projectile from a slot's spawn request.
    #[must_use]
    pub fn from_spawn(
        id: EntityId,
        source: EntityId,
        faction: Faction,
        spawn: &ProjectileSpawn,
        radius: Fixed,
    ) -> Self {
        Self {
            id,
            source,
            faction,
            position: spawn.origin,
            direction: spawn.direction,
            speed: spawn.speed,
            attack: spawn.attack,
            accuracy_ratio: spawn.accuracy_ratio,
            distance_traveled: Fixed::ZERO,
            max_range: spawn.max_range,
            arcing: spawn.arcing,
            radius,
            state: ProjectileState::Flying,
        }
    }

    /// Velocity in pixels per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2Fixed {
        self.direction.scale(self.speed)
    }

    /// Check if the projectile can still hit something.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.state == ProjectileState::Flying
    }

    /// Mark as consumed.
    pub fn expire(&mut self) {
        self.state = ProjectileState::Expired;
    }

    /// Advance by `dt_ms` of flight time.
    pub fn advance(&mut self, dt_ms: u32, terrain: &dyn Terrain) -> ProjectileState {
        if !self.is_flying() {
            return self.state;
        }

        let step = self.speed * Fixed::from_num(dt_ms) / Fixed::from_num(1000);
        let next = self.position + self.direction.scale(step);

        if !self.arcing && terrain.is_solid(next) {
            self.expire();
            return self.state;
        }

        self.position = next;
        self.distance_traveled = self.distance_traveled.saturating_add(step);
        if self.distance_traveled >= self.max_range {
            self.expire();
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet(range: i32, arcing: bool) -> Projectile {
        let spawn = ProjectileSpawn {
            origin: Vec2Fixed::ZERO,
            direction: Vec2Fixed::from_pixels(1, 0),
            speed: Fixed::from_num(400),
            attack: 10,
            accuracy_ratio: 10_000,
            max_range: Fixed::from_num(range),
            arcing,
        };
        Projectile::from_spawn(1, 0, Faction::Player, &spawn, Fixed::from_num(4))
    }

    #[test]
    fn test_moves_by_speed_times_dt() {
        let mut p = bullet(1000, false);
        assert_eq!(p.advance(100, &OpenTerrain), ProjectileState::Flying);
        assert_eq!(p.position, Vec2Fixed::from_pixels(40, 0));
        assert_eq!(p.distance_traveled, Fixed::from_num(40));
    }

    #[test]
    fn test_expires_at_max_range() {
        let mut p = bullet(80, false);
        assert_eq!(p.advance(100, &OpenTerrain), ProjectileState::Flying);
        assert_eq!(p.advance(100, &OpenTerrain), ProjectileState::Expired);
        assert_eq!(p.position, Vec2Fixed::from_pixels(80, 0));
    }

    #[test]
    fn test_terrain_expires_without_moving() {
        let wall = |point: Vec2Fixed| point.x >= Fixed::from_num(60);
        let mut p = bullet(1000, false);
        p.advance(100, &wall);
        assert_eq!(p.advance(100, &wall), ProjectileState::Expired);
        assert_eq!(p.position, Vec2Fixed::from_pixels(40, 0));
    }

    #[test]
    fn test_arcing_ignores_terrain() {
        let wall = |point: Vec2Fixed| point.x >= Fixed::from_num(60);
        let mut p = bullet(1000, true);
        p.advance(100, &wall);
        assert_eq!(p.advance(100, &wall), ProjectileState::Flying);
        assert_eq!(p.position, Vec2Fixed::from_pixels(80, 0));
    }

    #[test]
    fn test_expired_projectile_stays_put() {
        let mut p = bullet(1000, false);
        p.expire();
        p.advance(100, &OpenTerrain);
        assert_eq!(p.position, Vec2Fixed::ZERO);
    }
}
