//! Events produced by a simulation tick.
//!
//! Presentation and economy code poll these instead of subscribing to
//! callbacks. Order within a tick is the order things happened.

use serde::{Deserialize, Serialize};

use crate::components::{EntityId, Faction, MountPoint, PartKey};
use crate::math::Vec2Fixed;
use crate::slots::ShieldState;

/// One thing that happened during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum CombatEvent {
    /// A projectile entered the world.
    ProjectileSpawned {
        /// New projectile id.
        projectile: EntityId,
        /// Entity that fired it.
        source: EntityId,
        /// Side that fired it.
        faction: Faction,
        /// Spawn position.
        position: Vec2Fixed,
        /// Unit flight direction.
        direction: Vec2Fixed,
    },
    /// An attack roll failed, or the target had no part left to hit.
    AttackMissed {
        /// Attacking entity.
        source: EntityId,
        /// Intended target.
        target: EntityId,
    },
    /// Damage was applied.
    DamageApplied {
        /// Attacking entity.
        source: EntityId,
        /// Entity that took the damage.
        target: EntityId,
        /// Part struck, for structured targets.
        part: Option<PartKey>,
        /// HP removed.
        damage: u32,
        /// HP of the part (or pool) afterwards.
        new_hp: u32,
        /// Maximum HP of the part (or pool).
        max_hp: u32,
    },
    /// A combatant was destroyed. Emitted once per combatant.
    Destroyed {
        /// Destroyed entity.
        target: EntityId,
        /// Credits paid out.
        bounty: u32,
        /// Faction the bounty goes to.
        credited_to: Faction,
    },
    /// Queued burst rounds were discarded.
    BurstAborted {
        /// Owner of the weapon.
        entity: EntityId,
        /// Mount the weapon sits on.
        mount: MountPoint,
        /// Rounds that will never fire.
        discarded: u32,
    },
    /// A shield flipped between Active and Recharging.
    ShieldStateChanged {
        /// Owner of the shield.
        entity: EntityId,
        /// Mount the shield sits on.
        mount: MountPoint,
        /// New state.
        state: ShieldState,
    },
}

/// Everything that happened during one tick, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvents {
    /// Tick number these events belong to.
    pub tick: u64,
    /// Events in the order they occurred.
    pub events: Vec<CombatEvent>,
}

impl TickEvents {
    /// Create an empty event list for `tick`.
    #[must_use]
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            events: Vec::new(),
        }
    }

    /// Record an event.
    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Check if nothing happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All damage events.
    pub fn damage_events(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, CombatEvent::DamageApplied { .. }))
    }

    /// Ids of every combatant destroyed this tick.
    pub fn destroyed(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.events.iter().filter_map(|e| match e {
            CombatEvent::Destroyed { target, .. } => Some(*target),
            _ => None,
        })
    }

    /// Projectiles spawned this tick.
    #[must_use]
    pub fn spawned_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CombatEvent::ProjectileSpawned { .. }))
            .count()
    }

    /// Total bounty credited to `faction` this tick.
    #[must_use]
    pub fn bounty_for(&self, faction: Faction) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                CombatEvent::Destroyed {
                    bounty,
                    credited_to,
                    ..
                } if *credited_to == faction => *bounty,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounty_for_sums_by_faction() {
        let mut events = TickEvents::new(3);
        events.push(CombatEvent::Destroyed {
            target: 1,
            bounty: 10,
            credited_to: Faction::Player,
        });
        events.push(CombatEvent::Destroyed {
            target: 2,
            bounty: 15,
            credited_to: Faction::Player,
        });
        events.push(CombatEvent::Destroyed {
            target: 3,
            bounty: 99,
            credited_to: Faction::Enemy,
        });

        assert_eq!(events.bounty_for(Faction::Player), 25);
        assert_eq!(events.destroyed().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(events.damage_events().count(), 0);
    }
}
