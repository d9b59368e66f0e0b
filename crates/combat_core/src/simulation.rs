//! Per-tick combat loop.
//!
//! The simulation owns every combatant, turret and projectile and advances
//! them in a fixed order. Everything runs on one thread inside a single call;
//! destruction takes effect immediately and is checked before every
//! subsequent operation on the same entity.
//!
//! # Example
//!
//! ```
//! use combat_core::prelude::*;
//!
//! let mut sim = Simulation::new(CombatConfig::default(), 42);
//! let terminal = sim.add_simple(SimpleCombatant::new(
//!     0,
//!     Faction::Player,
//!     Vec2Fixed::from_pixels(400, 400),
//!     HitShape::rect_from_size(60, 60),
//!     1000,
//! ));
//!
//! let events = sim.tick(16);
//! assert_eq!(sim.tick_count(), 1);
//! assert!(events.is_empty());
//! assert!(sim.combatant(terminal).is_some());
//! ```

use std::fmt;

use rand_chacha::ChaCha8Rng;

use crate::collision;
use crate::combatant::{Combatant, SimpleCombatant, StructuredCombatant};
use crate::components::{EntityId, Faction, MountPoint};
use crate::data::{AttackStyle, CombatConfig, DataCatalog, LoadoutSpec, WeaponDefinition};
use crate::error::{CombatError, Result};
use crate::events::{CombatEvent, TickEvents};
use crate::hit;
use crate::math::{Fixed, Vec2Fixed};
use crate::projectile::{OpenTerrain, Projectile, ProjectileSpawn, Terrain};
use crate::rng::{self, CombatRng};
use crate::slots::{self, FireOutcome, FireRejection, Mount};
use crate::turret::Turret;

/// The combat orchestrator.
///
/// # Tick Order
///
/// 1. **Combatants** - slot timers, burst rounds, shield cycles, enemy attacks
/// 2. **Projectiles** - flight and expiry
/// 3. **Collisions** - first overlapping opposing target, hit roll, damage, bounty
/// 4. **Turrets** - retarget and fire
/// 5. **Prune** - destroyed combatants and expired projectiles are removed
pub struct Simulation<R: CombatRng = ChaCha8Rng> {
    config: CombatConfig,
    tick: u64,
    next_id: EntityId,
    combatants: Vec<Combatant>,
    turrets: Vec<Turret>,
    projectiles: Vec<Projectile>,
    pending: Vec<CombatEvent>,
    rng: R,
    terrain: Box<dyn Terrain>,
}

impl Simulation<ChaCha8Rng> {
    /// Create an empty simulation with a seeded generator.
    #[must_use]
    pub fn new(config: CombatConfig, seed: u64) -> Self {
        Self::with_rng(config, rng::seeded(seed))
    }
}

impl<R: CombatRng> Simulation<R> {
    /// Create an empty simulation drawing from `rng`.
    pub fn with_rng(config: CombatConfig, rng: R) -> Self {
        Self {
            config,
            tick: 0,
            next_id: 1,
            combatants: Vec::new(),
            turrets: Vec::new(),
            projectiles: Vec::new(),
            pending: Vec::new(),
            rng,
            terrain: Box::new(OpenTerrain),
        }
    }

    /// Replace the terrain collaborator.
    pub fn set_terrain(&mut self, terrain: impl Terrain + 'static) {
        self.terrain = Box::new(terrain);
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Number of ticks run so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// The random source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ------------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------------

    /// Assemble a mech from `loadout` and add it.
    pub fn add_structured(
        &mut self,
        faction: Faction,
        position: Vec2Fixed,
        loadout: &LoadoutSpec,
        catalog: &DataCatalog,
    ) -> Result<EntityId> {
        let id = self.allocate_id();
        let mech =
            StructuredCombatant::assemble(id, faction, position, loadout, catalog, &self.config)?;
        self.combatants.push(mech.into());
        Ok(id)
    }

    /// Add a simple combatant. Its id is replaced by a fresh one.
    pub fn add_simple(&mut self, mut combatant: SimpleCombatant) -> EntityId {
        let id = self.allocate_id();
        combatant.id = id;
        self.combatants.push(combatant.into());
        id
    }

    /// Spawn a catalog enemy by name.
    pub fn spawn_enemy(
        &mut self,
        name: &str,
        catalog: &DataCatalog,
        position: Vec2Fixed,
    ) -> Result<EntityId> {
        let def = catalog.enemy(name)?;
        Ok(self.add_simple(SimpleCombatant::from_definition(0, def, position)))
    }

    /// Add a turret armed with `weapon`.
    pub fn add_turret(
        &mut self,
        faction: Faction,
        position: Vec2Fixed,
        weapon: WeaponDefinition,
    ) -> Result<EntityId> {
        weapon.validate()?;
        let id = self.allocate_id();
        self.turrets
            .push(Turret::new(id, faction, position, weapon, &self.config));
        Ok(id)
    }

    /// Move a combatant.
    pub fn set_position(&mut self, id: EntityId, position: Vec2Fixed) -> Result<()> {
        self.combatant_mut(id)
            .ok_or(CombatError::EntityNotFound(id))?
            .set_position(position);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Look up a combatant.
    #[must_use]
    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id() == id)
    }

    /// Look up a combatant mutably.
    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id() == id)
    }

    /// All live combatants in iteration order.
    #[must_use]
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    /// All turrets.
    #[must_use]
    pub fn turrets(&self) -> &[Turret] {
        &self.turrets
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Pull the trigger on one of a mech's mounts.
    ///
    /// Spawned projectiles enter the world immediately; their spawn events
    /// are reported with the next tick.
    pub fn request_fire(
        &mut self,
        entity: EntityId,
        mount: MountPoint,
        aim_point: Vec2Fixed,
    ) -> Result<FireOutcome> {
        let mech = self
            .combatants
            .iter_mut()
            .find(|c| c.id() == entity)
            .ok_or(CombatError::EntityNotFound(entity))?
            .as_structured_mut()
            .ok_or(CombatError::NotStructured(entity))?;

        let alive = mech.arm_alive(mount.arm);
        let origin = mech.position;
        let faction = mech.faction;
        let outcome = match mech.mount_mut(mount) {
            Mount::Empty => FireOutcome::Rejected(FireRejection::EmptyMount),
            Mount::Shield(_) => FireOutcome::Rejected(FireRejection::NotAWeapon),
            Mount::Weapon(slot) => slot.try_fire(origin, aim_point, alive),
        };

        if let FireOutcome::Fired(spawns) = &outcome {
            let mut spawned = Vec::with_capacity(spawns.len());
            self.launch(entity, faction, spawns, &mut spawned);
            self.pending.append(&mut spawned);
        }
        Ok(outcome)
    }

    /// Advance the simulation by `dt_ms`, clamped to the configured maximum.
    pub fn tick(&mut self, dt_ms: u32) -> TickEvents {
        let dt_ms = self.config.clamp_delta(dt_ms);
        self.tick += 1;

        let mut events = TickEvents::new(self.tick);
        events.events.append(&mut self.pending);

        // 1. Combatants
        self.run_combatant_updates(dt_ms, &mut events);

        // 2. Projectiles
        for projectile in &mut self.projectiles {
            projectile.advance(dt_ms, self.terrain.as_ref());
        }

        // 3. Collisions
        self.run_collisions(&mut events);
        self.projectiles.retain(Projectile::is_flying);

        // 4. Turrets
        self.run_turrets(dt_ms, &mut events);

        // 5. Prune
        self.combatants.retain(|c| !c.is_destroyed());

        tracing::debug!(
            tick = self.tick,
            dt_ms,
            combatants = self.combatants.len(),
            projectiles = self.projectiles.len(),
            events = events.events.len(),
            "Combat tick complete"
        );

        events
    }

    // ------------------------------------------------------------------------
    // Systems
    // ------------------------------------------------------------------------

    fn run_combatant_updates(&mut self, dt_ms: u32, events: &mut TickEvents) {
        for index in 0..self.combatants.len() {
            if self.combatants[index].is_destroyed() {
                continue;
            }

            match &mut self.combatants[index] {
                Combatant::Structured(mech) => {
                    let id = mech.id;
                    let faction = mech.faction;
                    let ticks = mech.tick_slots(dt_ms);

                    for (mount, slot_tick) in ticks.weapons {
                        if slot_tick.burst_aborted > 0 {
                            events.push(CombatEvent::BurstAborted {
                                entity: id,
                                mount,
                                discarded: slot_tick.burst_aborted,
                            });
                        }
                        self.launch(id, faction, &slot_tick.spawned, &mut events.events);
                    }
                    for (mount, state) in ticks.shields {
                        events.push(CombatEvent::ShieldStateChanged {
                            entity: id,
                            mount,
                            state,
                        });
                    }
                }
                Combatant::Simple(simple) => {
                    let Some(attack) = simple.attack.as_mut() else {
                        continue;
                    };
                    attack.cool_down(dt_ms);
                    if attack.is_ready() {
                        self.run_enemy_attack(index, events);
                    }
                }
            }
        }
    }

    fn run_enemy_attack(&mut self, attacker: usize, events: &mut TickEvents) {
        let Combatant::Simple(simple) = &self.combatants[attacker] else {
            return;
        };
        let Some(attack) = simple.attack.clone() else {
            return;
        };
        let source = simple.id;
        let faction = simple.faction;
        let origin = simple.position;

        let Some(target) = self.combatants.iter().position(|c| {
            c.faction() == faction.opposing()
                && !c.is_destroyed()
                && origin.distance(c.position()) <= attack.range
        }) else {
            return;
        };

        if let Combatant::Simple(simple) = &mut self.combatants[attacker] {
            if let Some(attack) = simple.attack.as_mut() {
                attack.trigger();
            }
        }

        match attack.style {
            AttackStyle::Melee => {
                self.strike(source, target, attack.accuracy_ratio, attack.attack, events);
            }
            AttackStyle::Ranged => {
                let aim = self.combatants[target].position();
                let spawn = ProjectileSpawn {
                    origin,
                    direction: slots::aim_direction(origin, aim),
                    speed: attack.projectile_speed,
                    attack: attack.attack,
                    accuracy_ratio: attack.accuracy_ratio,
                    max_range: attack.range,
                    arcing: false,
                };
                self.launch(source, faction, &[spawn], &mut events.events);
            }
        }
    }

    fn run_collisions(&mut self, events: &mut TickEvents) {
        for index in 0..self.projectiles.len() {
            let projectile = &self.projectiles[index];
            if !projectile.is_flying() {
                continue;
            }

            let (source, position, radius) =
                (projectile.source, projectile.position, projectile.radius);
            let (accuracy, attack) = (projectile.accuracy_ratio, projectile.attack);
            let victim_faction = projectile.faction.opposing();

            let Some(target) = self.combatants.iter().position(|c| {
                c.faction() == victim_faction
                    && !c.is_destroyed()
                    && collision::overlaps(position, radius, c.position(), c.shape())
            }) else {
                continue;
            };

            self.strike(source, target, accuracy, attack, events);
            self.projectiles[index].expire();
        }
    }

    fn run_turrets(&mut self, dt_ms: u32, events: &mut TickEvents) {
        if self.turrets.is_empty() {
            return;
        }

        let candidates_for = |faction: Faction| -> Vec<(EntityId, Vec2Fixed)> {
            self.combatants
                .iter()
                .filter(|c| c.faction() == faction && !c.is_destroyed())
                .map(|c| (c.id(), c.position()))
                .collect()
        };
        let candidates = [
            candidates_for(Faction::Player.opposing()),
            candidates_for(Faction::Enemy.opposing()),
        ];

        let mut volleys = Vec::new();
        for turret in &mut self.turrets {
            let spawns = turret.update(
                dt_ms,
                &candidates[turret.faction.index()],
                self.terrain.as_ref(),
            );
            if !spawns.is_empty() {
                volleys.push((turret.id, turret.faction, spawns));
            }
        }

        for (id, faction, spawns) in volleys {
            self.launch(id, faction, &spawns, &mut events.events);
        }
    }

    /// Resolve one attack against `self.combatants[target]` and record it.
    fn strike(
        &mut self,
        source: EntityId,
        target: usize,
        accuracy: u32,
        attack: u32,
        events: &mut TickEvents,
    ) {
        let victim = &mut self.combatants[target];
        let outcome = hit::resolve_hit(accuracy, attack, victim, &mut self.rng);

        let Some(applied) = hit::apply_hit(victim, &outcome) else {
            events.push(CombatEvent::AttackMissed {
                source,
                target: victim.id(),
            });
            return;
        };

        events.push(CombatEvent::DamageApplied {
            source,
            target: victim.id(),
            part: applied.part,
            damage: applied.dealt,
            new_hp: applied.new_hp,
            max_hp: applied.max_hp,
        });

        if applied.destroyed_now {
            let credited_to = victim.faction().opposing();
            tracing::debug!(
                entity = victim.id(),
                source,
                bounty = victim.bounty(),
                "Combatant destroyed"
            );
            events.push(CombatEvent::Destroyed {
                target: victim.id(),
                bounty: victim.bounty(),
                credited_to,
            });
        }
    }

    fn launch(
        &mut self,
        source: EntityId,
        faction: Faction,
        spawns: &[ProjectileSpawn],
        events: &mut Vec<CombatEvent>,
    ) {
        let radius = Fixed::from_num(self.config.projectile_radius);
        for spawn in spawns {
            let id = self.allocate_id();
            self.projectiles
                .push(Projectile::from_spawn(id, source, faction, spawn, radius));
            events.push(CombatEvent::ProjectileSpawned {
                projectile: id,
                source,
                faction,
                position: spawn.origin,
                direction: spawn.direction,
            });
        }
    }
}

impl<R: CombatRng> fmt::Debug for Simulation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.tick)
            .field("combatants", &self.combatants.len())
            .field("turrets", &self.turrets.len())
            .field("projectiles", &self.projectiles.len())
            .finish_non_exhaustive()
    }
}
