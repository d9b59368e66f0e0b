//! # Combat Core
//!
//! Combat resolution core for the mech defense game.
//!
//! This crate decides whether an attack lands, which part of a structured
//! target is hit, how much damage is dealt, and how weapon and shield
//! readiness evolves over time. It contains **only** simulation logic:
//! - No rendering
//! - No IO (data is handed in already parsed, or as RON text)
//! - No global state (configuration is passed explicitly)
//! - No ambient randomness (every roll goes through an injected [`rng::CombatRng`])
//!
//! ## Crate Structure
//!
//! - [`formulas`] - 10000-scale fixed-point combat formulas
//! - [`targeting`] - Weighted part selection with reroll
//! - [`hit`] - Hit resolution and damage application
//! - [`projectile`] - Projectile flight and expiry
//! - [`slots`] - Weapon and shield slot state machines
//! - [`combatant`] - Structured and simple combatants, loadout assembly
//! - [`turret`] - Auto-targeting defensive structures
//! - [`simulation`] - Per-tick combat loop orchestrator
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod collision;
pub mod combatant;
pub mod components;
pub mod data;
pub mod error;
pub mod events;
pub mod formulas;
pub mod hit;
pub mod math;
pub mod projectile;
pub mod rng;
pub mod simulation;
pub mod slots;
pub mod targeting;
pub mod turret;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::combatant::{Combatant, EnemyAttack, SimpleCombatant, StructuredCombatant};
    pub use crate::components::{ArmSide, EntityId, Faction, HitShape, MountPoint, MountSlot, PartKey};
    pub use crate::data::{
        ArmMounts, AttackStyle, CatalogData, CombatConfig, DataCatalog, DeliveryType, EnemyDefinition,
        LoadoutSpec, PartRecord, PartType, WeaponDefinition, WeaponKind,
    };
    pub use crate::error::{CombatError, Result};
    pub use crate::events::{CombatEvent, TickEvents};
    pub use crate::hit::HitOutcome;
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::projectile::{OpenTerrain, Projectile, ProjectileSpawn, Terrain};
    pub use crate::rng::{CombatRng, ScriptedRng};
    pub use crate::simulation::Simulation;
    pub use crate::slots::{FireOutcome, FireRejection, Mount, ShieldSlot, ShieldState, WeaponSlot};
    pub use crate::turret::Turret;
}
