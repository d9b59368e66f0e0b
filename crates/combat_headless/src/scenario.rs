//! Scenario loading and setup.
//!
//! Scenarios define the initial battle for headless runs: combat tuning,
//! the data catalog, the player's mechs, terminal and turrets, and the
//! enemy wave.

use std::path::Path;

use combat_core::prelude::*;
use std::result::Result;
use combat_test_utils::fixtures;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// A turret referenced a weapon the catalog doesn't have.
    #[error("Turret weapon {0} not found in catalog")]
    UnknownWeapon(u32),
    /// Catalog validation or entity setup failed.
    #[error(transparent)]
    Combat(#[from] CombatError),
}

/// A player mech and the mounts it fires automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechPlacement {
    /// Parts and weapons.
    pub loadout: LoadoutSpec,
    /// Spawn position in pixels.
    pub position: (i32, i32),
    /// Mounts fired at the nearest enemy whenever they are ready.
    #[serde(default)]
    pub auto_fire: Vec<MountPoint>,
}

/// The player's terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TerminalPlacement {
    /// Center position in pixels.
    pub position: (i32, i32),
    /// Hit points.
    pub hp: u32,
    /// Footprint (width, height) in pixels.
    pub size: (u32, u32),
}

/// A defensive turret.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TurretPlacement {
    /// Catalog weapon id.
    pub weapon: u32,
    /// Position in pixels.
    pub position: (i32, i32),
}

/// A row of identical enemies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Catalog enemy name.
    pub name: String,
    /// Position of the first enemy in pixels.
    pub position: (i32, i32),
    /// Number of enemies in the row.
    #[serde(default = "default_count")]
    pub count: u32,
    /// Offset between consecutive enemies in pixels.
    #[serde(default)]
    pub spacing: (i32, i32),
}

const fn default_count() -> u32 {
    1
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Combat tuning.
    #[serde(default)]
    pub config: CombatConfig,
    /// Parts, weapons and enemies available to this scenario.
    pub catalog: CatalogData,
    /// Player mechs.
    #[serde(default)]
    pub mechs: Vec<MechPlacement>,
    /// Player terminal, if any.
    #[serde(default)]
    pub terminal: Option<TerminalPlacement>,
    /// Player turrets.
    #[serde(default)]
    pub turrets: Vec<TurretPlacement>,
    /// Enemy wave.
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
}

/// Entity ids created by [`Scenario::build`].
#[derive(Debug, Clone, Default)]
pub struct ScenarioHandles {
    /// Each mech's id and its auto-fire mounts.
    pub mechs: Vec<(EntityId, Vec<MountPoint>)>,
    /// Terminal id.
    pub terminal: Option<EntityId>,
    /// Turret ids.
    pub turrets: Vec<EntityId>,
    /// Enemy ids.
    pub enemies: Vec<EntityId>,
}

fn pos((x, y): (i32, i32)) -> Vec2Fixed {
    Vec2Fixed::from_pixels(x, y)
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// The built-in skirmish: one standard mech and two tower guns
    /// defending the terminal against grunts and spitters.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            name: "Builtin Skirmish".to_string(),
            description: "Standard mech, terminal and two turrets against a mixed wave"
                .to_string(),
            config: CombatConfig::default(),
            catalog: fixtures::standard_catalog_data(),
            mechs: vec![MechPlacement {
                loadout: fixtures::standard_loadout(),
                position: (60, 0),
                auto_fire: vec![
                    MountPoint::new(ArmSide::Left, MountSlot::Grip),
                    MountPoint::new(ArmSide::Right, MountSlot::Grip),
                    MountPoint::new(ArmSide::Right, MountSlot::Shoulder),
                ],
            }],
            terminal: Some(TerminalPlacement {
                position: (0, 0),
                hp: 1000,
                size: (60, 60),
            }),
            turrets: vec![
                TurretPlacement {
                    weapon: fixtures::TOWER_GUN_ID,
                    position: (-40, 60),
                },
                TurretPlacement {
                    weapon: fixtures::TOWER_GUN_ID,
                    position: (-40, -60),
                },
            ],
            enemies: vec![
                EnemySpawn {
                    name: "grunt".to_string(),
                    position: (220, -80),
                    count: 5,
                    spacing: (0, 40),
                },
                EnemySpawn {
                    name: "spitter".to_string(),
                    position: (200, 120),
                    count: 2,
                    spacing: (30, 0),
                },
            ],
        }
    }

    /// Validate the catalog and populate a simulation seeded with `seed`.
    pub fn build(&self, seed: u64) -> Result<(Simulation, ScenarioHandles), ScenarioError> {
        let catalog = DataCatalog::from_data(self.catalog.clone())?;
        let mut sim = Simulation::new(self.config.clone(), seed);
        let mut handles = ScenarioHandles::default();

        if let Some(terminal) = self.terminal {
            let (width, height) = terminal.size;
            let id = sim.add_simple(SimpleCombatant::new(
                0,
                Faction::Player,
                pos(terminal.position),
                HitShape::rect_from_size(width, height),
                terminal.hp,
            ));
            handles.terminal = Some(id);
        }

        for mech in &self.mechs {
            let id = sim.add_structured(Faction::Player, pos(mech.position), &mech.loadout, &catalog)?;
            handles.mechs.push((id, mech.auto_fire.clone()));
        }

        for turret in &self.turrets {
            let weapon = catalog
                .weapon(turret.weapon)
                .cloned()
                .ok_or(ScenarioError::UnknownWeapon(turret.weapon))?;
            handles
                .turrets
                .push(sim.add_turret(Faction::Player, pos(turret.position), weapon)?);
        }

        for spawn in &self.enemies {
            let (dx, dy) = spawn.spacing;
            for i in 0..spawn.count as i32 {
                let (x, y) = spawn.position;
                let id = sim.spawn_enemy(&spawn.name, &catalog, pos((x + dx * i, y + dy * i)))?;
                handles.enemies.push(id);
            }
        }

        tracing::info!(
            scenario = %self.name,
            seed,
            mechs = handles.mechs.len(),
            turrets = handles.turrets.len(),
            enemies = handles.enemies.len(),
            "Scenario built"
        );
        Ok((sim, handles))
    }
}
