//! Indexed lookup over all static definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{EnemyDefinition, PartRecord, WeaponDefinition};
use crate::error::{CombatError, Result};

/// Raw catalog contents as written in data files.
///
/// # Example RON
///
/// ```ron
/// CatalogData(
///     parts: [ /* PartRecord */ ],
///     weapons: [ /* WeaponDefinition */ ],
///     enemies: [ /* EnemyDefinition */ ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    /// Part records.
    #[serde(default)]
    pub parts: Vec<PartRecord>,
    /// Weapon and shield definitions.
    #[serde(default)]
    pub weapons: Vec<WeaponDefinition>,
    /// Enemy definitions.
    #[serde(default)]
    pub enemies: Vec<EnemyDefinition>,
}

/// Validated, indexed catalog.
///
/// Built once at load time; assembly and spawning only read from it.
#[derive(Debug, Clone, Default)]
pub struct DataCatalog {
    parts: HashMap<u32, PartRecord>,
    weapons: HashMap<u32, WeaponDefinition>,
    enemies: HashMap<String, EnemyDefinition>,
}

impl DataCatalog {
    /// Parse and index a catalog from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        Self::from_data(super::parse_ron("data catalog", text)?)
    }

    /// Validate and index raw catalog data.
    ///
    /// Duplicate ids and definitions that fail validation are rejected.
    pub fn from_data(data: CatalogData) -> Result<Self> {
        let mut catalog = Self::default();

        for part in data.parts {
            if part.hp == 0 {
                return Err(CombatError::InvalidDefinition {
                    name: part.name,
                    reason: "part hp must be positive".to_string(),
                });
            }
            let id = part.id;
            if catalog.parts.insert(id, part).is_some() {
                return Err(duplicate("part", &id.to_string()));
            }
        }

        for weapon in data.weapons {
            weapon.validate()?;
            let id = weapon.id;
            if catalog.weapons.insert(id, weapon).is_some() {
                return Err(duplicate("weapon", &id.to_string()));
            }
        }

        for enemy in data.enemies {
            let name = enemy.name.clone();
            if catalog.enemies.insert(name.clone(), enemy).is_some() {
                return Err(duplicate("enemy", &name));
            }
        }

        tracing::debug!(
            parts = catalog.parts.len(),
            weapons = catalog.weapons.len(),
            enemies = catalog.enemies.len(),
            "Data catalog indexed"
        );

        Ok(catalog)
    }

    /// Look up a part record.
    #[must_use]
    pub fn part(&self, id: u32) -> Option<&PartRecord> {
        self.parts.get(&id)
    }

    /// Look up a weapon or shield definition.
    #[must_use]
    pub fn weapon(&self, id: u32) -> Option<&WeaponDefinition> {
        self.weapons.get(&id)
    }

    /// Look up an enemy definition by name.
    pub fn enemy(&self, name: &str) -> Result<&EnemyDefinition> {
        self.enemies
            .get(name)
            .ok_or_else(|| CombatError::UnknownEnemy(name.to_string()))
    }

    /// Add or replace a weapon definition.
    pub fn insert_weapon(&mut self, weapon: WeaponDefinition) -> Result<()> {
        weapon.validate()?;
        self.weapons.insert(weapon.id, weapon);
        Ok(())
    }

    /// Add or replace a part record.
    pub fn insert_part(&mut self, part: PartRecord) {
        self.parts.insert(part.id, part);
    }

    /// Add or replace an enemy definition.
    pub fn insert_enemy(&mut self, enemy: EnemyDefinition) {
        self.enemies.insert(enemy.name.clone(), enemy);
    }
}

fn duplicate(kind: &str, key: &str) -> CombatError {
    CombatError::InvalidDefinition {
        name: key.to_string(),
        reason: format!("duplicate {kind} definition"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        CatalogData(
            parts: [
                (id: 11001, name: "Body A", part_type: Body, hp: 300, defense: 20, weight: 400, power_output: 2000),
                (id: 12001, name: "Arm A", part_type: Arm, hp: 150, defense: 10, accuracy_ratio: 9500, weight: 150),
            ],
            weapons: [
                (id: 21001, name: "Rifle", attack: 20, range_max: 8, attack_interval_ms: 500),
            ],
            enemies: [
                (name: "Grunt", hp: 50, bounty: 10),
            ],
        )
    "#;

    #[test]
    fn test_parse_catalog() {
        let catalog = DataCatalog::from_ron(CATALOG).unwrap();
        assert_eq!(catalog.part(11001).unwrap().hp, 300);
        assert_eq!(catalog.part(12001).unwrap().accuracy_ratio, 9500);
        assert_eq!(catalog.weapon(21001).unwrap().attack, 20);
        assert_eq!(catalog.enemy("Grunt").unwrap().bounty, 10);
        assert!(catalog.weapon(99).is_none());
    }

    #[test]
    fn test_unknown_enemy() {
        let catalog = DataCatalog::from_ron(CATALOG).unwrap();
        assert!(matches!(
            catalog.enemy("Dragon"),
            Err(CombatError::UnknownEnemy(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = r#"
            CatalogData(weapons: [
                (id: 1, name: "A", attack_interval_ms: 500),
                (id: 1, name: "B", attack_interval_ms: 500),
            ])
        "#;
        assert!(matches!(
            DataCatalog::from_ron(text),
            Err(CombatError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_parse_error_reports_context() {
        let err = DataCatalog::from_ron("CatalogData(parts: 3)").unwrap_err();
        assert!(err.to_string().contains("data catalog"));
    }
}
