//! Static data structures consumed by the combat core.
//!
//! Weapon, part and enemy definitions, the combat configuration and mech
//! loadouts are all plain serde structs that can be deserialized from RON.
//!
//! **Note:** This module reads no files - callers hand in RON text or
//! already constructed values.

mod catalog;
mod config;
mod enemy_data;
mod loadout;
mod part_data;
mod weapon_data;

pub use catalog::{CatalogData, DataCatalog};
pub use config::CombatConfig;
pub use enemy_data::{AttackStyle, EnemyDefinition};
pub use loadout::{ArmMounts, LoadoutSpec};
pub use part_data::{PartRecord, PartType};
pub use weapon_data::{DeliveryType, WeaponDefinition, WeaponKind};

use crate::error::CombatError;

/// Parse RON text, wrapping failures in [`CombatError::DataParseError`].
pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(
    what: &str,
    text: &str,
) -> crate::error::Result<T> {
    ron::from_str(text).map_err(|e| CombatError::DataParseError {
        what: what.to_string(),
        message: e.to_string(),
    })
}
