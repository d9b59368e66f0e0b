//! Mech part records.

use serde::{Deserialize, Serialize};

use crate::components::{CombatantPart, PartKey};

/// Which part slot a record can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartType {
    /// Body / torso.
    Body,
    /// Either arm.
    Arm,
    /// Legs.
    Legs,
}

impl PartType {
    /// Check whether a record of this type can be mounted at `slot`.
    #[must_use]
    pub const fn fits(self, slot: PartKey) -> bool {
        matches!(
            (self, slot),
            (Self::Body, PartKey::Body)
                | (Self::Arm, PartKey::ArmLeft | PartKey::ArmRight)
                | (Self::Legs, PartKey::Legs)
        )
    }
}

/// Static part definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    /// Unique numeric identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Slot this part fits.
    pub part_type: PartType,
    /// Maximum hit points.
    pub hp: u32,
    /// Defense against incoming hits.
    #[serde(default)]
    pub defense: u32,
    /// Accuracy contribution (10000-scale). Used by arms.
    #[serde(default = "default_accuracy")]
    pub accuracy_ratio: u32,
    /// Weight of the part itself.
    #[serde(default)]
    pub weight: u32,
    /// Power output (mostly bodies).
    #[serde(default)]
    pub power_output: u32,
}

const fn default_accuracy() -> u32 {
    10_000
}

impl PartRecord {
    /// Build a fresh, undamaged part from this record.
    #[must_use]
    pub fn instantiate(&self) -> CombatantPart {
        CombatantPart {
            name: self.name.clone(),
            current_hp: self.hp,
            max_hp: self.hp,
            defense: self.defense,
            accuracy_ratio: self.accuracy_ratio,
            weight: self.weight,
            power_output: self.power_output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_type_fits() {
        assert!(PartType::Arm.fits(PartKey::ArmLeft));
        assert!(PartType::Arm.fits(PartKey::ArmRight));
        assert!(!PartType::Arm.fits(PartKey::Body));
        assert!(PartType::Legs.fits(PartKey::Legs));
        assert!(!PartType::Body.fits(PartKey::Legs));
    }

    #[test]
    fn test_instantiate_starts_full() {
        let record = PartRecord {
            id: 11001,
            name: "Body A".to_string(),
            part_type: PartType::Body,
            hp: 300,
            defense: 20,
            accuracy_ratio: 10_000,
            weight: 400,
            power_output: 2000,
        };
        let part = record.instantiate();
        assert_eq!(part.current_hp, 300);
        assert_eq!(part.max_hp, 300);
        assert_eq!(part.defense, 20);
    }
}
