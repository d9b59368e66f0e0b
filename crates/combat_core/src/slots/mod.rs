//! Per-mount weapon and shield state machines.
//!
//! Each mount point holds at most one slot. A slot never inspects its owner:
//! whether the mounting part is still alive is passed in on every call, so a
//! destroyed arm takes effect the moment its HP check fails.

mod shield_slot;
mod weapon_slot;

pub use shield_slot::{ShieldSlot, ShieldState};
pub use weapon_slot::{FireOutcome, FireRejection, SlotTick, WeaponSlot};

pub(crate) use weapon_slot::aim_direction;

/// Contents of one mount point.
#[derive(Debug, Clone, Default)]
pub enum Mount {
    /// Nothing mounted, or the loadout referenced an unknown weapon.
    #[default]
    Empty,
    /// A firing weapon.
    Weapon(WeaponSlot),
    /// A shield generator.
    Shield(ShieldSlot),
}

impl Mount {
    /// The weapon slot, if this mount holds one.
    #[must_use]
    pub fn weapon(&self) -> Option<&WeaponSlot> {
        match self {
            Self::Weapon(slot) => Some(slot),
            _ => None,
        }
    }

    /// Mutable weapon slot, if this mount holds one.
    pub fn weapon_mut(&mut self) -> Option<&mut WeaponSlot> {
        match self {
            Self::Weapon(slot) => Some(slot),
            _ => None,
        }
    }

    /// The shield slot, if this mount holds one.
    #[must_use]
    pub fn shield(&self) -> Option<&ShieldSlot> {
        match self {
            Self::Shield(slot) => Some(slot),
            _ => None,
        }
    }

    /// Check if nothing is mounted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Weight of the mounted item.
    #[must_use]
    pub fn weight(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Weapon(slot) => slot.definition().weight,
            Self::Shield(slot) => slot.definition().weight,
        }
    }
}
