//! Error types for the combat core.
//!
//! Errors only surface at the data and assembly boundary. Nothing inside a
//! simulation tick returns an error; degenerate inputs fall back to
//! documented defaults instead.

use thiserror::Error;

use crate::components::{EntityId, PartKey};

/// Result type alias using [`CombatError`].
pub type Result<T> = std::result::Result<T, CombatError>;

/// Top-level error type for the combat core.
#[derive(Debug, Error)]
pub enum CombatError {
    /// Data file parsing error.
    #[error("Failed to parse {what}: {message}")]
    DataParseError {
        /// What was being parsed (config, catalog, scenario...).
        what: String,
        /// Error message.
        message: String,
    },

    /// A loadout referenced a part id that is not in the catalog.
    #[error("Unknown part ID {id} for {slot:?}")]
    UnknownPart {
        /// Part slot being assembled.
        slot: PartKey,
        /// Missing part id.
        id: u32,
    },

    /// A part record of the wrong type was used for a slot.
    #[error("Part {id} cannot be mounted as {slot:?}")]
    PartTypeMismatch {
        /// Part slot being assembled.
        slot: PartKey,
        /// Offending part id.
        id: u32,
    },

    /// An enemy name that is not in the catalog.
    #[error("Unknown enemy type: {0}")]
    UnknownEnemy(String),

    /// A definition failed validation.
    #[error("Invalid definition '{name}': {reason}")]
    InvalidDefinition {
        /// Definition name or id.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Invalid entity reference.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The entity exists but cannot take the requested action.
    #[error("Entity {0} has no weapon mounts")]
    NotStructured(EntityId),
}
