//! # Combat Test Utilities
//!
//! Shared testing utilities for the combat crates:
//! - Fixture catalogs, loadouts and enemies
//! - Determinism harness for replaying seeded simulations
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
