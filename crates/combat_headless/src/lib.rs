//! Headless combat runner for balance checks and CI verification.
//!
//! Loads a RON [`Scenario`], drives the combat simulation for a fixed number
//! of ticks with a seeded RNG, and reports what happened:
//!
//! - **stdout**: JSON lines, one [`combat_core::events::TickEvents`] per
//!   non-empty tick (with `--json`)
//! - **stderr**: logs, including the run summary
//!
//! # Example
//!
//! ```bash
//! # Run the built-in fixture scenario
//! cargo run -p combat_headless -- builtin
//!
//! # Run a scenario file and stream events
//! cargo run -p combat_headless -- run --scenario crates/combat_headless/scenarios/skirmish.ron --json
//! ```

pub mod runner;
pub mod scenario;

pub use runner::{run_scenario, FactionTotals, RunConfig, RunError, RunOutcome, RunSummary};
pub use scenario::{Scenario, ScenarioError, ScenarioHandles};
