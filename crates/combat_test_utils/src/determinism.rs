//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a seeded simulation produces the
//! same event stream every time it is replayed.
//!
//! # Testing Strategy
//!
//! Combat results must be reproducible from a seed so that replays, balance
//! runs and bug reports can be re-run exactly. Sources of non-determinism
//! include:
//!
//! - **Floating-point math**: positions, speeds and hit chances use
//!   [`combat_core::math::Fixed`]. The only floats are fan-spread angles,
//!   which are computed once per shot from integer inputs.
//!
//! - **HashMap iteration order**: the catalog is only ever looked up by key,
//!   never iterated during a tick.
//!
//! - **System randomness**: every roll goes through the simulation's
//!   seeded [`combat_core::rng::CombatRng`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use combat_core::prelude::*;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick, returning a hash
///   of what happened
pub fn verify_determinism<S, Setup, Step>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        let mut hasher = DefaultHasher::new();

        for _ in 0..ticks {
            step(&mut state).hash(&mut hasher);
        }

        hashes.push(hasher.finish());
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Hash one tick's events.
///
/// Events carry fixed-point values without a `Hash` impl in every variant,
/// so the debug rendering is hashed instead. It is stable for a given build.
#[must_use]
pub fn events_hash(events: &TickEvents) -> u64 {
    compute_hash(&format!("{events:?}"))
}

/// Run `ticks` ticks of `dt_ms` and collect every tick's events.
pub fn record_events<R: CombatRng>(
    sim: &mut Simulation<R>,
    ticks: u64,
    dt_ms: u32,
) -> Vec<TickEvents> {
    (0..ticks).map(|_| sim.tick(dt_ms)).collect()
}

/// Run a simulation twice with identical setup and compare event streams.
pub fn verify_simulation_determinism<F>(setup_fn: F, num_ticks: u64, dt_ms: u32) -> bool
where
    F: Fn() -> Simulation,
{
    verify_determinism(2, num_ticks, &setup_fn, |sim| events_hash(&sim.tick(dt_ms)))
        .is_deterministic
}

/// Find the first tick at which two identically set up simulations emit
/// different events.
///
/// # Returns
///
/// `None` if the simulations agree, `Some(tick)` if they diverge at that tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64, dt_ms: u32) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    for tick in 1..=num_ticks {
        if sim1.tick(dt_ms) != sim2.tick(dt_ms) {
            return Some(tick);
        }
    }

    None
}

/// Result of parallel simulation runs.
#[derive(Debug, Clone)]
pub struct ParallelSimResult {
    /// Event-stream hash from each simulation.
    pub hashes: Vec<u64>,
    /// Number of ticks each simulation ran.
    pub ticks: u64,
    /// Number of simulations run.
    pub num_sims: usize,
}

impl ParallelSimResult {
    /// Check if all simulations produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all simulations matched.
    ///
    /// # Panics
    ///
    /// Panics if simulations produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel simulations diverged!\n\
                 Simulations: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_sims,
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run N simulations on scoped threads and collect event-stream hashes.
///
/// Each simulation is built on its own thread, so the terrain collaborator
/// does not need to be `Send`.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_simulations_scoped<F>(
    setup_fn: F,
    num_sims: usize,
    num_ticks: u64,
    dt_ms: u32,
) -> ParallelSimResult
where
    F: Fn() -> Simulation + Sync,
{
    let setup_ref = &setup_fn;
    let hashes = thread::scope(|scope| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                scope.spawn(move || {
                    let mut sim = setup_ref();
                    let mut hasher = DefaultHasher::new();
                    for _ in 0..num_ticks {
                        events_hash(&sim.tick(dt_ms)).hash(&mut hasher);
                    }
                    hasher.finish()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect::<Vec<u64>>()
    });

    ParallelSimResult {
        hashes,
        ticks: num_ticks,
        num_sims,
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
