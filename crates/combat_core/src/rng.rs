//! Injectable random source for hit rolls and part selection.
//!
//! All randomness in the combat core flows through [`CombatRng`]. Live games
//! use a seeded [`ChaCha8Rng`]; tests use [`ScriptedRng`] to replay exact
//! draw sequences and assert exact outcomes.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::formulas::RATIO_SCALE;
use crate::math::Fixed;

/// Source of uniform draws.
pub trait CombatRng {
    /// Uniform value in `[0, 1)`.
    fn next_fraction(&mut self) -> Fixed;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let scaled = self.next_fraction() * Fixed::from_num(len);
        scaled.to_num::<usize>().min(len.saturating_sub(1))
    }
}

impl CombatRng for ChaCha8Rng {
    fn next_fraction(&mut self) -> Fixed {
        // I32F32 has exactly 32 fractional bits
        Fixed::from_bits(i64::from(self.next_u32()))
    }
}

impl<R: CombatRng + ?Sized> CombatRng for &mut R {
    fn next_fraction(&mut self) -> Fixed {
        (**self).next_fraction()
    }
}

/// Create the seeded generator used by the simulation.
#[must_use]
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: Vec<Fixed>,
    cursor: usize,
}

impl ScriptedRng {
    /// Create from raw fractions. Values are clamped into `[0, 1)`.
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = Fixed>) -> Self {
        let below_one = Fixed::ONE - Fixed::DELTA;
        let draws: Vec<Fixed> = draws
            .into_iter()
            .map(|d| d.clamp(Fixed::ZERO, below_one))
            .collect();
        Self { draws, cursor: 0 }
    }

    /// Create from 10000-scale ratios (`2500` replays a draw of 0.25).
    #[must_use]
    pub fn from_ratios(ratios: &[u32]) -> Self {
        Self::new(
            ratios
                .iter()
                .map(|&r| Fixed::from_num(r) / Fixed::from_num(RATIO_SCALE)),
        )
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl CombatRng for ScriptedRng {
    fn next_fraction(&mut self) -> Fixed {
        if self.draws.is_empty() {
            return Fixed::ZERO;
        }
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}
