//! Weighted part selection for structured targets.
//!
//! Selection is two-stage: a weighted draw over the fixed table
//! (body 1, arms 2 each, legs 3), then a uniform reroll among the live parts
//! if the weighted pick was already destroyed.

use crate::components::{CombatantPart, PartKey};
use crate::math::Fixed;
use crate::rng::CombatRng;

/// Sum of all part hit weights.
pub const TOTAL_HIT_WEIGHT: u32 = 8;

/// Pick the part a confirmed hit lands on.
///
/// Consumes one draw for the weighted roll and, only if the weighted pick is
/// destroyed, one more for the reroll. Returns `None` when every part is at
/// 0 HP; no draw is consumed in that case.
pub fn select_target_part(
    parts: &[CombatantPart; 4],
    rng: &mut impl CombatRng,
) -> Option<PartKey> {
    if parts.iter().all(CombatantPart::is_destroyed) {
        return None;
    }

    let pick = weighted_pick(rng.next_fraction());
    if !parts[pick.index()].is_destroyed() {
        return Some(pick);
    }

    let alive: Vec<PartKey> = PartKey::ALL
        .into_iter()
        .filter(|key| !parts[key.index()].is_destroyed())
        .collect();
    let reroll = alive[rng.next_index(alive.len())];

    tracing::trace!(?pick, ?reroll, "Weighted pick destroyed, rerolled");
    Some(reroll)
}

/// Map a draw in `[0, 1)` onto the cumulative weight table.
#[must_use]
pub fn weighted_pick(fraction: Fixed) -> PartKey {
    let roll = fraction * Fixed::from_num(TOTAL_HIT_WEIGHT);

    let mut cumulative = 0;
    for key in PartKey::ALL {
        cumulative += key.hit_weight();
        if roll < Fixed::from_num(cumulative) {
            return key;
        }
    }
    PartKey::Legs
}
