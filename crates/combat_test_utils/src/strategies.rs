//! Proptest strategies for combat inputs.
//!
//! Ranges mirror what the data tables actually contain so that shrinking
//! lands on plausible values.

use combat_core::prelude::*;
use proptest::prelude::*;

/// Attack stat (0-500).
pub fn arb_attack() -> impl Strategy<Value = u32> {
    0u32..500u32
}

/// Defense stat (0-500).
pub fn arb_defense() -> impl Strategy<Value = u32> {
    0u32..500u32
}

/// Accuracy ratio, 10000-scale (0-20000).
pub fn arb_accuracy() -> impl Strategy<Value = u32> {
    0u32..20_000u32
}

/// Evasion ratio, 10000-scale (0-10000).
pub fn arb_evasion() -> impl Strategy<Value = u32> {
    0u32..=10_000u32
}

/// Total weight or power output of a mech (0-20000).
pub fn arb_weight() -> impl Strategy<Value = u32> {
    0u32..20_000u32
}

/// Base attack interval in milliseconds (0-10000).
pub fn arb_interval() -> impl Strategy<Value = u32> {
    0u32..10_000u32
}

/// Attack speed modifier, 10000-scale (-20000 to 20000).
pub fn arb_speed_mod() -> impl Strategy<Value = i32> {
    -20_000i32..20_000i32
}

/// A list of global attack speed modifiers.
pub fn arb_speed_mods(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(arb_speed_mod(), 0..max_len)
}

/// Part HP (1-1000).
pub fn arb_part_hp() -> impl Strategy<Value = u32> {
    1u32..1000u32
}

/// Four part HP values where each part may already be destroyed.
pub fn arb_part_hps() -> impl Strategy<Value = [u32; 4]> {
    [
        prop_oneof![Just(0u32), arb_part_hp()],
        prop_oneof![Just(0u32), arb_part_hp()],
        prop_oneof![Just(0u32), arb_part_hp()],
        prop_oneof![Just(0u32), arb_part_hp()],
    ]
}

/// Tick length in milliseconds (1-100).
pub fn arb_tick_ms() -> impl Strategy<Value = u32> {
    1u32..=100u32
}

/// Pixel position inside a typical arena.
pub fn arb_position() -> impl Strategy<Value = Vec2Fixed> {
    (-2000i32..2000i32, -2000i32..2000i32).prop_map(|(x, y)| Vec2Fixed::from_pixels(x, y))
}

/// A scripted draw sequence (10000-scale ratios).
pub fn arb_draws(max_len: usize) -> impl Strategy<Value = ScriptedRng> {
    proptest::collection::vec(0u32..10_000u32, 1..max_len)
        .prop_map(|ratios| ScriptedRng::from_ratios(&ratios))
}
