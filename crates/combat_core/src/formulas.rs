//! Fixed-point combat formulas on a 10000 scale.
//!
//! Every ratio in the game data is an integer where 10000 means 100%.
//! These functions are pure and reproduce the balance sheet exactly:
//! - Hit chance floors at 5% so no attack is hopeless
//! - Evasion and move efficiency fall off with weight/power ratio
//! - Damage mitigation is `attack² / (attack + defense)`, rounded, minimum 1
//! - Attack intervals never drop below 100 ms
//!
//! Intermediate products are widened (`u64`/`i128`) and every division
//! floors, so results never depend on float rounding.

use crate::math::Fixed;

/// The fixed-point scale: 10000 = 100%.
pub const RATIO_SCALE: u32 = 10_000;

/// Minimum damage floor - a confirmed hit always deals at least 1 damage.
pub const MIN_DAMAGE: u32 = 1;

/// Shortest allowed attack interval in milliseconds.
pub const MIN_ATTACK_INTERVAL_MS: u32 = 100;

/// Move efficiency used when a combatant produces no power.
pub const FALLBACK_MOVE_EFFICIENCY: u32 = 5_000;

/// Weight/power ratio (10000-scale) above which evasion starts dropping.
const EVASION_RATIO_THRESHOLD: u64 = 3_000;

/// Weight/power ratio (10000-scale) above which movement slows.
const EFFICIENCY_RATIO_THRESHOLD: u64 = 7_000;

/// Lowest possible hit chance (5%).
#[must_use]
pub fn min_hit_chance() -> Fixed {
    Fixed::from_num(5) / Fixed::from_num(100)
}

/// Probability that an attack lands.
///
/// ```text
/// chance = max(accuracy / (10000 + evasion), 0.05)
/// ```
///
/// Only the floor is clamped; an accuracy above `10000 + evasion` yields a
/// chance of 1.0 or more, which always hits.
#[must_use]
pub fn chance_to_hit(attacker_accuracy: u32, defender_evasion: u32) -> Fixed {
    let denominator = u64::from(RATIO_SCALE) + u64::from(defender_evasion);
    let chance = Fixed::saturating_from_num(attacker_accuracy)
        / Fixed::saturating_from_num(denominator);
    chance.max(min_hit_chance())
}

/// Evasion derived from a combatant's weight against its power output.
///
/// ```text
/// ratio   = weight * 10000 / power
/// evasion = clamp(10000 - floor(max(0, ratio - 3000) * 10 / 7), 0, 10000)
/// ```
///
/// A combatant with no power output has no evasion.
#[must_use]
pub fn evasion(total_weight: u32, total_power: u32) -> u32 {
    if total_power == 0 {
        return 0;
    }

    let power = u64::from(total_power);
    let scaled_weight = u64::from(total_weight) * u64::from(RATIO_SCALE);
    // (ratio - 3000) * power, kept integral by not dividing yet
    let excess = scaled_weight.saturating_sub(EVASION_RATIO_THRESHOLD * power);
    let penalty = excess * 10 / (7 * power);

    u64::from(RATIO_SCALE).saturating_sub(penalty) as u32
}

/// Movement efficiency derived from weight against power output.
///
/// ```text
/// ratio      = weight * 10000 / power
/// efficiency = max(5000, 10000 - floor(max(0, ratio - 7000) * 5 / 3))
/// ```
///
/// A combatant with no power output moves at the 5000 fallback.
#[must_use]
pub fn move_efficiency(total_weight: u32, total_power: u32) -> u32 {
    if total_power == 0 {
        return FALLBACK_MOVE_EFFICIENCY;
    }

    let power = u64::from(total_power);
    let scaled_weight = u64::from(total_weight) * u64::from(RATIO_SCALE);
    let excess = scaled_weight.saturating_sub(EFFICIENCY_RATIO_THRESHOLD * power);
    let penalty = excess * 5 / (3 * power);

    let efficiency = u64::from(RATIO_SCALE).saturating_sub(penalty);
    efficiency.max(u64::from(FALLBACK_MOVE_EFFICIENCY)) as u32
}

/// Final movement speed after modifiers.
///
/// ```text
/// speed = base * (10000 + additive) / 10000
/// speed = speed * efficiency / 10000
/// speed = speed * status / 10000   (for each status multiplier)
/// result = floor(speed)
/// ```
///
/// The chain is evaluated as an exact fraction and floored once.
#[must_use]
pub fn actual_speed(
    base_speed: u32,
    additive_mod: i32,
    move_efficiency: u32,
    status_multipliers: &[u32],
) -> u32 {
    let scale = i128::from(RATIO_SCALE);
    let mut numerator = i128::from(base_speed) * (scale + i128::from(additive_mod));
    let mut denominator = scale;

    if numerator <= 0 {
        return 0;
    }

    for factor in std::iter::once(move_efficiency).chain(status_multipliers.iter().copied()) {
        numerator *= i128::from(factor);
        denominator *= scale;
        if numerator == 0 {
            return 0;
        }
        let divisor = gcd(numerator, denominator);
        numerator /= divisor;
        denominator /= divisor;
    }

    (numerator / denominator).min(i128::from(u32::MAX)) as u32
}

/// Final attack interval in milliseconds.
///
/// ```text
/// interval = floor(base * 10000 / (10000 + local))
/// interval = floor(interval * 10000 / (10000 + sum(global)))
/// result   = max(100, interval)
/// ```
///
/// Modifiers that would make a denominator non-positive are treated as the
/// smallest positive denominator.
#[must_use]
pub fn attack_interval(base_interval_ms: u32, local_mod: i32, global_mods: &[i32]) -> u32 {
    let scale = i64::from(RATIO_SCALE);

    let local_denominator = (scale + i64::from(local_mod)).max(1);
    let interval = i64::from(base_interval_ms) * scale / local_denominator;

    let global_sum: i64 = global_mods.iter().map(|&m| i64::from(m)).sum();
    let global_denominator = (scale + global_sum).max(1);
    let interval = interval * scale / global_denominator;

    interval.clamp(i64::from(MIN_ATTACK_INTERVAL_MS), i64::from(u32::MAX)) as u32
}

/// Damage dealt by one confirmed hit.
///
/// ```text
/// damage = max(1, round(attack * attack / (attack + defense)))
/// ```
///
/// Halves round up. Zero attack against zero defense still deals 1.
#[must_use]
pub fn damage(attack: u32, defense: u32) -> u32 {
    let attack = u128::from(attack);
    let total = attack + u128::from(defense);
    if total == 0 {
        return MIN_DAMAGE;
    }

    // round(a²/t) == floor((2a² + t) / 2t)
    let rounded = (2 * attack * attack + total) / (2 * total);
    rounded.clamp(u128::from(MIN_DAMAGE), u128::from(u32::MAX)) as u32
}

/// Combine weapon accuracy with the accuracy of the arm holding it.
#[must_use]
pub fn combine_accuracy(weapon_accuracy: u32, arm_accuracy: u32) -> u32 {
    (u64::from(weapon_accuracy) * u64::from(arm_accuracy) / u64::from(RATIO_SCALE)) as u32
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.abs().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_even_trade() {
        assert_eq!(damage(50, 50), 25);
    }

    #[test]
    fn test_damage_rounds_half_up() {
        // 3*3/(3+1) = 2.25 -> 2, 5*5/(5+3) = 3.125 -> 3, 3*3/(3+3) = 1.5 -> 2
        assert_eq!(damage(3, 1), 2);
        assert_eq!(damage(5, 3), 3);
        assert_eq!(damage(3, 3), 2);
    }

    #[test]
    fn test_damage_minimum() {
        assert_eq!(damage(1, 1000), MIN_DAMAGE);
        assert_eq!(damage(0, 0), MIN_DAMAGE);
        assert_eq!(damage(0, 50), MIN_DAMAGE);
    }

    #[test]
    fn test_damage_no_defense() {
        assert_eq!(damage(40, 0), 40);
    }

    #[test]
    fn test_damage_extreme_stats() {
        assert_eq!(damage(u32::MAX, 0), u32::MAX);
        assert_eq!(damage(u32::MAX, u32::MAX), 1 << 31);
        assert_eq!(damage(1, u32::MAX), MIN_DAMAGE);
    }

    #[test]
    fn test_chance_to_hit_scenario() {
        let chance = chance_to_hit(8000, 2000);
        let expected = Fixed::from_num(2) / Fixed::from_num(3);
        let epsilon = Fixed::ONE / Fixed::from_num(100_000);
        assert!((chance - expected).abs() < epsilon, "got {chance}");
    }

    #[test]
    fn test_chance_to_hit_floor() {
        assert_eq!(chance_to_hit(100, 10000), min_hit_chance());
        assert_eq!(chance_to_hit(0, 0), min_hit_chance());
    }

    #[test]
    fn test_chance_to_hit_can_exceed_one() {
        assert!(chance_to_hit(15000, 0) > Fixed::ONE);
    }

    #[test]
    fn test_evasion_curve() {
        assert_eq!(evasion(100, 0), 0);
        // ratio 3000 -> full evasion
        assert_eq!(evasion(300, 1000), 10000);
        // ratio 10000 -> 10000 - 7000*10/7 = 0
        assert_eq!(evasion(1000, 1000), 0);
        // ratio 5000 -> 10000 - floor(2000*10/7) = 10000 - 2857
        assert_eq!(evasion(500, 1000), 7143);
        // ratio far above threshold clamps at 0
        assert_eq!(evasion(5000, 1000), 0);
    }

    #[test]
    fn test_evasion_uses_unfloored_ratio() {
        // ratio = 10000/3 = 3333.33..., so the penalty is floor(333.33 * 10/7)
        assert_eq!(evasion(1, 3), 10000 - ((10000 - 9000) * 10 / 21) as u32);
    }

    #[test]
    fn test_move_efficiency_curve() {
        assert_eq!(move_efficiency(100, 0), FALLBACK_MOVE_EFFICIENCY);
        assert_eq!(move_efficiency(700, 1000), 10000);
        // ratio 8500 -> 10000 - floor(1500*5/3) = 7500
        assert_eq!(move_efficiency(850, 1000), 7500);
        // Heavy builds bottom out at 5000
        assert_eq!(move_efficiency(5000, 1000), 5000);
    }

    #[test]
    fn test_actual_speed() {
        assert_eq!(actual_speed(200, 0, 10000, &[]), 200);
        assert_eq!(actual_speed(200, 0, 7000, &[]), 140);
        assert_eq!(actual_speed(200, 5000, 10000, &[5000]), 150);
        // 200 * 1.0 * 0.75 * 0.5 * 0.9 = 67.5 -> 67
        assert_eq!(actual_speed(200, 0, 7500, &[5000, 9000]), 67);
    }

    #[test]
    fn test_actual_speed_negative_modifier_floors_at_zero() {
        assert_eq!(actual_speed(200, -20000, 10000, &[]), 0);
    }

    #[test]
    fn test_attack_interval_scenario() {
        assert_eq!(attack_interval(1000, 5000, &[]), 666);
    }

    #[test]
    fn test_attack_interval_global_mods() {
        // 1000 -> 1000 (no local) -> 1000*10000/12500 = 800
        assert_eq!(attack_interval(1000, 0, &[1500, 1000]), 800);
    }

    #[test]
    fn test_attack_interval_minimum() {
        assert_eq!(attack_interval(150, 20000, &[]), MIN_ATTACK_INTERVAL_MS);
        assert_eq!(attack_interval(0, 0, &[]), MIN_ATTACK_INTERVAL_MS);
    }

    #[test]
    fn test_combine_accuracy() {
        assert_eq!(combine_accuracy(10000, 10000), 10000);
        assert_eq!(combine_accuracy(9000, 8000), 7200);
        assert_eq!(combine_accuracy(3333, 3333), 1110);
    }
}
