//! Hit resolution and damage application.
//!
//! [`resolve_hit`] is pure apart from the random draws it consumes; it never
//! mutates the target. [`apply_hit`] commits an outcome.

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::components::PartKey;
use crate::formulas;
use crate::rng::CombatRng;
use crate::targeting;

/// Result of one attack roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Whether the attack landed.
    pub hit: bool,
    /// Part struck, for structured targets.
    pub part: Option<PartKey>,
    /// Damage to apply. Zero on a miss.
    pub damage: u32,
}

impl HitOutcome {
    /// A miss.
    pub const MISS: Self = Self {
        hit: false,
        part: None,
        damage: 0,
    };
}

/// State change produced by applying a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDamage {
    /// Part struck, for structured targets.
    pub part: Option<PartKey>,
    /// HP actually removed.
    pub dealt: u32,
    /// HP of the struck part (or pool) afterwards.
    pub new_hp: u32,
    /// Maximum HP of the struck part (or pool).
    pub max_hp: u32,
    /// The whole combatant went from alive to destroyed with this hit.
    pub destroyed_now: bool,
}

/// Roll an attack against `target`.
///
/// The accuracy roll comes first; a miss consumes no further draws. A
/// structured target with no live part yields a miss.
pub fn resolve_hit(
    accuracy_ratio: u32,
    attack: u32,
    target: &Combatant,
    rng: &mut impl CombatRng,
) -> HitOutcome {
    let chance = formulas::chance_to_hit(accuracy_ratio, target.evasion());
    if rng.next_fraction() >= chance {
        return HitOutcome::MISS;
    }

    match target {
        Combatant::Structured(mech) => {
            let Some(part) = targeting::select_target_part(mech.parts(), rng) else {
                return HitOutcome::MISS;
            };
            let defense = mech
                .part(part)
                .defense
                .saturating_add(mech.active_shield_bonus());
            HitOutcome {
                hit: true,
                part: Some(part),
                damage: formulas::damage(attack, defense),
            }
        }
        Combatant::Simple(simple) => HitOutcome {
            hit: true,
            part: None,
            damage: formulas::damage(attack, simple.defense),
        },
    }
}

/// Commit a resolved hit to `target`. Returns `None` for misses.
pub fn apply_hit(target: &mut Combatant, outcome: &HitOutcome) -> Option<AppliedDamage> {
    if !outcome.hit {
        return None;
    }

    let was_destroyed = target.is_destroyed();
    let applied = match target {
        Combatant::Structured(mech) => {
            let key = outcome.part?;
            let dealt = mech.damage_part(key, outcome.damage);
            let part = mech.part(key);
            if part.is_destroyed() && dealt > 0 {
                tracing::debug!(entity = mech.id, ?key, "Part destroyed");
            }
            AppliedDamage {
                part: Some(key),
                dealt,
                new_hp: part.current_hp,
                max_hp: part.max_hp,
                destroyed_now: false,
            }
        }
        Combatant::Simple(simple) => {
            let dealt = simple.health.apply_damage(outcome.damage);
            AppliedDamage {
                part: None,
                dealt,
                new_hp: simple.health.current,
                max_hp: simple.health.max,
                destroyed_now: false,
            }
        }
    };

    Some(AppliedDamage {
        destroyed_now: !was_destroyed && target.is_destroyed(),
        ..applied
    })
}
