//! Fixed-point math utilities for the combat simulation.
//!
//! Positions, velocities and distances use fixed-point arithmetic so that
//! collision and range checks behave identically regardless of frame
//! timing. Trigonometry is only used when a projectile is spawned, to turn
//! an angle into a unit direction.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Largest component magnitude whose square still fits comfortably in `Fixed`.
const SAFE_COMPONENT: Fixed = Fixed::from_bits(16_384 << 32);

const HALF: Fixed = Fixed::from_bits(1 << 31);

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from whole pixel coordinates.
    #[must_use]
    pub fn from_pixels(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Calculate squared distance (avoids sqrt for comparisons).
    ///
    /// Saturates at `Fixed::MAX` for points more than ~46,000 px apart.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fixed {
        let delta = self - other;
        delta.dot(delta)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        (other - self).length()
    }

    /// Dot product of two vectors. Saturates instead of overflowing.
    #[must_use]
    pub fn dot(self, other: Self) -> Fixed {
        self.x
            .saturating_mul(other.x)
            .saturating_add(self.y.saturating_mul(other.y))
    }

    /// Length of the vector.
    ///
    /// Long vectors are halved until their square fits, then scaled back,
    /// so the result stays accurate far beyond the `dot` saturation point.
    #[must_use]
    pub fn length(self) -> Fixed {
        let mut v = self;
        let mut halvings = 0;
        while v.x.saturating_abs() > SAFE_COMPONENT || v.y.saturating_abs() > SAFE_COMPONENT {
            v = v.scale(HALF);
            halvings += 1;
        }
        fixed_sqrt(v.dot(v)).saturating_mul_int(1_i64 << halvings)
    }

    /// Scale both components.
    #[must_use]
    pub fn scale(self, factor: Fixed) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Normalize vector using fixed-point math.
    ///
    /// Returns the zero vector for a zero-length input.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == Fixed::ZERO {
            return Self::ZERO;
        }

        Self::new(self.x / len, self.y / len)
    }

    /// Heading of this vector in radians, as used by `atan2(y, x)`.
    #[must_use]
    pub fn angle(self) -> f64 {
        self.y.to_num::<f64>().atan2(self.x.to_num::<f64>())
    }

    /// Unit vector pointing along `radians`.
    #[must_use]
    pub fn from_angle(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(Fixed::from_num(cos), Fixed::from_num(sin))
    }

    /// Rotate a direction by `radians`.
    #[must_use]
    pub fn rotate(self, radians: f64) -> Self {
        Self::from_angle(self.angle() + radians).scale(self.length())
    }
}

/// Computes the square root of a fixed-point number using binary search.
///
/// This is deterministic and avoids overflow issues.
#[must_use]
pub fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }

    let mut low = Fixed::ZERO;
    let mut high = if value > Fixed::ONE { value } else { Fixed::ONE };

    // 48 iterations covers the integer and fractional range of I32F32
    for _ in 0..48 {
        let mid = low + (high - low) / Fixed::from_num(2);
        let mid_sq = mid.saturating_mul(mid);

        if mid_sq <= value {
            low = mid;
        } else {
            high = mid;
        }
    }

    low
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x.saturating_add(rhs.x),
            y: self.y.saturating_add(rhs.y),
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x.saturating_sub(rhs.x),
            y: self.y.saturating_sub(rhs.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epsilon() -> Fixed {
        Fixed::ONE / Fixed::from_num(10000)
    }

    #[test]
    fn test_vec2_distance_squared() {
        let a = Vec2Fixed::from_pixels(3, 0);
        let b = Vec2Fixed::from_pixels(0, 4);
        // 3² + 4² = 25
        assert_eq!(a.distance_squared(b), Fixed::from_num(25));
    }

    #[test]
    fn test_distance() {
        let a = Vec2Fixed::from_pixels(0, 0);
        let b = Vec2Fixed::from_pixels(30, 40);
        assert!((a.distance(b) - Fixed::from_num(50)).abs() < epsilon());
    }

    #[test]
    fn test_vec2_normalize() {
        let v = Vec2Fixed::from_pixels(3, 4);
        let norm = v.normalize();

        let len_sq = norm.dot(norm);
        assert!(
            (len_sq - Fixed::ONE).abs() < epsilon(),
            "normalized vector length² should be ~1, got {:?}",
            len_sq
        );

        // norm.x * 4 should equal norm.y * 3
        let ratio_diff = (norm.x * Fixed::from_num(4)) - (norm.y * Fixed::from_num(3));
        assert!(ratio_diff.abs() < epsilon());
    }

    #[test]
    fn test_far_apart_points_do_not_overflow() {
        let a = Vec2Fixed::from_pixels(0, 0);
        let b = Vec2Fixed::from_pixels(50_000, 0);
        assert_eq!(a.distance_squared(b), Fixed::MAX);
        assert!((a.distance(b) - Fixed::from_num(50_000)).abs() < Fixed::ONE);

        let c = Vec2Fixed::from_pixels(-1_000_000, 2_000_000);
        let expected = Fixed::from_num(2_236_068);
        assert!((a.distance(c) - expected).abs() < Fixed::from_num(2));

        let dir = (b - a).normalize();
        assert!((dir.x - Fixed::ONE).abs() < epsilon());
        assert_eq!(dir.y, Fixed::ZERO);
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(Vec2Fixed::ZERO.normalize(), Vec2Fixed::ZERO);
    }

    #[test]
    fn test_angle_roundtrip() {
        let dir = Vec2Fixed::from_angle(std::f64::consts::FRAC_PI_2);
        assert!(dir.x.abs() < epsilon());
        assert!((dir.y - Fixed::ONE).abs() < epsilon());
        assert!((dir.angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_keeps_length() {
        let dir = Vec2Fixed::from_pixels(1, 0);
        let rotated = dir.rotate(std::f64::consts::PI);
        assert!((rotated.x + Fixed::ONE).abs() < epsilon());
        assert!(rotated.y.abs() < epsilon());
    }
}
