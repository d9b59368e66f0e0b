//! Overlap tests between projectiles and target footprints.
//!
//! Touching shapes do not overlap: every comparison is strict.

use crate::components::HitShape;
use crate::math::{Fixed, Vec2Fixed};

/// Circle-circle overlap.
#[must_use]
pub fn circles_overlap(a: Vec2Fixed, radius_a: Fixed, b: Vec2Fixed, radius_b: Fixed) -> bool {
    let sum = radius_a.saturating_add(radius_b);
    a.distance_squared(b) < sum.saturating_mul(sum)
}

/// Circle against an axis-aligned rectangle centered on `rect_center`.
#[must_use]
pub fn circle_rect_overlap(
    circle: Vec2Fixed,
    radius: Fixed,
    rect_center: Vec2Fixed,
    half_width: Fixed,
    half_height: Fixed,
) -> bool {
    let closest = Vec2Fixed::new(
        circle
            .x
            .clamp(rect_center.x - half_width, rect_center.x + half_width),
        circle
            .y
            .clamp(rect_center.y - half_height, rect_center.y + half_height),
    );
    circle.distance_squared(closest) < radius.saturating_mul(radius)
}

/// Whether a projectile circle overlaps a target footprint.
#[must_use]
pub fn overlaps(point: Vec2Fixed, radius: Fixed, target: Vec2Fixed, shape: HitShape) -> bool {
    match shape {
        HitShape::Circle { radius: target_radius } => {
            circles_overlap(point, radius, target, target_radius)
        }
        HitShape::Rect {
            half_width,
            half_height,
        } => circle_rect_overlap(point, radius, target, half_width, half_height),
    }
}
