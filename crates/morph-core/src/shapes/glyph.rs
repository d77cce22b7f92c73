//! Glyph formation: entities sample the rasterized text points.

use glam::{Quat, Vec3};
use rand::Rng;

use super::{random_orientation, signed_unit, Pose};
use crate::config::GlyphBox;

/// Glyph pose drawn with replacement from `points`.
///
/// Positions are clamped into `glyph_box` and pushed to its depth plane with
/// a little jitter for parallax. An empty point set yields the fallback
/// point for every entity.
pub fn glyph_pose<R: Rng + ?Sized>(rng: &mut R, points: &[Vec3], glyph_box: &GlyphBox) -> Pose {
    if points.is_empty() {
        return Pose::new(glyph_box.fallback, Quat::IDENTITY);
    }
    let source = points[rng.random_range(0..points.len())];
    let position = Vec3::new(
        source.x.clamp(
            glyph_box.center_x - glyph_box.half_width,
            glyph_box.center_x + glyph_box.half_width,
        ),
        source.y.clamp(glyph_box.min_y, glyph_box.max_y),
        glyph_box.depth + signed_unit(rng) * glyph_box.depth_jitter,
    );
    Pose::new(position, random_orientation(rng))
}
