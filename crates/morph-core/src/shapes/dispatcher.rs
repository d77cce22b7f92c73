//! Builds the full set of mode targets for one entity of a class.

use glam::Vec3;
use rand::Rng;

use super::cone::cone_pose;
use super::glyph::glyph_pose;
use super::pile::pile_pose;
use super::scatter::scatter_pose;
use super::ModeTargets;
use crate::class::ClassProfile;
use crate::config::{FormationParams, GlyphBox};

/// Compute every mode target of entity `index` in a population of `count`.
pub fn targets_for<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &ClassProfile,
    index: usize,
    count: usize,
    formation: &FormationParams,
    glyph_box: &GlyphBox,
    glyph_points: &[Vec3],
) -> ModeTargets {
    let scattered = scatter_pose(rng, formation);
    let assembled = if profile.piles {
        pile_pose(rng, formation, index, count)
    } else {
        cone_pose(rng, formation, index, count, profile.upright)
    };
    let glyph = profile
        .has_glyph_target
        .then(|| glyph_pose(rng, glyph_points, glyph_box));
    ModeTargets {
        scattered,
        assembled,
        glyph,
    }
}
