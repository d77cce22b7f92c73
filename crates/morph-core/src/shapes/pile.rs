//! Clustered pile for heavy classes.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::cone::{cone_point, height_fraction};
use super::{level_orientation, random_orientation, Pose};
use crate::config::FormationParams;

/// Highest point of the pile at horizontal distance `r` from its center.
#[inline]
pub fn pile_envelope(params: &FormationParams, r: f32) -> f32 {
    params.pile_height * (1.0 - r / params.pile_max_radius).max(0.0)
}

/// Area-uniform point in the pile disk under the linear envelope.
pub fn pile_point<R: Rng + ?Sized>(rng: &mut R, params: &FormationParams) -> Vec3 {
    let r = rng.random::<f32>().sqrt() * params.pile_max_radius;
    let angle = rng.random::<f32>() * TAU;
    let lift = rng.random::<f32>() * pile_envelope(params, r);
    Vec3::new(r * angle.cos(), params.base_y + lift, r * angle.sin())
}

/// Assembled pose for a heavy entity.
///
/// Most entities land in the pile at the foot of the cone; the rest keep the
/// lower part of the cone populated so it does not look bare.
pub fn pile_pose<R: Rng + ?Sized>(
    rng: &mut R,
    params: &FormationParams,
    index: usize,
    count: usize,
) -> Pose {
    if rng.random::<f32>() < params.pile_ratio {
        Pose::new(pile_point(rng, params), level_orientation(rng))
    } else {
        let f = height_fraction(index, count) * params.pile_cone_fraction;
        Pose::new(cone_point(rng, params, f), random_orientation(rng))
    }
}
