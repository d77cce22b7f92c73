//! Assembled formation: a jittered spiral over a cone surface.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::{level_orientation, random_orientation, signed_unit, Pose};
use crate::config::FormationParams;

/// Height fraction of entity `index` in a population of `count`.
#[inline]
pub fn height_fraction(index: usize, count: usize) -> f32 {
    index as f32 / count.max(1) as f32
}

/// Cone radius at height fraction `f` before jitter; 0 at the apex.
#[inline]
pub fn cone_radius(params: &FormationParams, f: f32) -> f32 {
    (params.base_radius * (1.0 - f)).max(0.0)
}

/// Point on the cone surface at height fraction `f`.
pub fn cone_point<R: Rng + ?Sized>(rng: &mut R, params: &FormationParams, f: f32) -> Vec3 {
    let f = f.clamp(0.0, 1.0);
    let angle = f * params.spiral_turns * TAU + signed_unit(rng) * params.angle_jitter;
    let radius = (cone_radius(params, f) + signed_unit(rng) * params.radial_jitter).max(0.0);
    Vec3::new(
        radius * angle.cos(),
        params.base_y + f * params.height,
        radius * angle.sin(),
    )
}

/// Point on the ground ring just outside the cone base.
pub fn ground_ring_point<R: Rng + ?Sized>(rng: &mut R, params: &FormationParams) -> Vec3 {
    let angle = rng.random::<f32>() * TAU;
    let radius = params.base_radius + params.ring_offset + rng.random::<f32>() * params.ring_width;
    Vec3::new(radius * angle.cos(), params.base_y, radius * angle.sin())
}

/// Assembled pose of entity `index`.
///
/// Upright entities stay level and, when they would sit lower than
/// `upright_ground_threshold`, move to the ground ring instead of hanging in
/// the air at the cone base.
pub fn cone_pose<R: Rng + ?Sized>(
    rng: &mut R,
    params: &FormationParams,
    index: usize,
    count: usize,
    upright: bool,
) -> Pose {
    let f = height_fraction(index, count);
    if upright {
        let position = if f * params.height < params.upright_ground_threshold {
            ground_ring_point(rng, params)
        } else {
            cone_point(rng, params, f)
        };
        Pose::new(position, level_orientation(rng))
    } else {
        let position = cone_point(rng, params, f);
        Pose::new(position, random_orientation(rng))
    }
}
