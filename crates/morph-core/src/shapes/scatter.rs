//! Scattered cloud: uniform density inside a sphere.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::{random_orientation, Pose};
use crate::config::FormationParams;

/// Uniform point inside a sphere of `radius` centered at the origin.
///
/// Cube-root radius and inverse-cosine polar angle keep the density
/// volumetric instead of piling up at the center or on the poles.
pub fn sphere_volume_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let r = radius * rng.random::<f32>().cbrt();
    let theta = rng.random::<f32>() * TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Scattered pose: sphere sample lifted by `scatter_lift`, random orientation.
pub fn scatter_pose<R: Rng + ?Sized>(rng: &mut R, params: &FormationParams) -> Pose {
    let position = sphere_volume_point(rng, params.sphere_radius) + Vec3::Y * params.scatter_lift;
    Pose::new(position, random_orientation(rng))
}
