//! Target pose generators, one family per mode.
//!
//! Every generator is a pure function of the entity index, the population
//! size, its parameters and the RNG it is handed. They run once, when a
//! population is built.
pub mod scatter;
pub mod cone;
pub mod pile;
pub mod glyph;
pub mod dispatcher;

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::math::quat_from_euler;
use crate::mode::Mode;

/// Position plus orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }
}

/// The precomputed target of one entity in every spatial mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeTargets {
    pub scattered: Pose,
    pub assembled: Pose,
    /// `None` for classes that hide while the glyph is shown.
    pub glyph: Option<Pose>,
}

impl ModeTargets {
    /// Target for `mode`; `None` means the entity has no place in it and is
    /// hidden (always the case for `Closed`).
    pub fn get(&self, mode: Mode) -> Option<&Pose> {
        match mode {
            Mode::Scattered => Some(&self.scattered),
            Mode::Assembled => Some(&self.assembled),
            Mode::Glyph => self.glyph.as_ref(),
            Mode::Closed => None,
        }
    }
}

/// Uniform value in `[-1, 1)`.
#[inline]
pub(crate) fn signed_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * 2.0 - 1.0
}

/// Independent uniform angle per axis.
pub(crate) fn random_orientation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    quat_from_euler(Vec3::new(
        rng.random::<f32>() * TAU,
        rng.random::<f32>() * TAU,
        rng.random::<f32>() * TAU,
    ))
}

/// Level orientation, yaw only.
pub(crate) fn level_orientation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    Quat::from_rotation_y(rng.random::<f32>() * TAU)
}
