//! Procedural secondary motion layered over the interpolated base pose.
//!
//! Nothing here touches target poses. Every function is a pure function of
//! time, per-entity phase/spin data and the frame's mode.

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};

use crate::class::ClassProfile;
use crate::config::MotionConfig;
use crate::math::{normalize_or_identity, quat_from_euler, sanitize_delta};
use crate::mode::Mode;

/// Final per-entity transform for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayPose {
    pub position: Vec3,
    pub orientation: Quat,
    /// `baseScale * pulse * visibility`.
    pub scale: f32,
    pub visibility: f32,
}

/// Time-driven oscillators parameterised by [`MotionConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProceduralMotion {
    config: MotionConfig,
}

impl ProceduralMotion {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Vertical floating offset.
    #[inline]
    pub fn bob_offset(&self, time: f32, phase: f32) -> Vec3 {
        Vec3::Y * ((time * self.config.float_speed + phase).sin() * self.config.float_amplitude)
    }

    /// Gentle rocking about the horizontal axes.
    #[inline]
    pub fn sway(&self, time: f32, phase: f32) -> Quat {
        let amp = self.config.sway_amplitude;
        if amp == 0.0 {
            return Quat::IDENTITY;
        }
        let t = time * self.config.sway_speed;
        Quat::from_euler(
            EulerRot::XYZ,
            (t + phase).sin() * amp,
            0.0,
            (t * 0.8 + phase * 1.3).sin() * amp,
        )
    }

    /// Scale multiplier. `index` offsets the wave so neighbours do not pulse
    /// in lockstep.
    #[inline]
    pub fn pulse(&self, time: f32, index: usize, mode: Mode, profile: &ClassProfile) -> f32 {
        if profile.pulses && matches!(mode, Mode::Assembled | Mode::Glyph) {
            let wave = (time * self.config.pulse_speed + index as f32).sin();
            1.0 + wave * self.config.pulse_amplitude
        } else {
            1.0
        }
    }
}

/// Whether an entity of `profile` should be shown in `mode`.
#[inline]
pub fn is_visible(profile: &ClassProfile, mode: Mode) -> bool {
    match mode {
        Mode::Scattered | Mode::Assembled => true,
        Mode::Glyph => profile.has_glyph_target,
        Mode::Closed => false,
    }
}

/// Axes that keep tumbling: upright classes only yaw while assembled.
#[inline]
pub fn spin_mask(profile: &ClassProfile, mode: Mode) -> Vec3 {
    if profile.upright && mode == Mode::Assembled {
        Vec3::Y
    } else {
        Vec3::ONE
    }
}

/// Integrate spin angles, wrapped to `[0, 2pi)` so long sessions keep
/// precision.
#[inline]
pub fn advance_spin(phase: Vec3, spin_speed: Vec3, mask: Vec3, dt: f32) -> Vec3 {
    let next = phase + spin_speed * mask * sanitize_delta(dt);
    Vec3::new(next.x.rem_euclid(TAU), next.y.rem_euclid(TAU), next.z.rem_euclid(TAU))
}

/// Pull the masked-out spin axes back toward level with factor `alpha`.
///
/// An upright entity that tumbled while scattered rights itself as it
/// assembles instead of snapping level.
#[inline]
pub fn settle_spin(phase: Vec3, mask: Vec3, alpha: f32) -> Vec3 {
    let settle = |angle: f32, keep: f32| {
        if keep > 0.0 {
            return angle;
        }
        // shortest signed distance back to 0
        let signed = if angle > std::f32::consts::PI { angle - TAU } else { angle };
        (signed * (1.0 - alpha)).rem_euclid(TAU)
    };
    Vec3::new(settle(phase.x, mask.x), settle(phase.y, mask.y), settle(phase.z, mask.z))
}

/// Apply accumulated spin angles on top of a resting orientation.
#[inline]
pub fn spun(orientation: Quat, spin_phase: Vec3) -> Quat {
    normalize_or_identity(orientation * quat_from_euler(spin_phase))
}
