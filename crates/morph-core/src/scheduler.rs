//! Per-frame morph loop.
//!
//! Each entity moves toward the target of the frame's mode with an
//! exponential-decay step `alpha = min(dt * speed_weight * rate, 1)`, so
//! convergence time depends on the entity's weight rather than a fixed tween
//! duration. Procedural motion is composed on top to form the display pose.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use glam::Vec3;

use crate::class::{ClassProfile, RotationStrategy};
use crate::config::MotionConfig;
use crate::error::Result;
use crate::math::{finite_or, lerp, morph_alpha, normalize_or_identity, sanitize_delta};
use crate::mode::{Mode, ModeController};
use crate::motion::{
    advance_spin, is_visible, settle_spin, spin_mask, spun, DisplayPose, ProceduralMotion,
};
use crate::population::{Entity, Population, RuntimePose};

/// Host clock sample for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since the session started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

impl FrameClock {
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}

/// Everything shared by all entities within one frame.
///
/// The mode is sampled once when the context is built; every entity of the
/// frame sees the same value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub mode: Mode,
    pub elapsed: f32,
    pub delta: f32,
}

impl FrameContext {
    pub fn new(mode: Mode, clock: FrameClock) -> Self {
        let elapsed = if clock.elapsed.is_finite() { clock.elapsed } else { 0.0 };
        Self {
            mode,
            elapsed,
            delta: sanitize_delta(clock.delta),
        }
    }

    pub fn sample(modes: &ModeController, clock: FrameClock) -> Self {
        Self::new(modes.current(), clock)
    }
}

/// Population-wide decisions made once per frame.
#[derive(Clone, Copy, Debug)]
struct FramePlan {
    frame: FrameContext,
    /// Mode whose positions apply (differs from `frame.mode` when hidden).
    resting: Mode,
    visible: bool,
    spin_mask: Vec3,
    bob: bool,
    profile: ClassProfile,
}

/// Advances every entity of a population by one frame.
#[derive(Clone, Copy, Debug)]
pub struct MorphScheduler {
    motion: ProceduralMotion,
}

impl MorphScheduler {
    pub fn new(config: MotionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            motion: ProceduralMotion::new(config),
        })
    }

    pub fn motion(&self) -> &ProceduralMotion {
        &self.motion
    }

    pub fn config(&self) -> &MotionConfig {
        self.motion.config()
    }

    /// Advance `population` by one frame and refresh every display pose.
    pub fn advance(&self, population: &mut Population, frame: &FrameContext) {
        let profile = *population.profile();
        let resting = population.settle_mode(frame.mode);
        let plan = FramePlan {
            frame: *frame,
            resting,
            visible: is_visible(&profile, frame.mode),
            spin_mask: spin_mask(&profile, frame.mode),
            bob: !(profile.upright && frame.mode == Mode::Assembled),
            profile,
        };
        let (entities, runtime) = population.split_mut();

        #[cfg(feature = "parallel")]
        {
            entities
                .par_iter()
                .zip(runtime.par_iter_mut())
                .enumerate()
                .for_each(|(i, (entity, pose))| self.step_entity(i, entity, pose, &plan));
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (i, (entity, pose)) in entities.iter().zip(runtime.iter_mut()).enumerate() {
                self.step_entity(i, entity, pose, &plan);
            }
        }
    }

    /// One entity's update. Reads only its own state and the frame plan.
    fn step_entity(&self, index: usize, entity: &Entity, pose: &mut RuntimePose, plan: &FramePlan) {
        let frame = &plan.frame;
        let alpha = morph_alpha(frame.delta, entity.speed_weight, self.config().rate_constant);
        let target = entity
            .targets
            .get(frame.mode)
            .or_else(|| entity.targets.get(plan.resting))
            .unwrap_or(&entity.targets.scattered);

        // Translation: exponential approach toward the target.
        let moved = if alpha >= 1.0 {
            target.position
        } else {
            pose.position + (target.position - pose.position) * alpha
        };
        pose.position = finite_or(moved, target.position);

        // Rotation: slerp toward the target, sway folded in for slerp classes.
        let target_orientation = match plan.profile.rotation {
            RotationStrategy::SlerpSway => {
                target.orientation * self.motion.sway(frame.elapsed, entity.phase_offset)
            }
            RotationStrategy::SpinAccumulator => target.orientation,
        };
        pose.orientation = normalize_or_identity(pose.orientation.slerp(target_orientation, alpha));

        if plan.profile.rotation == RotationStrategy::SpinAccumulator {
            let phase =
                advance_spin(pose.spin_phase, entity.spin_speed, plan.spin_mask, frame.delta);
            pose.spin_phase = settle_spin(phase, plan.spin_mask, alpha);
        }

        // Visibility gate: same approach rate as the position.
        let visibility_target = if plan.visible { 1.0 } else { 0.0 };
        pose.visibility = lerp(pose.visibility, visibility_target, alpha).clamp(0.0, 1.0);

        pose.display = self.compose(index, entity, pose, plan);
    }

    fn compose(
        &self,
        index: usize,
        entity: &Entity,
        pose: &RuntimePose,
        plan: &FramePlan,
    ) -> DisplayPose {
        let frame = &plan.frame;
        let bob = if plan.bob {
            self.motion.bob_offset(frame.elapsed, entity.phase_offset)
        } else {
            Vec3::ZERO
        };
        let orientation = match plan.profile.rotation {
            RotationStrategy::SlerpSway => pose.orientation,
            RotationStrategy::SpinAccumulator => spun(pose.orientation, pose.spin_phase),
        };
        let pulse = self.motion.pulse(frame.elapsed, index, frame.mode, &plan.profile);
        let scale = entity.base_scale * pulse * pose.visibility;
        DisplayPose {
            position: finite_or(pose.position + bob, pose.position),
            orientation,
            scale: if scale.is_finite() { scale } else { 0.0 },
            visibility: pose.visibility,
        }
    }
}

/// Convenience: sample the mode once and advance several populations with it.
pub fn advance_all<'a, I>(
    scheduler: &MorphScheduler,
    populations: I,
    modes: &ModeController,
    clock: FrameClock,
) -> FrameContext
where
    I: IntoIterator<Item = &'a mut Population>,
{
    let frame = FrameContext::sample(modes, clock);
    for population in populations {
        scheduler.advance(population, &frame);
    }
    frame
}
