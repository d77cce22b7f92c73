//! Fixed-size entity store for one population.

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::class::{ClassProfile, EntityClass};
use crate::config::PopulationConfig;
use crate::error::Result;
use crate::mode::Mode;
use crate::motion::DisplayPose;
use crate::shapes::dispatcher::targets_for;
use crate::shapes::{signed_unit, ModeTargets, Pose};

/// Immutable per-entity data, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    pub targets: ModeTargets,
    pub base_scale: f32,
    pub speed_weight: f32,
    /// Per-axis tumble rate (rad/s).
    pub spin_speed: Vec3,
    /// Phase in `[0, 2pi)` decorrelating oscillations across entities.
    pub phase_offset: f32,
    pub tint: [f32; 3],
}

/// Mutable per-entity state. Only the scheduler writes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuntimePose {
    pub(crate) position: Vec3,
    pub(crate) orientation: Quat,
    pub(crate) visibility: f32,
    pub(crate) spin_phase: Vec3,
    pub(crate) display: DisplayPose,
}

impl RuntimePose {
    /// Runtime state resting on `pose`, fully visible.
    fn resting_on(pose: &Pose, base_scale: f32) -> Self {
        Self {
            position: pose.position,
            orientation: pose.orientation,
            visibility: 1.0,
            spin_phase: Vec3::ZERO,
            display: DisplayPose {
                position: pose.position,
                orientation: pose.orientation,
                scale: base_scale,
                visibility: 1.0,
            },
        }
    }

    /// Interpolated base position (procedural offsets excluded).
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Interpolated resting orientation.
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    pub fn spin_phase(&self) -> Vec3 {
        self.spin_phase
    }

    /// Final pose of the last frame, as handed to the instance writer.
    pub fn display(&self) -> &DisplayPose {
        &self.display
    }
}

/// One population: a fixed entity array and its runtime state.
#[derive(Clone, Debug)]
pub struct Population {
    config: PopulationConfig,
    profile: ClassProfile,
    seed: u64,
    entities: Vec<Entity>,
    runtime: Vec<RuntimePose>,
    resting_mode: Mode,
}

impl Population {
    /// Validate `config` and generate every entity with its mode targets.
    ///
    /// Runtime state starts on the scattered target so the first frame does
    /// not pop.
    pub fn build(config: PopulationConfig, glyph_points: &[Vec3]) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(host_seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let profile = config.class.profile();
        let count = config.count;

        let mut entities = Vec::with_capacity(count);
        for index in 0..count {
            let targets = targets_for(
                &mut rng,
                &profile,
                index,
                count,
                &config.formation,
                &config.glyph_box,
                glyph_points,
            );
            let (min_scale, max_scale) = profile.scale_range;
            let base_scale = min_scale + rng.random::<f32>() * (max_scale - min_scale);
            let spin_speed = Vec3::new(
                signed_unit(&mut rng),
                signed_unit(&mut rng),
                signed_unit(&mut rng),
            ) * profile.max_spin;
            let phase_offset = rng.random::<f32>() * std::f32::consts::TAU;
            let tint = profile.palette[rng.random_range(0..profile.palette.len())];
            entities.push(Entity {
                targets,
                base_scale,
                speed_weight: profile.speed_weight,
                spin_speed,
                phase_offset,
                tint,
            });
        }

        let runtime = entities
            .iter()
            .map(|e| RuntimePose::resting_on(&e.targets.scattered, e.base_scale))
            .collect();

        log::debug!(
            "built {:?} population: {} entities, seed {}, {} glyph points",
            config.class,
            count,
            seed,
            glyph_points.len()
        );

        Ok(Self {
            config,
            profile,
            seed,
            entities,
            runtime,
            resting_mode: Mode::Scattered,
        })
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn class(&self) -> EntityClass {
        self.config.class
    }

    pub fn profile(&self) -> &ClassProfile {
        &self.profile
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// Seed the layout was generated from (reuse it to rebuild identically).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn runtime(&self) -> &[RuntimePose] {
        &self.runtime
    }

    pub fn pose(&self, index: usize) -> Option<&RuntimePose> {
        self.runtime.get(index)
    }

    /// Spatial mode whose targets hidden entities keep heading to.
    pub fn resting_mode(&self) -> Mode {
        self.resting_mode
    }

    /// Pick the spatial mode whose positions apply under `mode`.
    ///
    /// A mode this class has targets for becomes the new resting mode;
    /// `Closed`, or `Glyph` for a class without glyph targets, keeps the
    /// previous one.
    pub(crate) fn settle_mode(&mut self, mode: Mode) -> Mode {
        let has_targets = match mode {
            Mode::Scattered | Mode::Assembled => true,
            Mode::Glyph => self.profile.has_glyph_target,
            Mode::Closed => false,
        };
        if has_targets {
            self.resting_mode = mode;
        }
        self.resting_mode
    }

    /// Immutable entities alongside their mutable runtime state.
    pub(crate) fn split_mut(&mut self) -> (&[Entity], &mut [RuntimePose]) {
        (&self.entities, &mut self.runtime)
    }
}

/// Seed for populations built without an explicit one.
fn host_seed() -> u64 {
    rand::rng().random::<u64>()
}
