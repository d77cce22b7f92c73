use glam::Vec3;

use crate::class::EntityClass;
use crate::error::{check_at_least, check_finite, check_positive, check_unit, MorphError, Result};

/// Per-frame motion constants shared by every population.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionConfig {
    /// Multiplies `dt * speed_weight` to form the interpolation factor.
    pub rate_constant: f32,
    pub float_speed: f32,
    pub float_amplitude: f32,
    pub sway_speed: f32,
    /// Peak sway angle in radians.
    pub sway_amplitude: f32,
    pub pulse_speed: f32,
    pub pulse_amplitude: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            rate_constant: 2.0,
            float_speed: 1.2,
            float_amplitude: 0.15,
            sway_speed: 0.8,
            sway_amplitude: 0.12,
            pulse_speed: 3.0,
            pulse_amplitude: 0.08,
        }
    }
}

impl MotionConfig {
    /// Motion with every procedural layer switched off: plain interpolation.
    pub fn still() -> Self {
        Self {
            float_amplitude: 0.0,
            sway_amplitude: 0.0,
            pulse_amplitude: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("rate_constant", self.rate_constant)?;
        check_at_least("float_speed", self.float_speed, 0.0)?;
        check_at_least("float_amplitude", self.float_amplitude, 0.0)?;
        check_at_least("sway_speed", self.sway_speed, 0.0)?;
        check_at_least("sway_amplitude", self.sway_amplitude, 0.0)?;
        check_at_least("pulse_speed", self.pulse_speed, 0.0)?;
        // A pulse of 1.0 or more would flip the scale sign.
        check_at_least("pulse_amplitude", self.pulse_amplitude, 0.0)?;
        if self.pulse_amplitude >= 1.0 {
            return Err(MorphError::InvalidParameter {
                name: "pulse_amplitude",
                value: self.pulse_amplitude,
            });
        }
        Ok(())
    }
}

/// Geometry of the scattered cloud, the cone formation and the pile.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormationParams {
    /// Cone height above `base_y`.
    pub height: f32,
    /// Cone radius at `base_y`.
    pub base_radius: f32,
    /// Ground plane; the cone base and the pile sit here.
    pub base_y: f32,
    /// Full turns the spiral makes from base to apex.
    pub spiral_turns: f32,
    /// Max angular jitter (radians) added to the spiral angle.
    pub angle_jitter: f32,
    /// Max radial jitter added to the cone radius.
    pub radial_jitter: f32,
    pub sphere_radius: f32,
    /// Vertical lift applied to the scattered cloud.
    pub scatter_lift: f32,
    /// Upright entities below this height are moved to the ground ring.
    pub upright_ground_threshold: f32,
    pub ring_offset: f32,
    pub ring_width: f32,
    /// Fraction of heavy entities drawn from the pile disk.
    pub pile_ratio: f32,
    pub pile_max_radius: f32,
    pub pile_height: f32,
    /// Heavy entities outside the pile use the lowest part of the cone.
    pub pile_cone_fraction: f32,
}

impl Default for FormationParams {
    fn default() -> Self {
        Self {
            height: 14.0,
            base_radius: 5.5,
            base_y: -6.0,
            spiral_turns: 9.0,
            angle_jitter: 0.35,
            radial_jitter: 0.4,
            sphere_radius: 16.0,
            scatter_lift: 3.0,
            upright_ground_threshold: 1.5,
            ring_offset: 0.8,
            ring_width: 2.0,
            pile_ratio: 0.85,
            pile_max_radius: 7.0,
            pile_height: 2.5,
            pile_cone_fraction: 0.35,
        }
    }
}

impl FormationParams {
    pub fn validate(&self) -> Result<()> {
        check_positive("height", self.height)?;
        check_positive("base_radius", self.base_radius)?;
        check_finite("base_y", self.base_y)?;
        check_at_least("spiral_turns", self.spiral_turns, 0.0)?;
        check_at_least("angle_jitter", self.angle_jitter, 0.0)?;
        check_at_least("radial_jitter", self.radial_jitter, 0.0)?;
        check_positive("sphere_radius", self.sphere_radius)?;
        check_finite("scatter_lift", self.scatter_lift)?;
        check_at_least("upright_ground_threshold", self.upright_ground_threshold, 0.0)?;
        check_at_least("ring_offset", self.ring_offset, 0.0)?;
        check_at_least("ring_width", self.ring_width, 0.0)?;
        check_unit("pile_ratio", self.pile_ratio)?;
        check_positive("pile_max_radius", self.pile_max_radius)?;
        check_positive("pile_height", self.pile_height)?;
        check_unit("pile_cone_fraction", self.pile_cone_fraction)?;
        Ok(())
    }
}

/// Box that glyph targets are clamped into, behind the rendered text.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphBox {
    pub center_x: f32,
    pub half_width: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Depth of the glyph plane.
    pub depth: f32,
    pub depth_jitter: f32,
    /// Target used for every entity when no text points are available.
    pub fallback: Vec3,
}

impl Default for GlyphBox {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            half_width: 11.0,
            min_y: 1.0,
            max_y: 11.0,
            depth: -0.6,
            depth_jitter: 0.5,
            fallback: Vec3::new(0.0, 6.0, -0.6),
        }
    }
}

impl GlyphBox {
    pub fn validate(&self) -> Result<()> {
        check_finite("center_x", self.center_x)?;
        check_at_least("half_width", self.half_width, 0.0)?;
        check_finite("min_y", self.min_y)?;
        check_at_least("max_y", self.max_y, self.min_y)?;
        check_finite("depth", self.depth)?;
        check_at_least("depth_jitter", self.depth_jitter, 0.0)?;
        if !self.fallback.is_finite() {
            return Err(MorphError::InvalidParameter {
                name: "fallback",
                value: f32::NAN,
            });
        }
        Ok(())
    }
}

/// Everything needed to build one population.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationConfig {
    pub count: usize,
    pub class: EntityClass,
    pub formation: FormationParams,
    pub glyph_box: GlyphBox,
    /// Fixed seed for reproducible layouts; `None` draws one from the host.
    pub seed: Option<u64>,
}

impl PopulationConfig {
    pub fn new(count: usize, class: EntityClass) -> Self {
        Self {
            count,
            class,
            formation: FormationParams::default(),
            glyph_box: GlyphBox::default(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_formation(mut self, formation: FormationParams) -> Self {
        self.formation = formation;
        self
    }

    pub fn with_glyph_box(mut self, glyph_box: GlyphBox) -> Self {
        self.glyph_box = glyph_box;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(MorphError::EmptyPopulation);
        }
        self.formation.validate()?;
        self.glyph_box.validate()
    }
}
