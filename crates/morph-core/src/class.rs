//! Entity classes and the fixed behaviour profile each one carries.

/// How an entity's displayed orientation is produced.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RotationStrategy {
    /// Sway is folded into the target orientation and the live orientation
    /// slerps toward it. Used by free-floating objects that must rotate
    /// smoothly (cards, ornaments, boxes).
    SlerpSway,
    /// Spin angles are integrated directly from `spin_speed` and applied on
    /// top of the slerped resting orientation.
    SpinAccumulator,
}

/// Population class tag.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityClass {
    Particle = 0,
    Ornament = 1,
    PhotoCard = 2,
    ToyCar = 3,
    GiftBox = 4,
}

/// Static behaviour of a class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassProfile {
    /// Interpolation inertia; heavier classes use smaller weights.
    pub speed_weight: f32,
    /// Range `baseScale` is drawn from.
    pub scale_range: (f32, f32),
    /// Max absolute per-axis spin rate (rad/s).
    pub max_spin: f32,
    /// Whether the class forms the text silhouette in `Glyph`.
    pub has_glyph_target: bool,
    /// Heavy classes gather in the pile instead of on the cone.
    pub piles: bool,
    /// Upright classes stay level and only yaw while assembled.
    pub upright: bool,
    /// Whether the class pulses in `Assembled` and `Glyph`.
    pub pulses: bool,
    pub rotation: RotationStrategy,
    /// Tints for point-cloud output.
    pub palette: &'static [[f32; 3]],
}

const WARM_LIGHTS: &[[f32; 3]] = &[
    [1.0, 0.84, 0.45],
    [1.0, 0.95, 0.8],
    [0.95, 0.35, 0.3],
    [0.55, 0.9, 0.6],
];
const ORNAMENT_TONES: &[[f32; 3]] = &[[0.85, 0.1, 0.15], [0.95, 0.75, 0.2], [0.8, 0.82, 0.88]];
const PAPER: &[[f32; 3]] = &[[0.96, 0.95, 0.92]];
const TOY_PAINT: &[[f32; 3]] = &[[0.9, 0.2, 0.2], [0.2, 0.45, 0.9], [0.95, 0.8, 0.1]];
const WRAPPING: &[[f32; 3]] = &[[0.75, 0.1, 0.15], [0.1, 0.5, 0.3], [0.95, 0.9, 0.85]];

impl EntityClass {
    pub const ALL: [EntityClass; 5] = [
        EntityClass::Particle,
        EntityClass::Ornament,
        EntityClass::PhotoCard,
        EntityClass::ToyCar,
        EntityClass::GiftBox,
    ];

    pub fn profile(self) -> ClassProfile {
        match self {
            EntityClass::Particle => ClassProfile {
                speed_weight: 1.6,
                scale_range: (0.6, 1.4),
                max_spin: 1.5,
                has_glyph_target: true,
                piles: false,
                upright: false,
                pulses: true,
                rotation: RotationStrategy::SpinAccumulator,
                palette: WARM_LIGHTS,
            },
            EntityClass::Ornament => ClassProfile {
                speed_weight: 1.0,
                scale_range: (0.7, 1.2),
                max_spin: 0.8,
                has_glyph_target: true,
                piles: false,
                upright: false,
                pulses: true,
                rotation: RotationStrategy::SlerpSway,
                palette: ORNAMENT_TONES,
            },
            EntityClass::PhotoCard => ClassProfile {
                speed_weight: 0.8,
                scale_range: (0.9, 1.1),
                max_spin: 0.4,
                has_glyph_target: false,
                piles: false,
                upright: false,
                pulses: false,
                rotation: RotationStrategy::SlerpSway,
                palette: PAPER,
            },
            EntityClass::ToyCar => ClassProfile {
                speed_weight: 0.7,
                scale_range: (0.8, 1.1),
                max_spin: 0.9,
                has_glyph_target: false,
                piles: false,
                upright: true,
                pulses: false,
                rotation: RotationStrategy::SpinAccumulator,
                palette: TOY_PAINT,
            },
            EntityClass::GiftBox => ClassProfile {
                speed_weight: 0.5,
                scale_range: (0.6, 1.3),
                max_spin: 0.5,
                has_glyph_target: false,
                piles: true,
                upright: false,
                pulses: false,
                rotation: RotationStrategy::SlerpSway,
                palette: WRAPPING,
            },
        }
    }
}
