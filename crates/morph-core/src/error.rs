use thiserror::Error;

/// Errors surfaced while configuring the morph engine.
///
/// Every variant is a construction-time mistake. The per-frame path has no
/// error returns: numeric edge cases there are clamped instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MorphError {
    /// A population was requested with zero entities
    #[error("population must contain at least one entity")]
    EmptyPopulation,

    /// A geometric or motion parameter is non-finite or out of range
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// The text canvas has a zero dimension or a zero sample step
    #[error("invalid text canvas {width}x{height} (step {step})")]
    InvalidCanvas { width: u32, height: u32, step: u32 },

    /// A mode trigger carried a value outside the known modes
    #[error("unknown mode value {0}")]
    UnknownMode(u32),

    /// A population handle does not refer to a live population
    #[error("unknown population id {0}")]
    UnknownPopulation(usize),
}

pub type Result<T> = std::result::Result<T, MorphError>;

/// Reject NaN and infinities.
pub(crate) fn check_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MorphError::InvalidParameter { name, value })
    }
}

/// Reject non-finite values and values below `min`.
pub(crate) fn check_at_least(name: &'static str, value: f32, min: f32) -> Result<()> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(MorphError::InvalidParameter { name, value })
    }
}

/// Reject non-finite and non-positive values.
pub(crate) fn check_positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MorphError::InvalidParameter { name, value })
    }
}

/// Reject values outside `[0, 1]`.
pub(crate) fn check_unit(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MorphError::InvalidParameter { name, value })
    }
}
