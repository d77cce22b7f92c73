//! Global visual mode and the cell that carries it into every frame.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{MorphError, Result};

/// Discrete visual configuration shared by every population.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Scattered = 0,
    Assembled = 1,
    Glyph = 2,
    #[default]
    Closed = 3,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Scattered, Mode::Assembled, Mode::Glyph, Mode::Closed];

    /// The mode hosts usually switch to next: `Closed -> Scattered ->
    /// Assembled -> Glyph -> Scattered -> ...`.
    ///
    /// Only a convenience for hosts; the engine accepts any sequence.
    pub fn next_in_cycle(self) -> Mode {
        match self {
            Mode::Closed => Mode::Scattered,
            Mode::Scattered => Mode::Assembled,
            Mode::Assembled => Mode::Glyph,
            Mode::Glyph => Mode::Scattered,
        }
    }

    /// `true` for modes that define a spatial target (everything but `Closed`).
    pub fn is_spatial(self) -> bool {
        !matches!(self, Mode::Closed)
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    fn from_u8(raw: u8) -> Mode {
        match raw {
            0 => Mode::Scattered,
            1 => Mode::Assembled,
            2 => Mode::Glyph,
            _ => Mode::Closed,
        }
    }
}

impl TryFrom<u32> for Mode {
    type Error = MorphError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Mode::Scattered),
            1 => Ok(Mode::Assembled),
            2 => Ok(Mode::Glyph),
            3 => Ok(Mode::Closed),
            other => Err(MorphError::UnknownMode(other)),
        }
    }
}

/// Single-writer cell holding the active [`Mode`].
///
/// `set` is the only way to change the mode. Per-frame code reads it once
/// through [`ModeController::current`] and carries the value in a
/// `FrameContext`, so a trigger landing mid-frame is seen by the next frame
/// as a whole.
#[derive(Debug)]
pub struct ModeController {
    current: AtomicU8,
}

impl ModeController {
    pub fn new(initial: Mode) -> Self {
        Self {
            current: AtomicU8::new(initial as u8),
        }
    }

    pub fn current(&self) -> Mode {
        Mode::from_u8(self.current.load(Ordering::Acquire))
    }

    /// Switch the active mode. Returns the previous one.
    pub fn set(&self, mode: Mode) -> Mode {
        let previous = Mode::from_u8(self.current.swap(mode as u8, Ordering::AcqRel));
        if previous != mode {
            log::info!("mode {:?} -> {:?}", previous, mode);
        }
        previous
    }

    /// Step to [`Mode::next_in_cycle`] and return the new mode.
    pub fn advance_cycle(&self) -> Mode {
        let next = self.current().next_in_cycle();
        self.set(next);
        next
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}
