//! Text-to-point sampling for the glyph formation.
//!
//! A [`GlyphSurface`] renders the label lines into a [`LuminanceBitmap`];
//! [`extract_points`] keeps every sampled pixel brighter than the threshold
//! and maps it into world space. [`GlyphPointCache`] does this at most once.

pub mod bitmap_font;

use std::sync::{Arc, OnceLock};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{check_positive, MorphError, Result};

pub use bitmap_font::BitmapFontSurface;

/// Text and canvas parameters for the glyph formation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLayout {
    /// One entry per line, top to bottom.
    pub labels: Vec<String>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Cap height of a line in pixels.
    pub font_px: f32,
    /// Line advance as a multiple of `font_px`.
    pub line_height: f32,
    /// Pixels with luminance strictly above this are kept.
    pub threshold: u8,
    /// Scan stride in pixels; thins the point set.
    pub sample_step: u32,
    /// World units per pixel.
    pub world_scale: f32,
    /// World y of the canvas center.
    pub y_offset: f32,
}

/// Largest canvas a layout may ask for (16384 x 16384).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            labels: vec!["MERRY".to_string(), "CHRISTMAS".to_string()],
            canvas_width: 1024,
            canvas_height: 512,
            font_px: 120.0,
            line_height: 1.15,
            threshold: 128,
            sample_step: 4,
            world_scale: 0.02,
            y_offset: 6.0,
        }
    }
}

impl TextLayout {
    pub fn validate(&self) -> Result<()> {
        let pixels = u64::from(self.canvas_width) * u64::from(self.canvas_height);
        if pixels == 0 || pixels > MAX_CANVAS_PIXELS || self.sample_step == 0 {
            return Err(MorphError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
                step: self.sample_step,
            });
        }
        check_positive("font_px", self.font_px)?;
        check_positive("line_height", self.line_height)?;
        check_positive("world_scale", self.world_scale)?;
        if !self.y_offset.is_finite() {
            return Err(MorphError::InvalidParameter {
                name: "y_offset",
                value: self.y_offset,
            });
        }
        Ok(())
    }

    /// Map a pixel center to world space (canvas center lands on
    /// `(0, y_offset, 0)`, y grows upward).
    pub fn pixel_to_world(&self, px: u32, py: u32) -> Vec3 {
        let half_w = self.canvas_width as f32 * 0.5;
        let half_h = self.canvas_height as f32 * 0.5;
        Vec3::new(
            (px as f32 - half_w) * self.world_scale,
            (half_h - py as f32) * self.world_scale + self.y_offset,
            0.0,
        )
    }
}

/// Single-channel 8-bit image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LuminanceBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl LuminanceBitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Build from RGBA8 data (as read back from a 2D canvas). Alpha
    /// premultiplies the luminance so transparent pixels read as dark.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        let len = width as usize * height as usize;
        if rgba.len() < len * 4 {
            return None;
        }
        let pixels = rgba
            .chunks_exact(4)
            .take(len)
            .map(|px| {
                let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
                (luma * px[3] as f32 / 255.0).round().clamp(0.0, 255.0) as u8
            })
            .collect();
        Some(Self { width, height, pixels })
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Fill the clipped rectangle `[x0, x1) x [y0, y1)` with `value`.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, value: u8) {
        let x0 = x0.clamp(0, self.width as i64) as usize;
        let x1 = x1.clamp(0, self.width as i64) as usize;
        let y0 = y0.clamp(0, self.height as i64) as usize;
        let y1 = y1.clamp(0, self.height as i64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize;
        for y in y0..y1 {
            self.pixels[y * stride + x0..y * stride + x1].fill(value);
        }
    }
}

/// Something that can render label text off-screen.
pub trait GlyphSurface {
    /// Render `layout.labels` centered on a `canvas_width x canvas_height`
    /// canvas. `None` means no rasterization backend is available.
    fn rasterize(&mut self, layout: &TextLayout) -> Option<LuminanceBitmap>;
}

/// Surface for environments without any text rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessSurface;

impl GlyphSurface for HeadlessSurface {
    fn rasterize(&mut self, _layout: &TextLayout) -> Option<LuminanceBitmap> {
        None
    }
}

/// Sample bright pixels of `bitmap` into world-space points, shuffled.
pub fn extract_points(
    bitmap: &LuminanceBitmap,
    layout: &TextLayout,
    rng: &mut StdRng,
) -> Vec<Vec3> {
    let step = layout.sample_step.max(1) as usize;
    let mut points = Vec::new();
    for py in (0..bitmap.height).step_by(step) {
        for px in (0..bitmap.width).step_by(step) {
            if bitmap.get(px, py) > layout.threshold {
                points.push(layout.pixel_to_world(px, py));
            }
        }
    }
    // Fisher-Yates; later sampling can then take any prefix unbiased.
    points.shuffle(rng);
    points
}

/// Validate, rasterize and sample. An unavailable surface yields an empty set.
pub fn rasterize_points(
    surface: &mut dyn GlyphSurface,
    layout: &TextLayout,
    seed: u64,
) -> Result<Vec<Vec3>> {
    layout.validate()?;
    let Some(bitmap) = surface.rasterize(layout) else {
        log::warn!("text rasterization unavailable, glyph targets use the fallback point");
        return Ok(Vec::new());
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let points = extract_points(&bitmap, layout, &mut rng);
    if points.is_empty() {
        log::warn!("text rasterized to zero bright pixels, glyph targets use the fallback point");
    } else {
        log::debug!(
            "rasterized {} label line(s) into {} glyph points",
            layout.labels.len(),
            points.len()
        );
    }
    Ok(points)
}

/// Lazily computed glyph point set, rasterized at most once.
#[derive(Debug, Default)]
pub struct GlyphPointCache {
    points: OnceLock<Arc<[Vec3]>>,
}

impl GlyphPointCache {
    pub const fn new() -> Self {
        Self {
            points: OnceLock::new(),
        }
    }

    /// Process-wide cache.
    pub fn global() -> &'static GlyphPointCache {
        static GLOBAL: GlyphPointCache = GlyphPointCache::new();
        &GLOBAL
    }

    /// Cache pre-filled with `points` (no rasterization will ever happen).
    pub fn with_points(points: Vec<Vec3>) -> Self {
        let cache = Self::new();
        let _ = cache.points.set(points.into());
        cache
    }

    /// Return the cached points, rasterizing on the first call.
    ///
    /// Later calls return the same allocation and never touch `surface`.
    /// A configuration error is returned without filling the cache.
    pub fn points_or_rasterize(
        &self,
        surface: &mut dyn GlyphSurface,
        layout: &TextLayout,
        seed: u64,
    ) -> Result<Arc<[Vec3]>> {
        if let Some(points) = self.points.get() {
            return Ok(Arc::clone(points));
        }
        let fresh: Arc<[Vec3]> = rasterize_points(surface, layout, seed)?.into();
        // Another thread may have won the race; keep whichever landed first.
        Ok(Arc::clone(self.points.get_or_init(|| fresh)))
    }

    pub fn get(&self) -> Option<Arc<[Vec3]>> {
        self.points.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.points.get().is_some()
    }
}
