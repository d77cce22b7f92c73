use glam::Vec3;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{OffscreenCanvas, OffscreenCanvasRenderingContext2d};

use morph_core::{
    EntityClass, FrameClock, GlyphPointCache, GlyphSurface, LuminanceBitmap, Mode, ModeController,
    MorphEngine, MotionConfig, PopulationConfig, PopulationId, TextLayout,
};

/// Text surface backed by an `OffscreenCanvas` 2D context.
struct CanvasSurface {
    font_family: String,
}

impl CanvasSurface {
    fn draw(&self, layout: &TextLayout) -> Result<LuminanceBitmap, JsValue> {
        let canvas = OffscreenCanvas::new(layout.canvas_width, layout.canvas_height)?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<OffscreenCanvasRenderingContext2d>()?;

        let width = layout.canvas_width as f64;
        let height = layout.canvas_height as f64;
        #[allow(deprecated)]
        ctx.set_fill_style(&JsValue::from_str("#000"));
        ctx.fill_rect(0.0, 0.0, width, height);
        #[allow(deprecated)]
        ctx.set_fill_style(&JsValue::from_str("#fff"));
        ctx.set_font(&format!("bold {}px {}", layout.font_px, self.font_family));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        let line_advance = (layout.font_px * layout.line_height) as f64;
        let lines = layout.labels.len();
        let first = height * 0.5 - line_advance * lines.saturating_sub(1) as f64 * 0.5;
        for (i, label) in layout.labels.iter().enumerate() {
            ctx.fill_text(label, width * 0.5, first + line_advance * i as f64)?;
        }

        let image = ctx.get_image_data(0.0, 0.0, width, height)?;
        LuminanceBitmap::from_rgba(layout.canvas_width, layout.canvas_height, &image.data())
            .ok_or_else(|| JsValue::from_str("short image data"))
    }
}

impl GlyphSurface for CanvasSurface {
    fn rasterize(&mut self, layout: &TextLayout) -> Option<LuminanceBitmap> {
        match self.draw(layout) {
            Ok(bitmap) => Some(bitmap),
            Err(err) => {
                web_sys::console::warn_1(&err);
                None
            }
        }
    }
}

fn host_seed() -> u64 {
    getrandom::u64().unwrap_or_else(|_| (js_sys::Math::random() * u64::MAX as f64) as u64)
}

fn class_from_u32(tag: u32) -> Option<EntityClass> {
    EntityClass::ALL.into_iter().find(|c| *c as u32 == tag)
}

/// Population config from the JS arguments; a negative seed draws one.
fn population_config(class: u32, count: u32, seed: f64) -> Option<PopulationConfig> {
    let class = class_from_u32(class)?;
    let seed = if seed >= 0.0 { seed as u64 } else { host_seed() };
    Some(PopulationConfig::new(count as usize, class).with_seed(seed))
}

/// Instance count of the largest population; sizes the matrix scratch buffer.
fn largest_population(engine: &MorphEngine) -> usize {
    engine
        .slots()
        .iter()
        .map(|slot| slot.instances().len())
        .max()
        .unwrap_or(0)
}

#[wasm_bindgen]
pub struct MorphWorld {
    engine: MorphEngine,
    modes: ModeController,
    matrices: Vec<glam::Mat4>,
}

#[wasm_bindgen]
impl MorphWorld {
    /// `labels` are newline-separated lines for the glyph formation.
    #[wasm_bindgen(constructor)]
    pub fn new(labels: &str, font_family: &str) -> Result<MorphWorld, JsValue> {
        let layout = TextLayout {
            labels: labels.lines().map(str::to_string).collect(),
            ..TextLayout::default()
        };
        let mut surface = CanvasSurface {
            font_family: font_family.to_string(),
        };
        let engine = MorphEngine::with_text(
            MotionConfig::default(),
            GlyphPointCache::global(),
            &mut surface,
            &layout,
            host_seed(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        web_sys::console::log_1(
            &format!(
                "WASM MorphWorld created: {} glyph points",
                engine.glyph_points().len()
            )
            .into(),
        );

        Ok(MorphWorld {
            engine,
            modes: ModeController::new(Mode::Closed),
            matrices: Vec::new(),
        })
    }

    /// Add a population; returns its id. Pass `seed < 0` for a random layout.
    #[wasm_bindgen]
    pub fn add_population(&mut self, class: u32, count: u32, seed: f64) -> Result<u32, JsValue> {
        let config = population_config(class, count, seed)
            .ok_or_else(|| JsValue::from_str("unknown entity class"))?;
        let class = config.class;
        let id = self
            .engine
            .add_population(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.resize_matrices();
        web_sys::console::log_1(
            &format!("population {} ({:?}): {} entities", id.index(), class, count).into(),
        );
        Ok(id.index() as u32)
    }

    /// Replace population `id` with a freshly generated one. Buffer pointers
    /// of that population are invalidated and must be fetched again.
    #[wasm_bindgen]
    pub fn rebuild_population(
        &mut self,
        id: u32,
        class: u32,
        count: u32,
        seed: f64,
    ) -> Result<(), JsValue> {
        let config = population_config(class, count, seed)
            .ok_or_else(|| JsValue::from_str("unknown entity class"))?;
        self.engine
            .rebuild_population(PopulationId::from(id as usize), config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.resize_matrices();
        web_sys::console::log_1(&format!("population {} rebuilt: {} entities", id, count).into());
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_mode(&mut self, mode: u32) -> Result<(), JsValue> {
        let mode = Mode::try_from(mode).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.modes.set(mode);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn mode(&self) -> u32 {
        self.modes.current().as_u32()
    }

    /// Step to the next mode of the usual cycle and return it.
    #[wasm_bindgen]
    pub fn cycle_mode(&mut self) -> u32 {
        self.modes.advance_cycle().as_u32()
    }

    #[wasm_bindgen]
    pub fn tick(&mut self, elapsed: f32, delta: f32) -> f32 {
        let start = js_sys::Date::now();
        self.engine.tick(FrameClock::new(elapsed, delta), &self.modes);
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    #[wasm_bindgen]
    pub fn population_count(&self) -> u32 {
        self.engine.population_count() as u32
    }

    #[wasm_bindgen]
    pub fn instance_count(&self, id: u32) -> usize {
        self.engine.instances(PopulationId::from(id as usize)).map_or(0, |b| b.len())
    }

    #[wasm_bindgen]
    pub fn get_instance_buffer_ptr(&self, id: u32) -> *const f32 {
        self.engine
            .instances(PopulationId::from(id as usize))
            .map_or(std::ptr::null(), |b| b.as_floats().as_ptr())
    }

    #[wasm_bindgen]
    pub fn get_instance_buffer_byte_length(&self, id: u32) -> usize {
        self.engine.instances(PopulationId::from(id as usize)).map_or(0, |b| b.byte_len())
    }

    /// Returns and clears the needs-upload flag of a population's buffer.
    #[wasm_bindgen]
    pub fn take_dirty(&mut self, id: u32) -> bool {
        self.engine
            .slot_mut(PopulationId::from(id as usize))
            .map_or(false, |slot| slot.instances_mut().take_dirty())
    }

    /// Fill the shared matrix scratch buffer for `id` and return its pointer
    /// (16 floats per instance, column-major).
    #[wasm_bindgen]
    pub fn get_matrix_buffer_ptr(&mut self, id: u32) -> *const f32 {
        let Ok(instances) = self.engine.instances(PopulationId::from(id as usize)) else {
            return std::ptr::null();
        };
        let written = instances.write_matrices(&mut self.matrices);
        bytemuck::cast_slice::<glam::Mat4, f32>(&self.matrices[..written]).as_ptr()
    }

    #[wasm_bindgen]
    pub fn get_point_positions_ptr(&self, id: u32) -> *const f32 {
        self.engine
            .slot(PopulationId::from(id as usize))
            .ok()
            .and_then(|slot| slot.points())
            .map_or(std::ptr::null(), |p| p.positions().as_ptr())
    }

    #[wasm_bindgen]
    pub fn get_point_colors_ptr(&self, id: u32) -> *const f32 {
        self.engine
            .slot(PopulationId::from(id as usize))
            .ok()
            .and_then(|slot| slot.points())
            .map_or(std::ptr::null(), |p| p.colors().as_ptr())
    }

    #[wasm_bindgen]
    pub fn get_point_sizes_ptr(&self, id: u32) -> *const f32 {
        self.engine
            .slot(PopulationId::from(id as usize))
            .ok()
            .and_then(|slot| slot.points())
            .map_or(std::ptr::null(), |p| p.sizes().as_ptr())
    }

    #[wasm_bindgen]
    pub fn glyph_point_count(&self) -> usize {
        self.engine.glyph_points().len()
    }

    /// Glyph points as a flat xyz array (for debug overlays).
    #[wasm_bindgen]
    pub fn glyph_points(&self) -> Vec<f32> {
        self.engine
            .glyph_points()
            .iter()
            .flat_map(|p: &Vec3| p.to_array())
            .collect()
    }

    fn resize_matrices(&mut self) {
        let largest = largest_population(&self.engine);
        self.matrices.resize(largest, glam::Mat4::IDENTITY);
    }
}
