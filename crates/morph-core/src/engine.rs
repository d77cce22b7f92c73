use std::sync::Arc;

use glam::Vec3;

use crate::class::EntityClass;
use crate::config::{MotionConfig, PopulationConfig};
use crate::error::{MorphError, Result};
use crate::instance::{InstanceBuffer, InstanceWriter, PointCloudBuffer};
use crate::mode::ModeController;
use crate::population::Population;
use crate::scheduler::{advance_all, FrameClock, FrameContext, MorphScheduler};
use crate::text::{GlyphPointCache, GlyphSurface, TextLayout};

/// Handle to a population owned by a [`MorphEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PopulationId(usize);

impl PopulationId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for PopulationId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// A population together with the buffers it writes every frame.
#[derive(Clone, Debug)]
pub struct PopulationSlot {
    population: Population,
    instances: InstanceBuffer,
    /// Present for point-cloud classes.
    points: Option<PointCloudBuffer>,
}

impl PopulationSlot {
    fn new(population: Population) -> Self {
        let count = population.len();
        let points =
            (population.class() == EntityClass::Particle).then(|| PointCloudBuffer::new(count));
        let mut slot = Self {
            population,
            instances: InstanceBuffer::new(count),
            points,
        };
        slot.write_outputs();
        slot
    }

    fn write_outputs(&mut self) {
        InstanceWriter::write(&self.population, &mut self.instances);
        if let Some(points) = self.points.as_mut() {
            InstanceWriter::write_points(&self.population, points);
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut InstanceBuffer {
        &mut self.instances
    }

    pub fn points(&self) -> Option<&PointCloudBuffer> {
        self.points.as_ref()
    }

    pub fn points_mut(&mut self) -> Option<&mut PointCloudBuffer> {
        self.points.as_mut()
    }
}

/// Owns every population and drives them from the host's frame clock.
///
/// The mode is not stored here: hosts keep a [`ModeController`] and pass it
/// to [`MorphEngine::tick`].
#[derive(Clone, Debug)]
pub struct MorphEngine {
    scheduler: MorphScheduler,
    glyph_points: Arc<[Vec3]>,
    slots: Vec<PopulationSlot>,
    frames: u64,
}

impl MorphEngine {
    /// Engine whose glyph formation samples `glyph_points` (may be empty).
    pub fn new(motion: MotionConfig, glyph_points: Arc<[Vec3]>) -> Result<Self> {
        Ok(Self {
            scheduler: MorphScheduler::new(motion)?,
            glyph_points,
            slots: Vec::new(),
            frames: 0,
        })
    }

    /// Engine whose glyph points come from `cache`, rasterizing through
    /// `surface` if the cache is still empty.
    pub fn with_text(
        motion: MotionConfig,
        cache: &GlyphPointCache,
        surface: &mut dyn GlyphSurface,
        layout: &TextLayout,
        seed: u64,
    ) -> Result<Self> {
        let points = cache.points_or_rasterize(surface, layout, seed)?;
        Self::new(motion, points)
    }

    pub fn glyph_points(&self) -> &[Vec3] {
        &self.glyph_points
    }

    pub fn scheduler(&self) -> &MorphScheduler {
        &self.scheduler
    }

    /// Build a population and allocate its buffers.
    pub fn add_population(&mut self, config: PopulationConfig) -> Result<PopulationId> {
        let population = Population::build(config, &self.glyph_points)?;
        self.slots.push(PopulationSlot::new(population));
        Ok(PopulationId(self.slots.len() - 1))
    }

    /// Discard a population and build a fresh one in its place.
    ///
    /// Buffers are reallocated for the new count; the id stays valid.
    pub fn rebuild_population(&mut self, id: PopulationId, config: PopulationConfig) -> Result<()> {
        if id.0 >= self.slots.len() {
            return Err(MorphError::UnknownPopulation(id.0));
        }
        let population = Population::build(config, &self.glyph_points)?;
        log::debug!("rebuilt population {} with {} entities", id.0, population.len());
        self.slots[id.0] = PopulationSlot::new(population);
        Ok(())
    }

    /// Advance one frame: sample the mode once, move every population, then
    /// write every output buffer.
    pub fn tick(&mut self, clock: FrameClock, modes: &ModeController) -> FrameContext {
        let populations = self.slots.iter_mut().map(|slot| &mut slot.population);
        let frame = advance_all(&self.scheduler, populations, modes, clock);
        for slot in &mut self.slots {
            slot.write_outputs();
        }
        self.frames += 1;
        frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn population_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, id: PopulationId) -> Result<&PopulationSlot> {
        self.slots.get(id.0).ok_or(MorphError::UnknownPopulation(id.0))
    }

    pub fn slot_mut(&mut self, id: PopulationId) -> Result<&mut PopulationSlot> {
        self.slots.get_mut(id.0).ok_or(MorphError::UnknownPopulation(id.0))
    }

    pub fn population(&self, id: PopulationId) -> Result<&Population> {
        self.slot(id).map(PopulationSlot::population)
    }

    pub fn instances(&self, id: PopulationId) -> Result<&InstanceBuffer> {
        self.slot(id).map(PopulationSlot::instances)
    }

    pub fn slots(&self) -> &[PopulationSlot] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;

    #[test]
    fn test_unknown_population_id() {
        let mut engine = MorphEngine::new(MotionConfig::default(), Arc::from(Vec::new())).unwrap();
        let err = engine
            .rebuild_population(PopulationId(3), PopulationConfig::new(2, EntityClass::Ornament))
            .unwrap_err();
        assert_eq!(err, MorphError::UnknownPopulation(3));
        assert!(engine.population(PopulationId(0)).is_err());
    }

    #[test]
    fn test_rebuild_resizes_buffers() {
        let mut engine = MorphEngine::new(MotionConfig::default(), Arc::from(Vec::new())).unwrap();
        let id = engine
            .add_population(PopulationConfig::new(10, EntityClass::Particle).with_seed(1))
            .unwrap();
        engine
            .rebuild_population(id, PopulationConfig::new(25, EntityClass::Particle).with_seed(2))
            .unwrap();
        let slot = engine.slot(id).unwrap();
        assert_eq!(slot.population().len(), 25);
        assert_eq!(slot.instances().len(), 25);
        assert_eq!(slot.points().map(PointCloudBuffer::len), Some(25));
    }

    #[test]
    fn test_invalid_rebuild_keeps_old_population() {
        let mut engine = MorphEngine::new(MotionConfig::default(), Arc::from(Vec::new())).unwrap();
        let id = engine
            .add_population(PopulationConfig::new(6, EntityClass::ToyCar).with_seed(1))
            .unwrap();
        let empty = PopulationConfig::new(0, EntityClass::ToyCar);
        assert!(engine.rebuild_population(id, empty).is_err());
        assert_eq!(engine.population(id).unwrap().len(), 6);
    }

    #[test]
    fn test_tick_counts_frames_and_reports_mode() {
        let mut engine = MorphEngine::new(MotionConfig::default(), Arc::from(Vec::new())).unwrap();
        engine.add_population(PopulationConfig::new(3, EntityClass::GiftBox).with_seed(5)).unwrap();
        let modes = ModeController::new(Mode::Assembled);
        let frame = engine.tick(FrameClock::new(0.0, 1.0 / 60.0), &modes);
        assert_eq!(frame.mode, Mode::Assembled);
        assert_eq!(engine.frame_count(), 1);
    }
}
