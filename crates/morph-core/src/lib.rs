//! Multi-state spatial morph engine.
//!
//! Populations of particles and instanced objects glide between a scattered
//! cloud, a cone formation, a text silhouette and a hidden state. Targets are
//! generated once per population; every frame the scheduler moves each entity
//! toward the target of the current [`Mode`], layers procedural motion on top
//! and the writer packs the result into fixed-stride GPU buffers.
pub mod class;
pub mod config;
pub mod engine;
pub mod error;
pub mod instance;
pub mod math;
pub mod mode;
pub mod motion;
pub mod population;
pub mod scheduler;
pub mod shapes;
pub mod text;

pub use class::{ClassProfile, EntityClass, RotationStrategy};
pub use config::{FormationParams, GlyphBox, MotionConfig, PopulationConfig};
pub use engine::{MorphEngine, PopulationId, PopulationSlot};
pub use error::{MorphError, Result};
pub use instance::{InstanceBuffer, InstanceRecord, InstanceWriter, PointCloudBuffer};
pub use mode::{Mode, ModeController};
pub use motion::{DisplayPose, ProceduralMotion};
pub use population::{Entity, Population, RuntimePose};
pub use scheduler::{advance_all, FrameClock, FrameContext, MorphScheduler};
pub use text::{
    BitmapFontSurface, GlyphPointCache, GlyphSurface, HeadlessSurface, LuminanceBitmap, TextLayout,
};
