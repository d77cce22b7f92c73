use std::sync::Arc;

use glam::Vec3;

use morph_core::{
    BitmapFontSurface, EntityClass, FrameClock, GlyphPointCache, Mode, ModeController, MorphEngine,
    MotionConfig, PopulationConfig, TextLayout,
};

fn textless_engine() -> MorphEngine {
    MorphEngine::new(MotionConfig::default(), Arc::from(Vec::<Vec3>::new())).unwrap()
}

#[test]
fn test_four_entities_settle_on_cone() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut engine = textless_engine();
    let id = engine
        .add_population(PopulationConfig::new(4, EntityClass::Ornament).with_seed(4))
        .unwrap();
    let modes = ModeController::new(Mode::Closed);
    modes.set(Mode::Assembled);

    let dt = 1.0 / 60.0;
    for frame in 0..1000 {
        engine.tick(FrameClock::new(frame as f32 * dt, dt), &modes);
    }
    assert_eq!(engine.frame_count(), 1000);

    let population = engine.population(id).unwrap();
    for (i, (entity, pose)) in population.entities().iter().zip(population.runtime()).enumerate() {
        let err = pose.position().distance(entity.targets.assembled.position);
        assert!(err < 1e-3, "entity {} is {} from its cone target", i, err);
    }
    for record in engine.instances(id).unwrap().records() {
        assert_eq!(record.visibility, 1.0);
        assert!(record.scale[0] > 0.0);
    }
}

#[test]
fn test_full_cycle_with_every_class() {
    let _ = env_logger::builder().is_test(true).try_init();

    let cache = GlyphPointCache::new();
    let layout = TextLayout::default();
    let mut engine = MorphEngine::with_text(
        MotionConfig::default(),
        &cache,
        &mut BitmapFontSurface,
        &layout,
        11,
    )
    .unwrap();
    assert!(!engine.glyph_points().is_empty());
    for class in EntityClass::ALL {
        engine.add_population(PopulationConfig::new(64, class).with_seed(class as u64)).unwrap();
    }

    let modes = ModeController::default();
    let dt = 1.0 / 60.0;
    let mut t = 0.0;
    for _ in 0..4 {
        let mode = modes.advance_cycle();
        for _ in 0..600 {
            t += dt;
            let frame = engine.tick(FrameClock::new(t, dt), &modes);
            assert_eq!(frame.mode, mode);
        }
        for slot in engine.slots() {
            let population = slot.population();
            let visible = match mode {
                Mode::Closed => false,
                Mode::Glyph => population.profile().has_glyph_target,
                _ => true,
            };
            for record in slot.instances().records() {
                assert!(record.position.iter().all(|v| v.is_finite()));
                if visible {
                    let class = population.class();
                    assert!(record.visibility > 0.999, "{:?} hidden in {:?}", class, mode);
                } else {
                    let class = population.class();
                    assert!(record.visibility < 1e-3, "{:?} visible in {:?}", class, mode);
                }
            }
        }
    }
}

#[test]
fn test_glyph_targets_come_from_text() {
    let cache = GlyphPointCache::new();
    let layout = TextLayout::default();
    let mut engine = MorphEngine::with_text(
        MotionConfig::still(),
        &cache,
        &mut BitmapFontSurface,
        &layout,
        5,
    )
    .unwrap();
    let id = engine
        .add_population(PopulationConfig::new(300, EntityClass::Particle).with_seed(5))
        .unwrap();
    let modes = ModeController::new(Mode::Glyph);
    let dt = 1.0 / 60.0;
    for frame in 0..1500 {
        engine.tick(FrameClock::new(frame as f32 * dt, dt), &modes);
    }
    let population = engine.population(id).unwrap();
    let glyph_box = population.config().glyph_box;
    for pose in population.runtime() {
        let p = pose.position();
        assert!(p.x.abs() <= glyph_box.half_width + 1e-3);
        assert!(p.y >= glyph_box.min_y - 1e-3 && p.y <= glyph_box.max_y + 1e-3);
        assert_ne!(p, glyph_box.fallback);
    }
}

#[test]
fn test_rebuild_population_resizes_buffers() {
    let mut engine = textless_engine();
    let id = engine.add_population(PopulationConfig::new(8, EntityClass::GiftBox)).unwrap();
    engine
        .rebuild_population(id, PopulationConfig::new(20, EntityClass::GiftBox).with_seed(1))
        .unwrap();
    assert_eq!(engine.population_count(), 1);
    assert_eq!(engine.instances(id).unwrap().len(), 20);

    let missing = morph_core::PopulationId::from(3);
    let one = PopulationConfig::new(1, EntityClass::GiftBox);
    assert!(engine.rebuild_population(missing, one).is_err());
    assert!(engine.slot(missing).is_err());
}
