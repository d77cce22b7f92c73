use glam::Vec3;

use morph_core::config::{FormationParams, GlyphBox};
use morph_core::{EntityClass, Mode, MorphError, Population, PopulationConfig, RotationStrategy};

fn seeded(class: EntityClass, count: usize, seed: u64) -> Population {
    Population::build(PopulationConfig::new(count, class).with_seed(seed), &[]).unwrap()
}

#[test]
fn test_same_seed_same_layout() {
    let points = [Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, 8.0, 0.0)];
    let config = PopulationConfig::new(120, EntityClass::Ornament).with_seed(77);
    let a = Population::build(config.clone(), &points).unwrap();
    let b = Population::build(config, &points).unwrap();
    assert_eq!(a.seed(), 77);
    assert_eq!(a.entities(), b.entities());
}

#[test]
fn test_different_seeds_differ() {
    let a = seeded(EntityClass::GiftBox, 50, 1);
    let b = seeded(EntityClass::GiftBox, 50, 2);
    assert_ne!(a.entities(), b.entities());
}

#[test]
fn test_unseeded_builds_draw_fresh_seeds() {
    let mut seeds: Vec<u64> = (0..8)
        .map(|_| {
            Population::build(PopulationConfig::new(4, EntityClass::Particle), &[])
                .unwrap()
                .seed()
        })
        .collect();
    seeds.sort_unstable();
    seeds.dedup();
    assert_eq!(seeds.len(), 8, "unseeded builds reused a seed");
}

#[test]
fn test_empty_population_rejected() {
    let err = Population::build(PopulationConfig::new(0, EntityClass::PhotoCard), &[]).unwrap_err();
    assert_eq!(err, MorphError::EmptyPopulation);
}

#[test]
fn test_invalid_formation_rejected() {
    let formation = FormationParams {
        height: -2.0,
        ..FormationParams::default()
    };
    let config = PopulationConfig::new(10, EntityClass::Ornament).with_formation(formation);
    assert!(matches!(
        Population::build(config, &[]),
        Err(MorphError::InvalidParameter { name: "height", .. })
    ));

    let glyph_box = GlyphBox {
        min_y: 5.0,
        max_y: 1.0,
        ..GlyphBox::default()
    };
    let config = PopulationConfig::new(10, EntityClass::Particle).with_glyph_box(glyph_box);
    assert!(Population::build(config, &[]).is_err());
}

#[test]
fn test_runtime_starts_on_scattered_targets() {
    let population = seeded(EntityClass::ToyCar, 40, 3);
    assert_eq!(population.resting_mode(), Mode::Scattered);
    for (entity, pose) in population.entities().iter().zip(population.runtime()) {
        assert_eq!(pose.position(), entity.targets.scattered.position);
        assert_eq!(pose.orientation(), entity.targets.scattered.orientation);
        assert_eq!(pose.visibility(), 1.0);
        assert_eq!(pose.spin_phase(), Vec3::ZERO);
    }
}

#[test]
fn test_entities_follow_class_profile() {
    for class in EntityClass::ALL {
        let population = seeded(class, 200, 9);
        let profile = population.profile();
        assert_eq!(population.len(), 200);
        assert_eq!(population.class(), class);
        for entity in population.entities() {
            assert_eq!(entity.speed_weight, profile.speed_weight);
            let (min_scale, max_scale) = profile.scale_range;
            assert!(entity.base_scale >= min_scale && entity.base_scale <= max_scale);
            assert!(entity.spin_speed.abs().max_element() <= profile.max_spin + 1e-6);
            assert!(profile.palette.contains(&entity.tint));
            assert_eq!(entity.targets.glyph.is_some(), profile.has_glyph_target);
        }
    }
}

#[test]
fn test_class_table() {
    let particle = EntityClass::Particle.profile();
    let gift = EntityClass::GiftBox.profile();
    let car = EntityClass::ToyCar.profile();
    assert!(particle.speed_weight > gift.speed_weight);
    assert_eq!(particle.rotation, RotationStrategy::SpinAccumulator);
    assert_eq!(EntityClass::Ornament.profile().rotation, RotationStrategy::SlerpSway);
    assert!(gift.piles && !particle.piles);
    assert!(car.upright);
    assert!(!EntityClass::PhotoCard.profile().has_glyph_target);
}

#[test]
fn test_accessors_bounds() {
    let population = seeded(EntityClass::Ornament, 3, 0);
    assert!(population.entity(2).is_some());
    assert!(population.entity(3).is_none());
    assert!(population.pose(3).is_none());
    assert!(!population.is_empty());
}
