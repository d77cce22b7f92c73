use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use morph_core::config::{FormationParams, GlyphBox, PopulationConfig};
use morph_core::shapes::cone::cone_radius;
use morph_core::shapes::glyph::glyph_pose;
use morph_core::shapes::pile::pile_envelope;
use morph_core::shapes::scatter::{scatter_pose, sphere_volume_point};
use morph_core::{EntityClass, Mode, Population};

fn horizontal(p: Vec3) -> f32 {
    Vec3::new(p.x, 0.0, p.z).length()
}

#[test]
fn test_sphere_samples_are_volume_uniform() {
    let radius = 16.0;
    let n = 20_000;
    let mut rng = StdRng::seed_from_u64(2024);
    let mut bins = [0usize; 10];
    let mut sum_r3 = 0.0f64;
    let mut sum_r = 0.0f64;
    let mut sum_cos_polar = 0.0f64;
    let mut sum_cos_azimuth = 0.0f64;
    for _ in 0..n {
        let p = sphere_volume_point(&mut rng, radius);
        let r = p.length();
        assert!(r <= radius + 1e-4, "sample outside sphere: r={}", r);
        let u = (r / radius).powi(3);
        sum_r3 += u as f64;
        sum_r += (r / radius) as f64;
        bins[((u * 10.0) as usize).min(9)] += 1;
        if r > 1e-6 {
            sum_cos_polar += (p.y / r) as f64;
            let h = horizontal(p);
            if h > 1e-6 {
                sum_cos_azimuth += (p.x / h) as f64;
            }
        }
    }
    let n_f = n as f64;
    // radius^3 / R^3 ~ U(0,1): mean 1/2, every decile equally full
    assert!((sum_r3 / n_f - 0.5).abs() < 0.02, "mean r^3 = {}", sum_r3 / n_f);
    // E[r/R] = 3/4 for uniform volume (0.5 for surface-biased, 1.0 for shell)
    assert!((sum_r / n_f - 0.75).abs() < 0.01, "mean r = {}", sum_r / n_f);
    for (i, &count) in bins.iter().enumerate() {
        let expected = n / 10;
        assert!(
            (count as i64 - expected as i64).abs() < (expected as i64) / 10,
            "decile {} holds {} samples, expected ~{}",
            i,
            count,
            expected
        );
    }
    assert!((sum_cos_polar / n_f).abs() < 0.02, "polar bias {}", sum_cos_polar / n_f);
    assert!((sum_cos_azimuth / n_f).abs() < 0.02, "azimuth bias {}", sum_cos_azimuth / n_f);
}

#[test]
fn test_scatter_pose_lifted_above_center() {
    let params = FormationParams::default();
    let mut rng = StdRng::seed_from_u64(8);
    let mut sum_y = 0.0;
    let n = 5000;
    for _ in 0..n {
        let pose = scatter_pose(&mut rng, &params);
        let local = pose.position - Vec3::Y * params.scatter_lift;
        assert!(local.length() <= params.sphere_radius + 1e-3);
        assert!((pose.orientation.length() - 1.0).abs() < 1e-4);
        sum_y += pose.position.y;
    }
    let mean_y = sum_y / n as f32;
    assert!((mean_y - params.scatter_lift).abs() < 0.5, "cloud center y = {}", mean_y);
}

#[test]
fn test_cone_targets_within_radius_bound() {
    let params = FormationParams::default();
    let population = Population::build(
        PopulationConfig::new(3000, EntityClass::Particle).with_seed(31),
        &[],
    )
    .unwrap();
    for (i, entity) in population.entities().iter().enumerate() {
        let p = entity.targets.assembled.position;
        let f = (p.y - params.base_y) / params.height;
        assert!((-1e-4..=1.0 + 1e-4).contains(&f), "entity {} height fraction {}", i, f);
        let bound = cone_radius(&params, f) + params.radial_jitter + 1e-3;
        assert!(
            horizontal(p) <= bound,
            "entity {} at r={} exceeds cone bound {} (f={})",
            i,
            horizontal(p),
            bound,
            f
        );
    }
}

#[test]
fn test_cone_targets_spread_over_full_height() {
    let params = FormationParams::default();
    let population = Population::build(
        PopulationConfig::new(1000, EntityClass::Ornament).with_seed(5),
        &[],
    )
    .unwrap();
    let ys: Vec<f32> = population
        .entities()
        .iter()
        .map(|e| e.targets.assembled.position.y)
        .collect();
    let min = ys.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert!(min - params.base_y < 0.1);
    assert!(params.base_y + params.height - max < 0.1);
}

#[test]
fn test_upright_class_rests_on_ground_or_cone() {
    let params = FormationParams::default();
    let population = Population::build(
        PopulationConfig::new(400, EntityClass::ToyCar).with_seed(12),
        &[],
    )
    .unwrap();
    let mut on_ring = 0;
    for entity in population.entities() {
        let pose = entity.targets.assembled;
        let up = pose.orientation * Vec3::Y;
        assert!((up - Vec3::Y).length() < 1e-4, "toy car not level: {:?}", up);
        let lift = pose.position.y - params.base_y;
        let ring_start = params.base_radius + params.ring_offset - 1e-3;
        if lift == 0.0 && horizontal(pose.position) > ring_start {
            on_ring += 1;
        } else {
            assert!(
                lift >= params.upright_ground_threshold - 1e-3,
                "upright entity floating low at {}",
                lift
            );
        }
    }
    assert!(on_ring > 0, "expected some toy cars on the ground ring");
}

#[test]
fn test_pile_points_mostly_inside_envelope() {
    let params = FormationParams::default();
    let population = Population::build(
        PopulationConfig::new(5000, EntityClass::GiftBox).with_seed(99),
        &[],
    )
    .unwrap();
    let inside = population
        .entities()
        .iter()
        .map(|e| e.targets.assembled.position)
        .filter(|p| {
            let r = horizontal(*p);
            let lift = p.y - params.base_y;
            r <= params.pile_max_radius && lift >= -1e-4 && lift <= pile_envelope(&params, r) + 1e-4
        })
        .count();
    let ratio = inside as f32 / 5000.0;
    assert!(ratio >= 0.80, "only {:.3} of pile points inside the envelope", ratio);
}

#[test]
fn test_pile_fallback_stays_in_lower_cone() {
    let params = FormationParams::default();
    let population = Population::build(
        PopulationConfig::new(2000, EntityClass::GiftBox).with_seed(3),
        &[],
    )
    .unwrap();
    let top = params.base_y + params.height * params.pile_cone_fraction + 1e-3;
    for entity in population.entities() {
        assert!(entity.targets.assembled.position.y <= top);
    }
}

#[test]
fn test_glyph_fallback_when_cache_empty() {
    let glyph_box = GlyphBox::default();
    let population = Population::build(
        PopulationConfig::new(64, EntityClass::Particle).with_seed(1),
        &[],
    )
    .unwrap();
    for entity in population.entities() {
        let target = entity.targets.get(Mode::Glyph).expect("particles have glyph targets");
        assert_eq!(target.position, glyph_box.fallback);
    }
}

#[test]
fn test_glyph_targets_clamped_into_box() {
    let glyph_box = GlyphBox::default();
    let points = vec![
        Vec3::new(-100.0, 50.0, 3.0),
        Vec3::new(100.0, -50.0, -3.0),
        Vec3::new(0.5, 6.0, 0.0),
    ];
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..300 {
        let p = glyph_pose(&mut rng, &points, &glyph_box).position;
        assert!(p.x.abs() <= glyph_box.half_width + 1e-5);
        assert!(p.y >= glyph_box.min_y && p.y <= glyph_box.max_y);
        assert!((p.z - glyph_box.depth).abs() <= glyph_box.depth_jitter + 1e-5);
    }
}

#[test]
fn test_glyph_sampling_allows_more_entities_than_points() {
    let points = vec![Vec3::new(1.0, 5.0, 0.0), Vec3::new(-1.0, 7.0, 0.0)];
    let population = Population::build(
        PopulationConfig::new(500, EntityClass::Ornament).with_seed(6),
        &points,
    )
    .unwrap();
    let xs: Vec<f32> = population
        .entities()
        .iter()
        .filter_map(|e| e.targets.glyph.map(|g| g.position.x))
        .collect();
    assert_eq!(xs.len(), 500);
    assert!(xs.iter().all(|&x| x == 1.0 || x == -1.0));
}
