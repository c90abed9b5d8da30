//! Integration tests for the grow, simulate, paint pipeline.
//!
//! These exercise the public API end to end: sampling roots on surfaces,
//! running the solver through hair objects, and checking what reaches a
//! render sink.

use std::sync::Arc;

use hairsim::prelude::*;
use hairsim::render::RenderCommand;
use hairsim::{HairStats, SceneConfig, Triangle};

fn white() -> GrowthMap {
    GrowthMap::solid(8, 8, 1.0)
}

fn one_triangle(area_scale: f32) -> Surface {
    // Right triangle facing +Y with legs `area_scale`, UVs well inside the map
    Surface::new(vec![Triangle::flat(
        [Vec3::ZERO, Vec3::Z * area_scale, Vec3::X * area_scale],
        [Vec2::new(0.1, 0.1), Vec2::new(0.1, 0.9), Vec2::new(0.9, 0.1)],
    )])
}

fn grow(surface: &Surface, map: &GrowthMap, density: f32, seed: u64) -> HairObject {
    let mut rng = seeded_rng(Some(seed));
    HairObject::builder(Placement::GrowthMap {
        surface,
        growth_map: map,
        density,
    })
    .build(&mut rng)
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn test_black_map_grows_nothing() {
    let black = GrowthMap::solid(16, 16, 0.0);
    for surface in [Surface::quad(3.0), Surface::uv_sphere(1.0, 8, 16)] {
        let hair = grow(&surface, &black, 500.0, 1);
        assert!(hair.guide_hairs().is_empty());
        assert_eq!(hair.stats(), HairStats::default());
    }
}

#[test]
fn test_single_triangle_count_is_near_expected() {
    let surface = one_triangle(1.0);
    let expected = surface.total_area() * 1000.0;
    assert!((expected - 500.0).abs() < 1e-3);

    for seed in 0..10 {
        let count = grow(&surface, &white(), 1000.0, seed).guide_hairs().len() as f32;
        // Stochastic rounding on one triangle can only be off by one
        assert!((count - expected).abs() <= 1.0, "seed {seed}: {count}");
    }
}

#[test]
fn test_roots_lie_on_their_triangle() {
    let surface = one_triangle(2.0);
    let hair = grow(&surface, &white(), 50.0, 3);
    assert!(!hair.guide_hairs().is_empty());
    for strand in hair.guide_hairs() {
        let root = strand.root_position();
        assert!(root.y.abs() < 1e-5);
        assert!(root.x >= -1e-5 && root.z >= -1e-5);
        assert!(root.x + root.z <= 2.0 + 1e-4);
        assert!((strand.root_direction() - Vec3::Y).length() < 1e-5);
    }
}

#[test]
fn test_sphere_roots_grow_outward() {
    let surface = Surface::uv_sphere(2.0, 12, 24);
    let hair = grow(&surface, &white(), 20.0, 4);
    assert!(hair.guide_hairs().len() > 100);
    for strand in hair.guide_hairs() {
        let root = strand.root_position();
        // Flat facets sit slightly inside the true sphere
        assert!(root.length() <= 2.0 + 1e-4 && root.length() > 1.9);
        assert!(strand.root_direction().dot(root.normalize()) > 0.9);
    }
}

// ============================================================================
// Simulation through hair objects
// ============================================================================

#[test]
fn test_vertex_count_and_roots_survive_updates() {
    let surface = Surface::uv_sphere(1.0, 8, 16);
    let simulation = Arc::new(
        Simulation::new(SimulationConfig::default()).with_collider(Collider::sphere(Vec3::ZERO, 1.0)),
    );
    let mut rng = seeded_rng(Some(5));
    let mut hair = HairObject::builder(Placement::GrowthMap {
        surface: &surface,
        growth_map: &white(),
        density: 10.0,
    })
    .with_strand(StrandConfig {
        vertices: 12,
        spacing: 0.1,
    })
    .with_simulation(simulation)
    .build(&mut rng);

    let roots: Vec<Vec3> = hair.guide_hairs().iter().map(|h| h.vertices()[0].position).collect();
    let mut clock = FrameClock::new(60.0);
    for _ in 0..120 {
        hair.update(clock.tick());
    }

    for (strand, root) in hair.guide_hairs().iter().zip(roots) {
        assert_eq!(strand.len(), 12);
        assert_eq!(strand.vertices()[0].position, root);
        for v in &strand.vertices()[1..] {
            assert!(v.position.is_finite());
            assert!(v.position.length() >= 1.0);
        }
    }
}

#[test]
fn test_grown_sphere_hair_holds_length_and_stays_outside() {
    let radius = 1.0;
    let surface = Surface::uv_sphere(radius, 24, 48);
    let simulation = Arc::new(
        Simulation::new(SimulationConfig::default()).with_collider(Collider::sphere(Vec3::ZERO, radius)),
    );
    let mut rng = seeded_rng(Some(13));
    let mut hair = HairObject::builder(Placement::GrowthMap {
        surface: &surface,
        growth_map: &white(),
        density: 40.0,
    })
    .with_simulation(simulation)
    .build(&mut rng);
    assert!(hair.guide_hairs().len() > 300);

    let mut clock = FrameClock::new(60.0);
    for _ in 0..600 {
        hair.update(clock.tick());
    }

    let spacing = StrandConfig::default().spacing;
    for strand in hair.guide_hairs() {
        let vertices = strand.vertices();
        for w in vertices.windows(2) {
            let ratio = w[1].position.distance(w[0].position) / w[1].rest_length;
            assert!((ratio - 1.0).abs() < 1e-3, "segment ratio {ratio}");
        }
        // Segments between free vertices never cut through the sphere
        for w in vertices[1..].windows(2) {
            let (a, b) = (w[0].position, w[1].position);
            let ab = b - a;
            let t = (-a.dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
            let closest = (a + ab * t).length();
            assert!(closest >= radius - 1e-4, "segment dips to {closest}");
        }
        assert!((strand.rest_length() - spacing * (vertices.len() - 1) as f32).abs() < 1e-3);
    }
}

#[test]
fn test_paused_clock_freezes_hair() {
    let simulation = Arc::new(Simulation::default());
    let mut rng = seeded_rng(Some(6));
    let mut hair = HairObject::builder(Placement::UniformCount(4))
        .with_simulation(simulation)
        .build(&mut rng);

    let mut clock = FrameClock::new(60.0);
    hair.update(clock.tick());
    let before: Vec<GuideHair> = hair.guide_hairs().to_vec();

    clock.pause();
    for _ in 0..30 {
        hair.update(clock.tick());
    }
    for (a, b) in hair.guide_hairs().iter().zip(&before) {
        let pa: Vec<Vec3> = a.vertices().iter().map(|v| v.position).collect();
        let pb: Vec<Vec3> = b.vertices().iter().map(|v| v.position).collect();
        assert_eq!(pa, pb);
    }
}

#[test]
fn test_shared_simulation_drives_two_objects() {
    let simulation = Arc::new(Simulation::default());
    let mut rng = seeded_rng(Some(7));
    let mut a = HairObject::builder(Placement::UniformCount(2))
        .with_simulation(simulation.clone())
        .build(&mut rng);
    let mut b = HairObject::builder(Placement::CopyOf(&a)).build(&mut rng);
    b.set_simulation(Some(simulation));

    let time = FrameTime::new(1.0 / 60.0, 1.0 / 60.0, 1);
    a.update(time);
    b.update(time);
    assert_eq!(a.guide_hairs(), b.guide_hairs());
}

// ============================================================================
// Attribute copy and reset
// ============================================================================

#[test]
fn test_attribute_copy_round_trip() {
    let tuned = HairAttributes {
        color: Vec3::new(0.2, 0.7, 0.9),
        group_hairs: 17,
        group_spread: 0.33,
        hair_radius: 0.02,
        noise_amplitude: 0.4,
        spline_vertices: 6,
    };
    let mut rng = seeded_rng(Some(8));
    let prior = HairObject::builder(Placement::UniformCount(3))
        .with_attributes(tuned)
        .build(&mut rng);

    let copied = HairObject::builder(Placement::CopyOf(&prior)).build(&mut rng);
    assert_eq!(*copied.attributes(), tuned);

    // Different geometry, same tunables
    let surface = Surface::quad(1.0);
    let regrown = HairObject::builder(Placement::GrowthMap {
        surface: &surface,
        growth_map: &white(),
        density: 30.0,
    })
    .with_attributes_from(&prior)
    .build(&mut rng);
    assert_eq!(*regrown.attributes(), tuned);
    assert_ne!(regrown.guide_hairs().len(), prior.guide_hairs().len());
}

#[test]
fn test_scene_reset_between_frames() {
    let config = SceneConfig {
        density: 15.0,
        ..SceneConfig::default()
    };
    let mut rng = seeded_rng(Some(9));
    let mut scene = HairScene::new(config, Surface::quad(2.0), white(), &mut rng);
    scene.set_color_channel(ColorChannel::Blue, 0.75);

    let mut clock = FrameClock::default();
    for _ in 0..5 {
        scene.tick(clock.tick());
    }
    scene.reset(&mut rng);
    scene.tick(clock.tick());

    assert_eq!(scene.attributes().color.z, 0.75);
    assert_eq!(scene.generation(), 2);
}

// ============================================================================
// Render contract
// ============================================================================

#[test]
fn test_paint_submits_every_guide_vertex() {
    let mut rng = seeded_rng(Some(10));
    let mut hair = HairObject::builder(Placement::UniformCount(5))
        .with_strand(StrandConfig {
            vertices: 7,
            spacing: 0.2,
        })
        .build(&mut rng);
    hair.update(FrameTime::new(0.5, 1.0 / 60.0, 30));

    let mut sink = RecordingSink::new();
    sink.begin_frame();
    hair.paint(&mut sink);

    let objects = sink
        .commands()
        .iter()
        .filter(|c| matches!(c, RenderCommand::Object(_)))
        .count();
    assert_eq!(objects, 1);
    assert_eq!(sink.strands().len(), 5);
    assert!(sink.strands().iter().all(|s| s.len() == 7));
    assert_eq!(sink.batch().vertices().len(), 35);
    assert_eq!(sink.object_uniforms().map(|u| u.time), Some(0.5));
}

#[test]
fn test_collapsed_strand_paints_finite_tangents() {
    let mut rng = seeded_rng(Some(11));
    let mut hair = HairObject::builder(Placement::UniformCount(1)).build(&mut rng);
    for v in hair.guide_hairs_mut()[0].vertices_mut() {
        v.position = Vec3::new(0.25, 1.0, 0.0);
    }
    hair.update(FrameTime::default());

    let mut sink = RecordingSink::new();
    hair.paint(&mut sink);
    for v in sink.strands()[0] {
        assert!(v.tangent().is_finite());
        assert!((v.tangent().length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_stats_follow_tunables() {
    let mut rng = seeded_rng(Some(12));
    let mut hair = HairObject::builder(Placement::UniformCount(10)).build(&mut rng);
    hair.set_group_hairs(3);
    hair.set_spline_vertices(5);
    let stats = hair.stats();
    assert_eq!(stats.rendered_hairs, 30);
    assert_eq!(stats.simulated_vertices, 10 * StrandConfig::default().vertices);
    assert_eq!(stats.rendered_vertices, 30 * 5 * 4);
}
