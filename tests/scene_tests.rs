// Host-side tests for scene generation and mesh building.

use glam::{Mat4, Vec3};
use grass_core::constants::*;
use grass_core::mesh::{self, Material, MeshData, Transform};
use grass_core::{
    blade_mesh, build_scene, scatter_blades, Cloud, CloudField, PerformanceProfile, SceneConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::PI;

#[test]
fn profile_detection() {
    assert_eq!(PerformanceProfile::detect(true, 1920.0), PerformanceProfile::Reduced);
    assert_eq!(PerformanceProfile::detect(false, 767.0), PerformanceProfile::Reduced);
    assert_eq!(PerformanceProfile::detect(false, 768.0), PerformanceProfile::Full);
    assert_eq!(PerformanceProfile::detect(false, 1024.0), PerformanceProfile::Full);
    assert_eq!(PerformanceProfile::Full.blade_count(), 25_000);
    assert_eq!(PerformanceProfile::Reduced.blade_count(), 12_000);
}

#[test]
fn blade_is_a_tapered_strip() {
    let blade = blade_mesh();
    assert_eq!(blade.vertices.len(), 10);
    assert_eq!(blade.indices.len(), 24);
    let ys: Vec<f32> = blade.vertices.iter().map(|v| v.position[1]).collect();
    assert_eq!(ys[0], 0.0);
    assert!((ys[9] - BLADE_HEIGHT).abs() < 1e-6);
    let root_w = blade.vertices[1].position[0] - blade.vertices[0].position[0];
    let tip_w = blade.vertices[9].position[0] - blade.vertices[8].position[0];
    assert!(tip_w > 0.0 && tip_w < root_w * 0.2);
    assert!(blade.indices.iter().all(|&i| (i as usize) < blade.vertices.len()));
}

#[test]
fn scattered_blades_stay_on_the_field() {
    let mut rng = StdRng::seed_from_u64(3);
    let blades = scatter_blades(&mut rng, 2_000);
    assert_eq!(blades.len(), 2_000);
    let half = FIELD_SIZE * 0.5;
    for b in &blades {
        let (scale, _, pos) = b.matrix().to_scale_rotation_translation();
        assert!(pos.x.abs() <= half && pos.z.abs() <= half);
        assert_eq!(pos.y, 0.0);
        assert!((0.8 - 1e-4..1.3 + 1e-4).contains(&scale.x));
        assert!((0.6 - 1e-4..1.4 + 1e-4).contains(&scale.y));
    }
}

#[test]
fn clouds_wrap_to_the_left_edge() {
    let mut field = CloudField::from_clouds(
        9,
        vec![Cloud {
            position: Vec3::new(49.99, 15.0, -30.0),
            scale: 2.0,
            speed: 1.0,
        }],
    );
    field.advance();
    let c = field.clouds()[0];
    assert_eq!(c.position.x, -CLOUD_BOUND_X);
    assert!((CLOUD_Y_RANGE.0..CLOUD_Y_RANGE.1).contains(&c.position.y));
    assert!((CLOUD_Z_RANGE.0..CLOUD_Z_RANGE.1).contains(&c.position.z));
    assert_eq!(c.scale, 2.0);
}

#[test]
fn clouds_drift_slowly_before_the_edge() {
    let mut field = CloudField::new(5, CLOUD_COUNT);
    let before: Vec<_> = field.clouds().to_vec();
    field.advance();
    for (a, b) in before.iter().zip(field.clouds()) {
        assert!((b.position.x - a.position.x - a.speed * CLOUD_SPEED_FACTOR).abs() < 1e-4);
        assert_eq!(a.position.y, b.position.y);
    }
    let instances = field.instances();
    assert_eq!(instances.len(), CLOUD_COUNT);
    assert_eq!(instances[0].offset, field.clouds()[0].position.to_array());
}

#[test]
fn scene_is_deterministic_per_seed() {
    let config = SceneConfig {
        profile: PerformanceProfile::Reduced,
        seed: 42,
        ..SceneConfig::default()
    };
    let a = build_scene(&config);
    let b = build_scene(&config);
    assert_eq!(a.blades.len(), BLADE_COUNT_REDUCED);
    assert_eq!(a.blades, b.blades);
    assert_eq!(a.opaque.vertices.len(), b.opaque.vertices.len());
    assert!(!a.opaque.is_empty() && !a.glow.is_empty() && !a.cloud.is_empty());
    assert_eq!(a.clouds.clouds().len(), CLOUD_COUNT);

    let other = build_scene(&SceneConfig {
        seed: 43,
        ..config
    });
    assert_ne!(a.blades, other.blades);
}

#[test]
fn scene_indices_are_in_range() {
    let layout = build_scene(&SceneConfig {
        profile: PerformanceProfile::Reduced,
        ..SceneConfig::default()
    });
    for data in [&layout.opaque, &layout.glow, &layout.cloud] {
        assert_eq!(data.indices.len() % 3, 0);
        let n = data.vertices.len() as u32;
        assert!(data.indices.iter().all(|&i| i < n));
    }
}

#[test]
fn sphere_closes_its_poles() {
    let m = Material::lambert([1.0, 1.0, 1.0]);
    let mut full = MeshData::default();
    mesh::sphere(&mut full, &Transform::new(Mat4::IDENTITY), 1.0, 8, 6, PI, &m);
    assert_eq!(full.vertices.len(), 9 * 7);
    assert_eq!(full.indices.len(), 6 * 8 * 5);

    let mut dome = MeshData::default();
    mesh::sphere(&mut dome, &Transform::new(Mat4::IDENTITY), 1.0, 8, 6, PI * 0.5, &m);
    assert_eq!(dome.indices.len(), 3 * (8 + 2 * 8 * 5));
}

#[test]
fn plane_normals_point_up_after_rotation() {
    let m = Material::lambert([0.5, 0.5, 0.5]);
    let mut out = MeshData::default();
    let xf = Transform::new(Mat4::from_scale(Vec3::new(3.0, 1.0, 2.0)));
    mesh::plane(&mut out, &xf, 1.0, 1.0, &m);
    for v in &out.vertices {
        assert!((Vec3::from(v.normal) - Vec3::Y).length() < 1e-5);
    }
}

#[test]
fn hsl_conversion_matches_known_colours() {
    use grass_core::color::{hsl_to_rgb, rgb_to_hsl};
    let [h, s, l] = rgb_to_hsl([1.0, 0.0, 0.0]);
    assert!(h.abs() < 1e-6 && (s - 1.0).abs() < 1e-6 && (l - 0.5).abs() < 1e-6);
    assert_eq!(rgb_to_hsl([0.4, 0.4, 0.4]), [0.0, 0.0, 0.4]);
    let bush = rgb(0x2d5a27);
    let back = hsl_to_rgb(rgb_to_hsl(bush));
    for (a, b) in bush.iter().zip(back) {
        assert!((a - b).abs() < 1e-4);
    }
    // hue wraps
    let a = hsl_to_rgb([0.25, 0.5, 0.5]);
    let b = hsl_to_rgb([1.25, 0.5, 0.5]);
    assert!((a[1] - b[1]).abs() < 1e-5);
}
