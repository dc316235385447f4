//! Static scene generation: the grass blade, its instances, the decorative
//! props and the drifting cloud layer.

use crate::color::{hsl_to_rgb, rgb_to_hsl};
use crate::constants::*;
use crate::mesh::{self, icosahedron_vertices, Material, MeshData, Transform};
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// Scene density tier, decided once per mount.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PerformanceProfile {
    Full,
    Reduced,
}

impl PerformanceProfile {
    pub fn detect(touch_capable: bool, viewport_width: f32) -> Self {
        if touch_capable || viewport_width < REDUCED_VIEWPORT_WIDTH {
            PerformanceProfile::Reduced
        } else {
            PerformanceProfile::Full
        }
    }

    #[inline]
    pub fn blade_count(self) -> usize {
        match self {
            PerformanceProfile::Full => BLADE_COUNT_FULL,
            PerformanceProfile::Reduced => BLADE_COUNT_REDUCED,
        }
    }
}

/// Per-mount knobs.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub profile: PerformanceProfile,
    pub seed: u64,
    pub rustle_url: String,
    pub indent_url: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            profile: PerformanceProfile::Full,
            seed: 0x6772_6173_73,
            rustle_url: RUSTLE_URL.to_string(),
            indent_url: INDENT_URL.to_string(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BladeVertex {
    pub position: [f32; 3],
}

/// The single tapered blade every instance shares.
#[derive(Clone, Debug)]
pub struct BladeMesh {
    pub vertices: Vec<BladeVertex>,
    pub indices: Vec<u16>,
}

pub fn blade_mesh() -> BladeMesh {
    let mut vertices = Vec::with_capacity((BLADE_SEGMENTS + 1) * 2);
    for i in 0..=BLADE_SEGMENTS {
        let t = i as f32 / BLADE_SEGMENTS as f32;
        let y = t * BLADE_HEIGHT;
        let w = BLADE_HALF_WIDTH * (1.0 - t * 0.9);
        vertices.push(BladeVertex { position: [-w, y, 0.0] });
        vertices.push(BladeVertex { position: [w, y, 0.0] });
    }
    let mut indices = Vec::with_capacity(BLADE_SEGMENTS * 6);
    for i in 0..BLADE_SEGMENTS as u16 {
        let b = i * 2;
        indices.extend_from_slice(&[b, b + 1, b + 2, b + 1, b + 3, b + 2]);
    }
    BladeMesh { vertices, indices }
}

/// Column-major model matrix of one grass blade.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BladeInstance {
    pub model: [[f32; 4]; 4],
}

impl BladeInstance {
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

pub fn scatter_blades(rng: &mut impl Rng, count: usize) -> Vec<BladeInstance> {
    let half = FIELD_SIZE * 0.5;
    (0..count)
        .map(|_| {
            let x = rng.gen_range(-half..half);
            let z = rng.gen_range(-half..half);
            let yaw = rng.gen_range(0.0..TAU);
            let sxz = rng.gen_range(0.8..1.3);
            let sy = rng.gen_range(0.6..1.4);
            let m = Mat4::from_scale_rotation_translation(
                Vec3::new(sxz, sy, sxz),
                Quat::from_rotation_y(yaw),
                Vec3::new(x, 0.0, z),
            );
            BladeInstance {
                model: m.to_cols_array_2d(),
            }
        })
        .collect()
}

/// Offset + uniform scale applied to a shared prop mesh.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PropInstance {
    pub offset: [f32; 3],
    pub scale: f32,
}

impl PropInstance {
    pub const IDENTITY: PropInstance = PropInstance {
        offset: [0.0; 3],
        scale: 1.0,
    };
}

pub fn ground(out: &mut MeshData) {
    let xf = Transform::new(Mat4::from_translation(Vec3::new(0.0, -0.05, 0.0)));
    mesh::plane(out, &xf, 100.0, 100.0, &Material::lambert(rgb(HEMI_GROUND_COLOR)));
}

// (x, z, width, height, depth); back row then mid row.
const HILLS: [(f32, f32, f32, f32, f32); 9] = [
    (-35.0, -50.0, 25.0, 8.0, 15.0),
    (0.0, -55.0, 30.0, 10.0, 18.0),
    (40.0, -48.0, 22.0, 7.0, 14.0),
    (-60.0, -45.0, 20.0, 6.0, 12.0),
    (65.0, -52.0, 25.0, 9.0, 16.0),
    (-20.0, -35.0, 18.0, 5.0, 10.0),
    (25.0, -38.0, 20.0, 6.0, 12.0),
    (-50.0, -32.0, 15.0, 4.0, 8.0),
    (55.0, -35.0, 18.0, 5.0, 10.0),
];

pub fn hills(out: &mut MeshData) {
    let m = Material::lambert(rgb(0x2d6a2d));
    for (x, z, w, h, d) in HILLS {
        let xf = Transform::new(
            Mat4::from_translation(Vec3::new(x, -0.5, z)) * Mat4::from_scale(Vec3::new(w, h, d)),
        );
        mesh::sphere(out, &xf, 1.0, 32, 16, PI * 0.5, &m);
    }
}

const BUSH_COLORS: [u32; 4] = [0x2d5a27, 0x3d6b37, 0x4a7c4a, 0x1e4d1e];
const BRANCH_COLOR: u32 = 0x4a3728;

fn branch(
    out: &mut MeshData,
    rng: &mut impl Rng,
    parent: &Transform,
    length: f32,
    thickness: f32,
    leaves: usize,
    leaf_hsl: [f32; 3],
) {
    let stem = parent.then(Mat4::from_translation(Vec3::Y * (length * 0.5)));
    mesh::cylinder(
        out,
        &stem,
        thickness * 0.5,
        thickness,
        length,
        4,
        &Material::lambert(rgb(BRANCH_COLOR)),
    );
    for i in 0..leaves {
        let [h, s, l] = leaf_hsl;
        let color = hsl_to_rgb([
            h,
            s + rng.gen_range(-0.05..0.05),
            l + rng.gen_range(-0.05..0.05),
        ]);
        let t = 0.5 + (i as f32 / leaves as f32) * 0.5;
        let ang = (i as f32 / leaves as f32) * PI * 3.0 + rng.gen::<f32>();
        let spread = rng.gen_range(0.015..0.035);
        let rot = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen_range(-0.2..0.2),
            ang,
            rng.gen_range(0.0..0.3),
        );
        let local = Mat4::from_scale_rotation_translation(
            Vec3::splat(rng.gen_range(0.7..1.2)),
            rot,
            Vec3::new(ang.cos() * spread, length * t, ang.sin() * spread),
        );
        mesh::leaf(out, &parent.then(local), &Material::lambert(color));
    }
}

/// Branches fanning out of a common root, leaf clusters along their tips.
pub fn bush(out: &mut MeshData, rng: &mut impl Rng, root: Mat4, base: u32) {
    let root = Transform::new(root);
    let hsl = rgb_to_hsl(rgb(base));

    for i in 0..18 {
        let angle = (i as f32 / 18.0) * TAU + rng.gen_range(0.0..0.2);
        let tilt = rng.gen_range(0.4..0.8);
        let len = rng.gen_range(0.2..0.35);
        let thick = rng.gen_range(0.006..0.01);
        let leaves = rng.gen_range(5..8);
        let xf = root.then(Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, tilt, angle, 0.0)));
        branch(out, rng, &xf, len, thick, leaves, hsl);
    }
    for _ in 0..10 {
        let angle = rng.gen_range(0.0..TAU);
        let tilt = rng.gen_range(0.0..0.25);
        let len = rng.gen_range(0.25..0.35);
        let thick = rng.gen_range(0.005..0.008);
        let leaves = rng.gen_range(4..7);
        let xf = root.then(Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, tilt, angle, 0.0)));
        branch(out, rng, &xf, len, thick, leaves, [hsl[0], hsl[1], hsl[2] - 0.05]);
    }
}

const FLOWER_COLORS: [u32; 5] = [0xff4444, 0xffffff, 0xffdd44, 0xff88aa, 0xaaddff];

pub fn flower(out: &mut MeshData, root: Mat4, petal: u32) {
    let root = Transform::new(root);
    let stem = root.then(Mat4::from_translation(Vec3::Y * 0.35));
    mesh::cylinder(out, &stem, 0.02, 0.025, 0.7, 4, &Material::lambert(rgb(0x2d5a27)));

    let petal_mat = Material::lambert(rgb(petal));
    for i in 0..5 {
        let angle = i as f32 / 5.0 * TAU;
        let local = Mat4::from_rotation_translation(
            Quat::from_euler(EulerRot::XYZ, PI * 0.5 - 0.3, 0.0, angle),
            Vec3::new(angle.cos() * 0.07, 0.72, angle.sin() * 0.07),
        );
        mesh::disc(out, &root.then(local), 0.1, 5, &petal_mat);
    }
    let center = root.then(Mat4::from_translation(Vec3::Y * 0.72));
    mesh::sphere(out, &center, 0.05, 6, 6, PI, &Material::lambert(rgb(0xffeb3b)));
}

pub fn rock(out: &mut MeshData, rng: &mut impl Rng, size: f32, position: Vec3) {
    let corners = icosahedron_vertices().map(|v| {
        let noise = rng.gen_range(0.8..1.2);
        Vec3::new(v.x * noise, v.y * noise * 0.7, v.z * noise) * size
    });
    let rot = Quat::from_euler(
        EulerRot::XYZ,
        rng.gen_range(0.0..PI),
        rng.gen_range(0.0..PI),
        rng.gen_range(0.0..PI),
    );
    let grey = rng.gen_range(0.3..0.6);
    let xf = Transform::new(Mat4::from_rotation_translation(rot, position));
    mesh::polyhedron(out, &xf, &corners, &Material::lambert([grey, grey * 0.95, grey * 0.9]));
}

pub const SUN_POSITION: [f32; 3] = [15.0, 18.0, -25.0];

/// Opaque sun core.
pub fn sun_core(out: &mut MeshData) {
    let xf = Transform::new(Mat4::from_translation(Vec3::from(SUN_POSITION)));
    mesh::sphere(out, &xf, 3.0, 32, 32, PI, &Material::basic(rgb(0xffdd44), 1.0));
}

/// Translucent halo layers, outermost first so they blend back to front.
pub fn sun_glow(out: &mut MeshData) {
    let xf = Transform::new(Mat4::from_translation(Vec3::from(SUN_POSITION)));
    mesh::sphere(out, &xf, 6.0, 32, 32, PI, &Material::basic(rgb(0xffffcc), 0.15));
    mesh::sphere(out, &xf, 4.5, 32, 32, PI, &Material::basic(rgb(0xffeeaa), 0.3));
}

// (x, y, z, radius) of the puffs in a unit cloud.
const CLOUD_PUFFS: [(f32, f32, f32, f32); 7] = [
    (0.0, 0.0, 0.0, 1.0),
    (1.2, 0.2, 0.0, 0.8),
    (-1.0, 0.1, 0.2, 0.9),
    (0.5, 0.5, 0.0, 0.7),
    (-0.5, 0.4, -0.1, 0.75),
    (1.8, 0.0, 0.1, 0.6),
    (-1.6, -0.1, 0.0, 0.65),
];

/// Unit-scale cloud; instances scale and place it.
pub fn cloud_mesh() -> MeshData {
    let mut out = MeshData::default();
    let m = Material::lambert([1.0, 1.0, 1.0]).with_alpha(0.95);
    for (x, y, z, r) in CLOUD_PUFFS {
        let xf = Transform::new(Mat4::from_translation(Vec3::new(x, y, z)));
        mesh::sphere(&mut out, &xf, r, 8, 6, PI, &m);
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cloud {
    pub position: Vec3,
    pub scale: f32,
    pub speed: f32,
}

/// Clouds drifting along +x, wrapping back behind the left edge.
pub struct CloudField {
    clouds: Vec<Cloud>,
    rng: StdRng,
}

impl CloudField {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let clouds = (0..count)
            .map(|_| Cloud {
                position: Vec3::new(
                    rng.gen_range(-40.0..40.0),
                    rng.gen_range(CLOUD_Y_RANGE.0..CLOUD_Y_RANGE.1),
                    rng.gen_range(CLOUD_Z_RANGE.0..CLOUD_Z_RANGE.1),
                ),
                scale: rng.gen_range(1.5..3.5),
                speed: rng.gen_range(0.3..0.7),
            })
            .collect();
        Self { clouds, rng }
    }

    pub fn from_clouds(seed: u64, clouds: Vec<Cloud>) -> Self {
        Self {
            clouds,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// One frame of drift.
    pub fn advance(&mut self) {
        for c in &mut self.clouds {
            c.position.x += c.speed * CLOUD_SPEED_FACTOR;
            if c.position.x > CLOUD_BOUND_X {
                c.position.x = -CLOUD_BOUND_X;
                c.position.z = self.rng.gen_range(CLOUD_Z_RANGE.0..CLOUD_Z_RANGE.1);
                c.position.y = self.rng.gen_range(CLOUD_Y_RANGE.0..CLOUD_Y_RANGE.1);
            }
        }
    }

    pub fn instances(&self) -> Vec<PropInstance> {
        self.clouds
            .iter()
            .map(|c| PropInstance {
                offset: c.position.to_array(),
                scale: c.scale,
            })
            .collect()
    }
}

/// Everything the renderer uploads once.
pub struct SceneLayout {
    pub blade: BladeMesh,
    pub blades: Vec<BladeInstance>,
    /// Lit and emissive opaque geometry in world space.
    pub opaque: MeshData,
    /// Sun halo, drawn blended after the opaque pass.
    pub glow: MeshData,
    pub cloud: MeshData,
    pub clouds: CloudField,
}

pub fn build_scene(config: &SceneConfig) -> SceneLayout {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let count = config.profile.blade_count();
    log::info!("building scene: {:?} profile, {} blades", config.profile, count);

    let blades = scatter_blades(&mut rng, count);

    let mut opaque = MeshData::default();
    ground(&mut opaque);
    hills(&mut opaque);

    for _ in 0..BUSH_COUNT {
        let color = BUSH_COLORS[rng.gen_range(0..BUSH_COLORS.len())];
        let root = Mat4::from_scale_rotation_translation(
            Vec3::splat(rng.gen_range(1.5..4.0)),
            Quat::from_rotation_y(rng.gen_range(0.0..TAU)),
            Vec3::new(rng.gen_range(-14.0..14.0), 0.0, rng.gen_range(-14.0..14.0)),
        );
        bush(&mut opaque, &mut rng, root, color);
    }

    for _ in 0..FLOWER_COUNT {
        let color = FLOWER_COLORS[rng.gen_range(0..FLOWER_COLORS.len())];
        let root = Mat4::from_scale_rotation_translation(
            Vec3::splat(rng.gen_range(0.5..1.0)),
            Quat::from_rotation_y(rng.gen_range(0.0..TAU)),
            Vec3::new(rng.gen_range(-13.0..13.0), 0.0, rng.gen_range(-13.0..13.0)),
        );
        flower(&mut opaque, root, color);
    }

    for _ in 0..SMALL_ROCK_COUNT {
        let size = rng.gen_range(0.1..0.4);
        let pos = Vec3::new(rng.gen_range(-14.0..14.0), size * 0.3, rng.gen_range(-14.0..14.0));
        rock(&mut opaque, &mut rng, size, pos);
    }
    for _ in 0..LARGE_ROCK_COUNT {
        let size = rng.gen_range(0.3..0.8);
        let pos = Vec3::new(rng.gen_range(-12.5..12.5), size * 0.4, rng.gen_range(-12.5..12.5));
        rock(&mut opaque, &mut rng, size, pos);
    }

    sun_core(&mut opaque);
    let mut glow = MeshData::default();
    sun_glow(&mut glow);

    let clouds = CloudField::new(rng.gen(), CLOUD_COUNT);

    SceneLayout {
        blade: blade_mesh(),
        blades,
        opaque,
        glow,
        cloud: cloud_mesh(),
        clouds,
    }
}
