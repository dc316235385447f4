//! Small procedural mesh kit for the decorative props. Everything is baked
//! into world space once at scene construction.

use glam::{Mat3, Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PropVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    /// 1.0 skips lighting (sun layers).
    pub emissive: f32,
}

/// Surface look of a primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub alpha: f32,
    pub emissive: bool,
}

impl Material {
    pub fn lambert(color: [f32; 3]) -> Self {
        Self {
            color,
            alpha: 1.0,
            emissive: false,
        }
    }

    pub fn basic(color: [f32; 3], alpha: f32) -> Self {
        Self {
            color,
            alpha,
            emissive: true,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<PropVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn vertex(&mut self, xf: &Transform, p: Vec3, n: Vec3, m: &Material) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(PropVertex {
            position: xf.point(p).to_array(),
            normal: xf.normal(n).to_array(),
            color: [m.color[0], m.color[1], m.color[2], m.alpha],
            emissive: if m.emissive { 1.0 } else { 0.0 },
        });
        idx
    }

    /// Flat-shaded triangle (normal from winding).
    fn flat_triangle(&mut self, xf: &Transform, a: Vec3, b: Vec3, c: Vec3, m: &Material) {
        let n = (b - a).cross(c - a).normalize_or_zero();
        let ia = self.vertex(xf, a, n, m);
        let ib = self.vertex(xf, b, n, m);
        let ic = self.vertex(xf, c, n, m);
        self.indices.extend_from_slice(&[ia, ib, ic]);
    }
}

/// Model matrix plus its normal matrix.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    model: Mat4,
    normal: Mat3,
}

impl Transform {
    pub fn new(model: Mat4) -> Self {
        let normal = Mat3::from_mat4(model).inverse().transpose();
        Self { model, normal }
    }

    #[inline]
    fn point(&self, p: Vec3) -> Vec3 {
        self.model.transform_point3(p)
    }

    #[inline]
    fn normal(&self, n: Vec3) -> Vec3 {
        (self.normal * n).normalize_or_zero()
    }

    pub fn then(&self, child: Mat4) -> Transform {
        Transform::new(self.model * child)
    }
}

/// Axis-aligned plane in XZ, facing +Y, centred on the origin.
pub fn plane(out: &mut MeshData, xf: &Transform, width: f32, depth: f32, m: &Material) {
    let hw = width * 0.5;
    let hd = depth * 0.5;
    let n = Vec3::Y;
    let a = out.vertex(xf, Vec3::new(-hw, 0.0, -hd), n, m);
    let b = out.vertex(xf, Vec3::new(hw, 0.0, -hd), n, m);
    let c = out.vertex(xf, Vec3::new(hw, 0.0, hd), n, m);
    let d = out.vertex(xf, Vec3::new(-hw, 0.0, hd), n, m);
    out.indices.extend_from_slice(&[a, c, b, a, d, c]);
}

/// Smooth unit sphere cut at `theta_len` from the north pole (`PI` for a full
/// sphere, `PI / 2` for a dome). Scale it through `xf` for ellipsoids.
pub fn sphere(
    out: &mut MeshData,
    xf: &Transform,
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    theta_len: f32,
    m: &Material,
) {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut grid = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = v * theta_len;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = u * TAU;
            let n = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            grid.push(out.vertex(xf, n * radius, n, m));
        }
    }
    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = grid[(iy * row + ix + 1) as usize];
            let b = grid[(iy * row + ix) as usize];
            let c = grid[((iy + 1) * row + ix) as usize];
            let d = grid[((iy + 1) * row + ix + 1) as usize];
            if iy != 0 {
                out.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 || theta_len < PI {
                out.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
}

/// Open cylinder centred on the origin along Y.
pub fn cylinder(
    out: &mut MeshData,
    xf: &Transform,
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    m: &Material,
) {
    let seg = radial_segments.max(3);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height.max(1e-6);
    let mut ring = Vec::with_capacity(((seg + 1) * 2) as usize);
    for (y, r) in [(half, radius_top), (-half, radius_bottom)] {
        for i in 0..=seg {
            let a = i as f32 / seg as f32 * TAU;
            let (s, c) = a.sin_cos();
            let n = Vec3::new(s, slope, c).normalize();
            ring.push(out.vertex(xf, Vec3::new(r * s, y, r * c), n, m));
        }
    }
    let row = seg + 1;
    for i in 0..seg {
        let a = ring[i as usize];
        let b = ring[(row + i) as usize];
        let c = ring[(row + i + 1) as usize];
        let d = ring[(i + 1) as usize];
        out.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
}

/// Flat disc in the local XY plane facing +Z.
pub fn disc(out: &mut MeshData, xf: &Transform, radius: f32, segments: u32, m: &Material) {
    let seg = segments.max(3);
    let n = Vec3::Z;
    let center = out.vertex(xf, Vec3::ZERO, n, m);
    let mut rim = Vec::with_capacity(seg as usize + 1);
    for i in 0..=seg {
        let a = i as f32 / seg as f32 * TAU;
        rim.push(out.vertex(xf, Vec3::new(a.cos() * radius, a.sin() * radius, 0.0), n, m));
    }
    for i in 0..seg as usize {
        out.indices.extend_from_slice(&[center, rim[i], rim[i + 1]]);
    }
}

fn quad_bezier(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

/// Oval leaf outline from two quadratic curves, filled as a fan in local XY.
pub fn leaf(out: &mut MeshData, xf: &Transform, m: &Material) {
    const STEPS: usize = 6;
    let base = Vec2::ZERO;
    let tip = Vec2::new(0.0, 0.1);
    let mut outline = Vec::with_capacity(STEPS * 2);
    for i in 0..=STEPS {
        outline.push(quad_bezier(base, Vec2::new(0.025, 0.05), tip, i as f32 / STEPS as f32));
    }
    for i in 1..STEPS {
        outline.push(quad_bezier(tip, Vec2::new(-0.025, 0.05), base, i as f32 / STEPS as f32));
    }
    let n = Vec3::Z;
    let center = out.vertex(xf, Vec3::new(0.0, 0.05, 0.0), n, m);
    let rim: Vec<u32> = outline
        .iter()
        .map(|p| out.vertex(xf, p.extend(0.0), n, m))
        .collect();
    for i in 0..rim.len() {
        out.indices
            .extend_from_slice(&[center, rim[i], rim[(i + 1) % rim.len()]]);
    }
}

#[rustfmt::skip]
const ICO_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// Base vertices of a unit icosahedron.
#[rustfmt::skip]
pub fn icosahedron_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
    [
        Vec3::new(-1.0, t, 0.0), Vec3::new(1.0, t, 0.0), Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0), Vec3::new(0.0, -1.0, t), Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t), Vec3::new(0.0, 1.0, -t), Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0), Vec3::new(-t, 0.0, -1.0), Vec3::new(-t, 0.0, 1.0),
    ]
    .map(|v| v.normalize())
}

/// Flat-shaded low-poly boulder from pre-jittered icosahedron corners.
pub fn polyhedron(out: &mut MeshData, xf: &Transform, corners: &[Vec3; 12], m: &Material) {
    for [a, b, c] in ICO_FACES {
        out.flat_triangle(xf, corners[a], corners[b], corners[c], m);
    }
}
