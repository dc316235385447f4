//! CPU reference of the grass vertex program.
//!
//! The GPU evaluates the WGSL twin of these functions per vertex per frame;
//! this copy exists so the model can be exercised and checked on the host.
//! Keep the two in lockstep.

use crate::constants::{
    DISPLACE_EPSILON, GRASS_COLOR_BASE, GRASS_COLOR_TIP, INDENT_MIN_UPLOAD_STRENGTH,
    INDENT_RADIUS, INDENT_SINK_FACTOR, POINTER_RADIUS, POINTER_SINK_FACTOR, PUSH_FACTOR,
    WIND_BEND, WIND_FREQUENCY, WIND_SPEED, rgb,
};
use crate::indent::IndentSlot;
use glam::{Mat4, Vec2, Vec3};

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
pub fn hash(p: Vec2) -> f32 {
    fract((p.dot(Vec2::new(127.1, 311.7))).sin() * 43758.5453)
}

/// Smoothly interpolated lattice noise in 0..1.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let f = f * f * (Vec2::splat(3.0) - 2.0 * f);
    let a = hash(i);
    let b = hash(i + Vec2::new(1.0, 0.0));
    let c = hash(i + Vec2::new(0.0, 1.0));
    let d = hash(i + Vec2::new(1.0, 1.0));
    let ab = a + (b - a) * f.x;
    let cd = c + (d - c) * f.x;
    ab + (cd - ab) * f.y
}

/// `1` at distance zero, smoothly `0` at `radius`.
#[inline]
pub fn falloff(distance: f32, radius: f32) -> f32 {
    1.0 - smoothstep(0.0, radius, distance)
}

/// Everything the vertex program reads besides the vertex itself.
#[derive(Clone, Copy, Debug)]
pub struct DisplacementInputs<'a> {
    pub time: f32,
    pub pointer: Vec2,
    pub indents: &'a [IndentSlot],
}

/// Blade-local wind sway. Roots stay put; tips bend most.
pub fn wind_offset(time: f32, local: Vec3, instance_pos: Vec3) -> Vec3 {
    let h = local.y;
    let ground = Vec2::new(instance_pos.x, instance_pos.z);
    let n = value_noise(ground * WIND_FREQUENCY + time * WIND_SPEED);
    let wind_strength = n * 0.5 + 0.5;
    let bend = h * h * wind_strength * WIND_BEND;
    Vec3::new(
        (time * 2.0 + instance_pos.x * 0.5).sin() * bend,
        0.0,
        (time * 1.5 + instance_pos.z * 0.5).cos() * bend * 0.5,
    )
}

/// World-space push away from `center`, sinking slightly.
pub fn push_offset(
    blade_xz: Vec2,
    center: Vec2,
    radius: f32,
    strength: f32,
    height: f32,
    sink: f32,
) -> Vec3 {
    let d = blade_xz.distance(center);
    let influence = falloff(d, radius) * strength;
    if influence <= 0.0 || d <= DISPLACE_EPSILON {
        return Vec3::ZERO;
    }
    let dir = (blade_xz - center) / d;
    let push = influence * height * PUSH_FACTOR;
    Vec3::new(dir.x * push, -influence * height * sink, dir.y * push)
}

/// Displaced world position of one blade vertex.
pub fn displace(inputs: &DisplacementInputs<'_>, local: Vec3, instance: &Mat4) -> Vec3 {
    let instance_pos = instance.w_axis.truncate();
    let h = local.y;
    let swayed = local + wind_offset(inputs.time, local, instance_pos);
    let mut world = instance.transform_point3(swayed);
    let xz = Vec2::new(world.x, world.z);

    world += push_offset(xz, inputs.pointer, POINTER_RADIUS, 1.0, h, POINTER_SINK_FACTOR);
    for slot in inputs.indents {
        let strength = slot[2];
        if strength > INDENT_MIN_UPLOAD_STRENGTH {
            world += push_offset(
                xz,
                Vec2::new(slot[0], slot[1]),
                INDENT_RADIUS,
                strength,
                h,
                INDENT_SINK_FACTOR,
            );
        }
    }
    world
}

/// Fragment colour: root-to-tip gradient, spatial variation, height light.
pub fn blade_color(height: f32, world: Vec3) -> Vec3 {
    let base = Vec3::from(rgb(GRASS_COLOR_BASE));
    let tip = Vec3::from(rgb(GRASS_COLOR_TIP));
    let mut color = base.lerp(tip, height);
    color += Vec3::splat((world.x * 5.0 + world.z * 5.0).sin() * 0.03);
    color * (0.7 + height * 0.3)
}
