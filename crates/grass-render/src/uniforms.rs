use grass_core::constants::{
    rgb, AMBIENT_INTENSITY, FOG_FAR, FOG_NEAR, GRASS_COLOR_BASE, GRASS_COLOR_TIP,
    HEMI_GROUND_COLOR, HEMI_INTENSITY, HEMI_SKY_COLOR, INDENT_CAPACITY, SKY_COLOR,
    SUN_LIGHT_COLOR, SUN_LIGHT_INTENSITY, SUN_LIGHT_POSITION,
};
use grass_core::{Camera, FrameInputs, IndentSlot, Viewport};
use glam::Vec3;

#[inline]
fn rgba(hex: u32, w: f32) -> [f32; 4] {
    let [r, g, b] = rgb(hex);
    [r, g, b, w]
}

/// Group 0 binding 0, read by every pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_time: [f32; 4],
    pub sun_dir: [f32; 4],
    pub sun_color: [f32; 4],
    pub hemi_sky: [f32; 4],
    pub hemi_ground: [f32; 4],
    pub fog_color: [f32; 4],
    pub fog_range: [f32; 4],
}

impl SceneUniforms {
    pub fn new(camera: &Camera, viewport: &Viewport, time_secs: f32) -> Self {
        let sun = Vec3::from(SUN_LIGHT_POSITION).normalize();
        Self {
            view_proj: camera.view_proj(viewport).to_cols_array_2d(),
            camera_time: camera.eye.extend(time_secs).to_array(),
            sun_dir: sun.extend(SUN_LIGHT_INTENSITY).to_array(),
            sun_color: rgba(SUN_LIGHT_COLOR, AMBIENT_INTENSITY),
            hemi_sky: rgba(HEMI_SKY_COLOR, HEMI_INTENSITY),
            hemi_ground: rgba(HEMI_GROUND_COLOR, 0.0),
            fog_color: rgba(SKY_COLOR, 1.0),
            fog_range: [FOG_NEAR, FOG_FAR, 0.0, 0.0],
        }
    }
}

/// Group 0 binding 1, read by the grass pipeline only.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GrassUniforms {
    pub pointer: [f32; 4],
    pub color_base: [f32; 4],
    pub color_tip: [f32; 4],
    pub indents: [IndentSlot; INDENT_CAPACITY],
}

impl GrassUniforms {
    pub fn new(inputs: &FrameInputs) -> Self {
        Self {
            pointer: [inputs.pointer.x, inputs.pointer.y, 0.0, 0.0],
            color_base: rgba(GRASS_COLOR_BASE, 1.0),
            color_tip: rgba(GRASS_COLOR_TIP, 1.0),
            indents: inputs.indents,
        }
    }
}

/// Sky colour as the pass clear value.
pub fn clear_color() -> wgpu::Color {
    let [r, g, b] = rgb(SKY_COLOR);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}
