// Shared tuning constants for the grass field, used by both web and native hosts.

// Indents
pub const INDENT_CAPACITY: usize = 20; // fixed-width uniform array on the GPU
pub const INDENT_DECAY_MS: f64 = 3000.0;
pub const INDENT_STRENGTH_PRESS: f32 = 1.0;
pub const INDENT_STRENGTH_DRAG: f32 = 0.8;
pub const INDENT_MIN_UPLOAD_STRENGTH: f32 = 0.01; // shader skips slots at or below this

// Drag gating (world units between consecutive drag indents)
pub const DRAG_MIN_DISTANCE_MOUSE: f32 = 0.3;
pub const DRAG_MIN_DISTANCE_TOUCH: f32 = 0.25;

// Ground projection
pub const FIELD_RADIUS: f32 = 15.0; // half-width of the interactive ground square
pub const SKY_DEPTH_LIMIT: f32 = -20.0; // intersections further back are sky clicks
pub const OFF_FIELD: [f32; 2] = [1000.0, 1000.0]; // pointer sentinel, far outside every falloff

// Displacement model
pub const POINTER_RADIUS: f32 = 2.0;
pub const INDENT_RADIUS: f32 = 1.0;
pub const PUSH_FACTOR: f32 = 1.2;
pub const POINTER_SINK_FACTOR: f32 = 0.2;
pub const INDENT_SINK_FACTOR: f32 = 0.5;
pub const DISPLACE_EPSILON: f32 = 0.01; // skip displacement at (near) zero distance
pub const WIND_FREQUENCY: f32 = 0.3;
pub const WIND_SPEED: f32 = 0.5;
pub const WIND_BEND: f32 = 0.4;
pub const GRASS_COLOR_BASE: u32 = 0x1a5c1a;
pub const GRASS_COLOR_TIP: u32 = 0x7cb342;

// Blade mesh
pub const BLADE_HEIGHT: f32 = 0.6;
pub const BLADE_HALF_WIDTH: f32 = 0.06;
pub const BLADE_SEGMENTS: usize = 4;

// Field population
pub const FIELD_SIZE: f32 = 30.0;
pub const BLADE_COUNT_FULL: usize = 25_000;
pub const BLADE_COUNT_REDUCED: usize = 12_000;
pub const REDUCED_VIEWPORT_WIDTH: f32 = 768.0;
pub const BUSH_COUNT: usize = 40;
pub const FLOWER_COUNT: usize = 80;
pub const SMALL_ROCK_COUNT: usize = 25;
pub const LARGE_ROCK_COUNT: usize = 8;
pub const CLOUD_COUNT: usize = 12;

// Clouds
pub const CLOUD_BOUND_X: f32 = 50.0;
pub const CLOUD_SPEED_FACTOR: f32 = 0.02; // per-frame drift multiplier
pub const CLOUD_Y_RANGE: (f32, f32) = (12.0, 20.0);
pub const CLOUD_Z_RANGE: (f32, f32) = (-50.0, -20.0);

// Audio feedback
pub const RUSTLE_THROTTLE_MS: f64 = 80.0;
pub const RUSTLE_MIN_INTENSITY: f32 = 0.1;
pub const RUSTLE_SPEED_THRESHOLD: f32 = 0.02; // world units per move event
pub const RUSTLE_SPEED_GAIN: f32 = 2.0;
pub const RUSTLE_DRAG_INTENSITY: f32 = 0.5;
pub const RUSTLE_GAIN: f32 = 0.4;
pub const INDENT_GAIN: f32 = 0.6;
pub const RUSTLE_RATE_RANGE: (f32, f32) = (0.9, 1.1);
pub const INDENT_RATE_RANGE: (f32, f32) = (0.95, 1.05);
pub const RUSTLE_URL: &str = "/sounds/grass-rustle.mp3";
pub const INDENT_URL: &str = "/sounds/grass-smash.mp3";

// Camera
pub const CAMERA_FOV_DEG: f32 = 60.0;
pub const CAMERA_EYE: [f32; 3] = [0.0, 3.0, 12.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 200.0;
pub const MAX_PIXEL_RATIO: f64 = 2.0;
pub const CANVAS_ELEMENT_ID: &str = "grass-canvas";

// Atmosphere and lights
pub const SKY_COLOR: u32 = 0x87ceeb;
pub const FOG_NEAR: f32 = 30.0;
pub const FOG_FAR: f32 = 100.0;
pub const AMBIENT_INTENSITY: f32 = 0.7;
pub const SUN_LIGHT_COLOR: u32 = 0xfff5e6;
pub const SUN_LIGHT_INTENSITY: f32 = 1.2;
pub const SUN_LIGHT_POSITION: [f32; 3] = [10.0, 30.0, 10.0];
pub const HEMI_SKY_COLOR: u32 = 0x87ceeb;
pub const HEMI_GROUND_COLOR: u32 = 0x3d7a3d;
pub const HEMI_INTENSITY: f32 = 0.5;

/// Convert a `0xRRGGBB` literal into `[r, g, b]` in 0..1.
#[inline]
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
