use crate::constants::{
    CAMERA_EYE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_TARGET, FIELD_RADIUS,
    SKY_DEPTH_LIMIT,
};
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Drawable area in CSS pixels (the space pointer events are reported in).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Map a point in viewport pixels to normalized device coordinates
    /// (x right, y up, both in -1..1).
    #[inline]
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x / self.width) * 2.0 - 1.0,
            1.0 - (screen.y / self.height) * 2.0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Intersection with the ground plane `y = 0`; `None` when parallel or
    /// when the plane lies behind the origin.
    pub fn intersect_ground(&self) -> Option<Vec3> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = -self.origin.y / self.direction.y;
        (t >= 0.0).then(|| self.origin + self.direction * t)
    }
}

/// Fixed perspective camera looking at the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::from(CAMERA_EYE),
            target: Vec3::from(CAMERA_TARGET),
            fov_y: CAMERA_FOV_DEG.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, viewport: &Viewport) -> Mat4 {
        self.projection(viewport.aspect()) * self.view()
    }

    /// World-space ray from the eye through a point in NDC.
    pub fn ray_through_ndc(&self, ndc: Vec2, viewport: &Viewport) -> Ray {
        let inv = self.view_proj(viewport).inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p_far: Vec3 = p_far.truncate() / p_far.w;
        Ray {
            origin: self.eye,
            direction: (p_far - self.eye).normalize(),
        }
    }

    /// Project a world point back to viewport pixels; `None` when behind the eye.
    pub fn world_to_screen(&self, world: Vec3, viewport: &Viewport) -> Option<Vec2> {
        let clip = self.view_proj(viewport) * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc.y) * 0.5 * viewport.height,
        ))
    }
}

/// Cast a ray through `screen` and return the ground hit as `(x, z)`.
///
/// Hits outside the playable square or further back than the sky threshold
/// count as "no interaction", never as clamped coordinates.
pub fn project_to_ground(screen: Vec2, camera: &Camera, viewport: &Viewport) -> Option<Vec2> {
    if !screen.is_finite() {
        return None;
    }
    let ray = camera.ray_through_ndc(viewport.to_ndc(screen), viewport);
    let hit = ray.intersect_ground()?;
    if hit.x.abs() > FIELD_RADIUS || hit.z.abs() > FIELD_RADIUS {
        return None;
    }
    if hit.z < SKY_DEPTH_LIMIT {
        return None;
    }
    Some(Vec2::new(hit.x, hit.z))
}
