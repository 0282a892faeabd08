//! Host-side copies of the per-frame vectors the lit shader consumes.
//!
//! `shaders/lit.frag` rebuilds the same ray from `u_rotation`; keep the
//! two in step.

use glam::{Mat4, Vec2, Vec3};

/// Camera distance from the origin along +Z before rotation.
pub const EYE_DISTANCE: f32 = 5.0;
pub const LIGHT_RADIUS: f32 = 2.0;
pub const LIGHT_HEIGHT: f32 = 2.0;

/// Point light orbiting the Z axis once every 2π seconds.
pub fn light_position(t: f32) -> Vec3 {
    Vec3::new(LIGHT_RADIUS * t.cos(), LIGHT_RADIUS * t.sin(), LIGHT_HEIGHT)
}

/// `I · R_y(ry) · R_x(rx)`: X is applied first, Y outermost.
pub fn rotation_matrix(rotation_x: f32, rotation_y: f32) -> Mat4 {
    Mat4::IDENTITY * Mat4::from_rotation_y(rotation_y) * Mat4::from_rotation_x(rotation_x)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Primary ray for a fragment at normalised coordinate `uv` in `[0, 1]²`.
///
/// Zoom narrows the field of view; the eye orbits with the rotation.
pub fn ray(rotation: Mat4, uv: Vec2, resolution: Vec2, zoom: f32) -> Ray {
    let aspect = if resolution.y > 0.0 {
        resolution.x / resolution.y
    } else {
        1.0
    };
    let screen = (uv - Vec2::splat(0.5)) * Vec2::new(aspect, 1.0) / zoom;
    let origin = rotation.transform_point3(Vec3::new(0.0, 0.0, EYE_DISTANCE));
    let direction = rotation
        .transform_vector3(Vec3::new(screen.x, screen.y, -1.0).normalize())
        .normalize();
    Ray { origin, direction }
}
