//! Surface hit records.

use glint_math::{Frame, Vec2, Vec3};

/// Record of a ray-surface intersection, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Point of intersection
    pub p: Vec3,
    /// Geometric normal, facing the side the ray arrived from
    pub geo_n: Vec3,
    /// Shading normal (outward, no normal mapping)
    pub sh_n: Vec3,
    /// Texture coordinates
    pub uv: Vec2,
    /// Ray parameter of the hit
    pub t: f32,
    pub geo_frame: Frame,
    pub sh_frame: Frame,
}

impl Intersection {
    /// Create a record and build both frames from the (unit) normals.
    pub fn new(p: Vec3, geo_n: Vec3, sh_n: Vec3, uv: Vec2, t: f32) -> Self {
        Self {
            p,
            geo_n,
            sh_n,
            uv,
            t,
            geo_frame: Frame::from_normal(geo_n),
            sh_frame: Frame::from_normal(sh_n),
        }
    }
}
