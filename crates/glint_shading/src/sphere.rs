//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{Intersection, Shape};
use glint_math::{Aabb, Ray, Transform, Vec2, Vec3};

/// A sphere centered at the object-space origin.
///
/// Placement comes from a shared, immutable [`Transform`]. Rays are solved in
/// object space, so any invertible affine transform (including non-uniform
/// scale) is supported.
#[derive(Debug, Clone)]
pub struct Sphere {
    radius: f32,
    transform: Arc<Transform>,
}

impl Sphere {
    /// Create a new sphere. `radius` must be positive.
    pub fn new(radius: f32, transform: Arc<Transform>) -> Self {
        log::debug!(
            "Sphere r={} at {:?}",
            radius,
            transform.apply_point(Vec3::ZERO)
        );
        Self { radius, transform }
    }

    /// A sphere with an identity transform.
    pub fn at_origin(radius: f32) -> Self {
        Self::new(radius, Arc::new(Transform::IDENTITY))
    }

    /// Smallest root of the ray/sphere quadratic inside the ray's range.
    ///
    /// `ray` must already be in object space.
    fn nearest_root(&self, ray: &Ray) -> Option<f32> {
        let o = ray.origin;
        let d = ray.direction;
        let a = d.dot(d);
        let b = 2.0 * o.dot(d);
        let c = o.dot(o) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-b - sqrtd) / (2.0 * a);
        if ray.accepts(near) {
            return Some(near);
        }
        let far = (-b + sqrtd) / (2.0 * a);
        ray.accepts(far).then_some(far)
    }

    /// Equirectangular UV from an object-space hit point.
    ///
    /// u wraps around Y starting from -X. v is `asin(y) / pi` on the raw hit
    /// height, clamped to `[-1, 1]`, so it only spans `[-0.5, 0.5]` evenly
    /// when the radius is 1; larger spheres saturate at `|y| >= 1`.
    fn sphere_uv(p: Vec3) -> Vec2 {
        let u = p.z.atan2(p.x) / (2.0 * PI) + 0.5;
        let v = p.y.clamp(-1.0, 1.0).asin() / PI;
        Vec2::new(u, v)
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &mut Ray) -> Option<Intersection> {
        let o_ray = self.transform.apply_inverse_ray(ray);
        let t = self.nearest_root(&o_ray)?;

        let hit_point = o_ray.at(t);
        let outward = hit_point / self.radius;
        // Two-sided: the geometric normal faces where the ray came from
        let geo_n = if hit_point.dot(o_ray.direction) < 0.0 {
            outward
        } else {
            -outward
        };

        let isct = Intersection::new(
            self.transform.apply_point(hit_point),
            self.transform.apply_normal(geo_n).normalize(),
            self.transform.apply_normal(outward).normalize(),
            Self::sphere_uv(hit_point),
            t,
        );
        ray.maxt = t;

        Some(isct)
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.nearest_root(&self.transform.apply_inverse_ray(ray)).is_some()
    }

    fn bounding_box(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        self.transform.apply_aabb(&Aabb::from_points(-r, r))
    }
}
