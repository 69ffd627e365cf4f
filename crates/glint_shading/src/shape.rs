//! Shape trait for ray-surface intersection.

use crate::Intersection;
use glint_math::{Aabb, Ray};

/// Trait for surfaces that can be hit by rays.
///
/// One logical ray is tested against shapes one at a time: `intersect` takes
/// it by exclusive reference and narrows `maxt` to each accepted hit, so a
/// later, farther candidate is rejected without extra bookkeeping.
pub trait Shape: Send + Sync {
    /// Find the nearest hit inside `[ray.mint, ray.maxt]`.
    ///
    /// On a hit, sets `ray.maxt` to the hit parameter. On a miss the ray is
    /// left untouched.
    fn intersect(&self, ray: &mut Ray) -> Option<Intersection>;

    /// Whether any hit exists inside `[ray.mint, ray.maxt]`.
    fn intersect_p(&self, ray: &Ray) -> bool;

    /// World-space bounding box.
    fn bounding_box(&self) -> Aabb;
}
