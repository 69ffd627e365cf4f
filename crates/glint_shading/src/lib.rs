//! Glint shading core - sphere intersection and BSDF sampling.
//!
//! The pieces a path tracing integrator queries per bounce:
//! - `Shape::intersect` finds the nearest hit and narrows `ray.maxt`
//! - `Bsdf::sample` picks the next direction from the hit's shading frame
//!
//! Everything here is immutable after construction and safe to share
//! across render threads. Rays and random generators are per-thread.

mod bsdf;
mod intersection;
mod shape;
mod sphere;

pub use bsdf::{Bsdf, BsdfEval, BsdfRecord, BsdfSample, Spectrum};
pub use intersection::Intersection;
pub use shape::Shape;
pub use sphere::Sphere;

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Frame, Ray, Transform, Vec2, Vec3};
