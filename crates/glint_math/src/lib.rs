// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod frame;
mod interval;
mod ray;
pub mod sampling;
mod transform;

pub use aabb::Aabb;
pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Transform;
