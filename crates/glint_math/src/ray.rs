use crate::{Interval, Vec3};

/// A ray in 3D space with origin, direction and a valid parametric range.
///
/// The range `[mint, maxt]` is closed. Intersection routines narrow `maxt`
/// to the closest hit found so far, so a single ray can be tested against
/// several shapes in turn and farther candidates get pruned.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Not necessarily normalized.
    pub direction: Vec3,
    pub mint: f32,
    pub maxt: f32,
}

impl Ray {
    /// Create a new ray valid over `[0, +inf)`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_interval(origin, direction, 0.0, f32::INFINITY)
    }

    /// Create a new ray valid over `[mint, maxt]`.
    pub fn with_interval(origin: Vec3, direction: Vec3, mint: f32, maxt: f32) -> Self {
        Self {
            origin,
            direction,
            mint,
            maxt,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The valid parametric range as an [`Interval`].
    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.mint, self.maxt)
    }

    /// Whether `t` lies inside `[mint, maxt]`.
    #[inline]
    pub fn accepts(&self, t: f32) -> bool {
        self.interval().contains(t)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.mint, 0.0);
        assert_eq!(ray.maxt, f32::INFINITY);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_accepts_closed_range() {
        let ray = Ray::with_interval(Vec3::ZERO, Vec3::Z, 1.0, 4.0);

        assert!(ray.accepts(1.0));
        assert!(ray.accepts(4.0));
        assert!(ray.accepts(2.5));
        assert!(!ray.accepts(0.999));
        assert!(!ray.accepts(4.001));
    }

    #[test]
    fn test_ray_copy_is_independent() {
        let mut ray1 = Ray::new(Vec3::ZERO, Vec3::Y);
        let ray2 = ray1; // Copy, not move

        ray1.maxt = 3.0;
        assert_eq!(ray2.maxt, f32::INFINITY);
        assert_eq!(ray1.at(1.0), ray2.at(1.0));
    }
}
