//! Orthonormal shading frames.

use crate::Vec3;

/// An orthonormal basis `(s, t, n)` with `n` the surface normal.
///
/// Local coordinates put the normal on +Z, so a hemisphere sample with
/// positive `z` lands on the normal's side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub s: Vec3,
    pub t: Vec3,
    pub n: Vec3,
}

impl Frame {
    /// Build a frame around a unit normal.
    pub fn from_normal(n: Vec3) -> Self {
        let (s, t) = n.any_orthonormal_pair();
        Self { s, t, n }
    }

    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.s * local.x + self.t * local.y + self.n * local.z
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::from_normal(Vec3::Z)
    }
}
