// Affine transform pair for shapes.
//
// Stores the object-to-world matrix together with its inverse and the normal
// matrix so intersection code never inverts on the hot path.

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::{Aabb, Ray};

/// An invertible affine transform with cached inverse and normal matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    object_to_world: Mat4,
    world_to_object: Mat4,
    /// Inverse-transpose of the linear part of `object_to_world`.
    normal_matrix: Mat3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        object_to_world: Mat4::IDENTITY,
        world_to_object: Mat4::IDENTITY,
        normal_matrix: Mat3::IDENTITY,
    };

    /// Build from an object-to-world matrix.
    ///
    /// The matrix must be invertible. A singular matrix is reported through
    /// `log::warn!` and yields a non-finite inverse.
    pub fn new(object_to_world: Mat4) -> Self {
        let det = object_to_world.determinant();
        if det == 0.0 || !det.is_finite() {
            log::warn!("Transform matrix is singular (det = {det}); inverse will not be finite");
        }
        let world_to_object = object_to_world.inverse();

        Self {
            object_to_world,
            world_to_object,
            normal_matrix: Mat3::from_mat4(world_to_object).transpose(),
        }
    }

    /// Translate, then rotate `angle` radians about `axis`, then scale.
    ///
    /// Applied to a point this scales first and translates last (`T * R * S`).
    pub fn from_trs(position: Vec3, axis: Vec3, angle: f32, scale: Vec3) -> Self {
        let rotation = Quat::from_axis_angle(axis.normalize(), angle);
        Self::new(Mat4::from_scale_rotation_translation(scale, rotation, position))
    }

    pub fn from_translation(offset: Vec3) -> Self {
        Self::new(Mat4::from_translation(offset))
    }

    #[inline]
    pub fn apply_point(&self, point: Vec3) -> Vec3 {
        self.object_to_world.transform_point3(point)
    }

    /// Directions ignore translation (implicit w=0).
    #[inline]
    pub fn apply_vector(&self, vector: Vec3) -> Vec3 {
        self.object_to_world.transform_vector3(vector)
    }

    /// Transforms a surface normal. The result is not renormalized.
    #[inline]
    pub fn apply_normal(&self, normal: Vec3) -> Vec3 {
        self.normal_matrix * normal
    }

    /// Transforms origin and direction; the parametric range is kept as is.
    ///
    /// The direction is not renormalized, so a parameter `t` names the same
    /// point on both sides of the transform.
    pub fn apply_ray(&self, ray: &Ray) -> Ray {
        Ray::with_interval(
            self.apply_point(ray.origin),
            self.apply_vector(ray.direction),
            ray.mint,
            ray.maxt,
        )
    }

    /// World-to-object counterpart of [`Transform::apply_ray`].
    pub fn apply_inverse_ray(&self, ray: &Ray) -> Ray {
        Ray::with_interval(
            self.world_to_object.transform_point3(ray.origin),
            self.world_to_object.transform_vector3(ray.direction),
            ray.mint,
            ray.maxt,
        )
    }

    /// Bounding box of the eight transformed corners.
    pub fn apply_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners().map(|corner| self.apply_point(corner));
        Aabb::enclosing(&corners)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
