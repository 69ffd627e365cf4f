//! Sample warping and scattering helpers.
//!
//! Hemisphere routines work in a local frame where the normal is +Z.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use rand::{Rng, RngCore};

use crate::{Vec2, Vec3};

pub const INV_PI: f32 = 1.0 / PI;
pub const INV_TWO_PI: f32 = 1.0 / (2.0 * PI);

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// A 2D sample in [0, 1)^2.
#[inline]
pub fn gen_vec2(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(gen_f32(rng), gen_f32(rng))
}

/// Uniformly sample a direction on the +Z hemisphere.
pub fn uniform_sample_hemisphere(u: Vec2) -> Vec3 {
    let z = u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

#[inline]
pub fn uniform_hemisphere_pdf() -> f32 {
    INV_TWO_PI
}

/// Map [0,1)^2 to the unit disk so concentric squares become concentric circles.
pub fn concentric_sample_disk(u: Vec2) -> Vec2 {
    let offset = 2.0 * u - Vec2::ONE;

    // Degenerate at the origin
    if offset.x == 0.0 && offset.y == 0.0 {
        return Vec2::ZERO;
    }

    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * (offset.y / offset.x))
    } else {
        (offset.y, FRAC_PI_2 - FRAC_PI_4 * (offset.x / offset.y))
    };

    r * Vec2::new(theta.cos(), theta.sin())
}

/// Cosine-weighted direction on the +Z hemisphere (Malley's method).
pub fn cosine_sample_hemisphere(u: Vec2) -> Vec3 {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

/// Density of [`cosine_sample_hemisphere`] for a direction with this cosine.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    cos_theta * INV_PI
}

/// A point inside the unit ball, by rejection.
pub fn random_in_unit_ball(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit direction `uv` through a surface whose normal `n` faces
/// against it. `eta` is the ratio of incident over transmitted index.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, eta: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = eta * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation of Fresnel reflectance.
#[inline]
pub fn schlick(cosine: f32, eta: f32) -> f32 {
    let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
