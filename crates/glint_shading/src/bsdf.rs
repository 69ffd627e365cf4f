//! BSDFs for surface scattering.
//!
//! A closed set of scattering models dispatched by `match`. All directions
//! are world space; `wo` points away from the surface along the path that
//! reached it, `wi` is the sampled continuation.
//!
//! The specular variants are delta distributions. `sample` reports a unit
//! weight (`pdf = 1`) for the direction it picks, while `pdf` and `evaluate`
//! report zero density since an independently chosen direction hits the
//! delta with probability zero.

use glint_math::sampling::{
    cosine_sample_hemisphere, gen_f32, random_in_unit_ball, reflect, refract, schlick, INV_TWO_PI,
};
use glint_math::{Vec2, Vec3};
use rand::RngCore;

use crate::Intersection;

/// RGB spectrum. `Spectrum::ZERO` is the empty spectrum.
pub type Spectrum = Vec3;

/// Directions at a shading point, plus the hit that supplies the frame.
#[derive(Debug, Clone, Copy)]
pub struct BsdfRecord<'a> {
    /// Outgoing direction, toward where the path came from
    pub wo: Vec3,
    /// Sampled incoming direction (written by `Bsdf::sample`)
    pub wi: Vec3,
    pub isct: &'a Intersection,
}

impl<'a> BsdfRecord<'a> {
    pub fn new(isct: &'a Intersection, wo: Vec3) -> Self {
        Self {
            wo,
            wi: Vec3::ZERO,
            isct,
        }
    }
}

/// Result of `Bsdf::sample`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    pub wi: Vec3,
    pub pdf: f32,
}

/// Result of `Bsdf::evaluate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfEval {
    pub value: Spectrum,
    pub pdf: f32,
}

/// Surface scattering models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bsdf {
    /// Diffuse reflection, cosine-weighted importance sampling.
    Lambertian,
    /// Mirror reflection perturbed inside a ball of radius `roughness`.
    /// 0.0 is a perfect mirror.
    SpecularReflection { roughness: f32 },
    /// Dielectric boundary choosing reflection or refraction by Schlick's
    /// Fresnel term. `refract_rate` is the inside over outside index.
    SpecularTransmission { refract_rate: f32 },
}

impl Bsdf {
    pub fn lambertian() -> Self {
        Bsdf::Lambertian
    }

    pub fn specular_reflection(roughness: f32) -> Self {
        Bsdf::SpecularReflection { roughness }
    }

    pub fn specular_transmission(refract_rate: f32) -> Self {
        Bsdf::SpecularTransmission { refract_rate }
    }

    /// True for delta distributions (the specular variants).
    pub fn is_delta(&self) -> bool {
        !matches!(self, Bsdf::Lambertian)
    }

    /// Sample `wi` for `rec.wo`.
    ///
    /// `u` drives the diffuse hemisphere mapping. `rng` supplies the extra
    /// randomness of the specular variants (roughness offset, Fresnel
    /// choice). Normalizes `rec.wo` and writes a unit `rec.wi`.
    pub fn sample(&self, rec: &mut BsdfRecord, u: Vec2, rng: &mut dyn RngCore) -> BsdfSample {
        rec.wo = rec.wo.normalize();
        let isct = rec.isct;

        let (wi, pdf) = match *self {
            Bsdf::Lambertian => {
                let local = cosine_sample_hemisphere(u);
                (isct.sh_frame.to_world(local), self.pdf(rec))
            }
            Bsdf::SpecularReflection { roughness } => {
                (sample_glossy_mirror(rec.wo, isct.sh_n, roughness, rng), 1.0)
            }
            Bsdf::SpecularTransmission { refract_rate } => {
                (sample_dielectric(rec.wo, isct.sh_n, refract_rate, rng), 1.0)
            }
        };

        rec.wi = wi.normalize();
        BsdfSample { wi: rec.wi, pdf }
    }

    /// Reflectance for the directions in `rec`.
    ///
    /// Reflectance is not modelled yet, so the value is always the empty
    /// spectrum; the pdf matches [`Bsdf::pdf`].
    pub fn evaluate(&self, rec: &BsdfRecord) -> BsdfEval {
        BsdfEval {
            value: Spectrum::ZERO,
            pdf: self.pdf(rec),
        }
    }

    /// Density of choosing `rec.wi` given `rec.wo`.
    ///
    /// The Lambertian density is the constant `1 / (2 pi)`, even though
    /// sampling is cosine weighted (`cos / pi`).
    pub fn pdf(&self, _rec: &BsdfRecord) -> f32 {
        match self {
            Bsdf::Lambertian => INV_TWO_PI,
            Bsdf::SpecularReflection { .. } | Bsdf::SpecularTransmission { .. } => 0.0,
        }
    }
}

fn sample_glossy_mirror(wo: Vec3, n: Vec3, roughness: f32, rng: &mut dyn RngCore) -> Vec3 {
    let mirror = reflect(-wo, n);
    if roughness > 0.0 {
        mirror + roughness * random_in_unit_ball(rng)
    } else {
        mirror
    }
}

fn sample_dielectric(wo: Vec3, sh_n: Vec3, refract_rate: f32, rng: &mut dyn RngCore) -> Vec3 {
    // Orient the normal toward wo; arriving from outside sees 1 / rate
    let (normal, eta) = if sh_n.dot(-wo) < 0.0 {
        (sh_n, 1.0 / refract_rate)
    } else {
        (-sh_n, refract_rate)
    };

    let cos_theta = wo.dot(normal).abs().min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let cannot_refract = eta * sin_theta > 1.0;

    let xi = gen_f32(rng);
    if cannot_refract || schlick(cos_theta, eta) > xi {
        reflect(-wo, normal)
    } else {
        refract(-wo, normal, eta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::sampling::gen_vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn flat_hit(n: Vec3) -> Intersection {
        Intersection::new(Vec3::ZERO, n, n, Vec2::ZERO, 1.0)
    }

    fn random_unit(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = random_in_unit_ball(rng);
            if v.length_squared() > 1e-4 {
                return v.normalize();
            }
        }
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_sample_directions_are_unit_for_all_variants() {
        let mut rng = StdRng::seed_from_u64(42);
        let bsdfs = [
            Bsdf::lambertian(),
            Bsdf::specular_reflection(0.0),
            Bsdf::specular_reflection(0.3),
            Bsdf::specular_transmission(1.5),
        ];

        for _ in 0..200 {
            let isct = flat_hit(random_unit(&mut rng));
            // Unnormalized on purpose; sample must fix it up
            let wo = random_unit(&mut rng) * 3.0;
            for bsdf in &bsdfs {
                let mut rec = BsdfRecord::new(&isct, wo);
                let u = gen_vec2(&mut rng);
                let s = bsdf.sample(&mut rec, u, &mut rng);

                assert!((rec.wi.length() - 1.0).abs() < 1e-5, "{bsdf:?} wi");
                assert!((rec.wo.length() - 1.0).abs() < 1e-5, "{bsdf:?} wo");
                assert_eq!(s.wi, rec.wi);
            }
        }
    }

    #[test]
    fn test_lambertian_pdf_is_constant() {
        let mut rng = StdRng::seed_from_u64(7);
        let bsdf = Bsdf::lambertian();
        let expected = 1.0 / (2.0 * PI);

        for _ in 0..100 {
            let isct = flat_hit(random_unit(&mut rng));
            let mut rec = BsdfRecord::new(&isct, random_unit(&mut rng));

            assert!((bsdf.pdf(&rec) - expected).abs() < 1e-7);
            let s = bsdf.sample(&mut rec, gen_vec2(&mut rng), &mut rng);
            assert!((s.pdf - expected).abs() < 1e-7);
            assert!((bsdf.pdf(&rec) - expected).abs() < 1e-7);
        }
    }

    #[test]
    fn test_lambertian_samples_shading_hemisphere() {
        let mut rng = StdRng::seed_from_u64(8);
        let bsdf = Bsdf::lambertian();

        for _ in 0..100 {
            let n = random_unit(&mut rng);
            let isct = flat_hit(n);
            let mut rec = BsdfRecord::new(&isct, n);
            let s = bsdf.sample(&mut rec, gen_vec2(&mut rng), &mut rng);
            assert!(s.wi.dot(n) >= -1e-5);
        }
    }

    #[test]
    fn test_lambertian_evaluate_is_empty_with_same_pdf() {
        let isct = flat_hit(Vec3::Y);
        let rec = BsdfRecord::new(&isct, Vec3::Y);
        let eval = Bsdf::lambertian().evaluate(&rec);

        assert_eq!(eval.value, Spectrum::ZERO);
        assert_eq!(eval.pdf, INV_TWO_PI);
    }

    #[test]
    fn test_mirror_reflection_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        let bsdf = Bsdf::specular_reflection(0.0);

        for _ in 0..100 {
            let n = random_unit(&mut rng);
            let isct = flat_hit(n);
            let wo = random_unit(&mut rng);
            let mut rec = BsdfRecord::new(&isct, wo);

            let s = bsdf.sample(&mut rec, gen_vec2(&mut rng), &mut rng);
            assert!(approx(s.wi, reflect(-wo, n).normalize()));
            assert_eq!(s.pdf, 1.0);
        }
    }

    #[test]
    fn test_mirror_reflection_known_direction() {
        let isct = flat_hit(Vec3::Y);
        let wo = Vec3::new(1.0, 1.0, 0.0);
        let mut rec = BsdfRecord::new(&isct, wo);
        let mut rng = StdRng::seed_from_u64(0);

        let s = Bsdf::specular_reflection(0.0).sample(&mut rec, Vec2::ZERO, &mut rng);
        assert!(approx(s.wi, Vec3::new(-1.0, 1.0, 0.0).normalize()));
    }

    #[test]
    fn test_rough_reflection_stays_near_mirror() {
        let mut rng = StdRng::seed_from_u64(2);
        let roughness = 0.2;
        let bsdf = Bsdf::specular_reflection(roughness);
        let isct = flat_hit(Vec3::Z);
        let wo = Vec3::new(0.0, 0.6, 0.8);
        let mirror = reflect(-wo, Vec3::Z);

        let mut any_offset = false;
        for _ in 0..200 {
            let mut rec = BsdfRecord::new(&isct, wo);
            let s = bsdf.sample(&mut rec, gen_vec2(&mut rng), &mut rng);
            // Offset radius bounds the angle: sin(angle) <= roughness
            assert!(s.wi.cross(mirror).length() <= roughness + 1e-5);
            any_offset |= !approx(s.wi, mirror);
        }
        assert!(any_offset);
    }

    #[test]
    fn test_delta_bsdfs_report_zero_density() {
        let isct = flat_hit(Vec3::Z);
        let rec = BsdfRecord::new(&isct, Vec3::Z);

        for bsdf in [Bsdf::specular_reflection(0.1), Bsdf::specular_transmission(1.5)] {
            assert!(bsdf.is_delta());
            assert_eq!(bsdf.pdf(&rec), 0.0);
            let eval = bsdf.evaluate(&rec);
            assert_eq!(eval.pdf, 0.0);
            assert_eq!(eval.value, Spectrum::ZERO);
        }
        assert!(!Bsdf::lambertian().is_delta());
    }

    #[test]
    fn test_transmission_total_internal_reflection_past_critical_angle() {
        let mut rng = StdRng::seed_from_u64(3);
        let bsdf = Bsdf::specular_transmission(1.5);
        // Outward shading normal; the path travels from inside toward it
        let isct = flat_hit(Vec3::Y);
        let critical = (1.0_f32 / 1.5).asin();

        let mut theta = critical + 0.01;
        while theta < PI / 2.0 {
            let travel = Vec3::new(theta.sin(), theta.cos(), 0.0);
            let wo = -travel;
            let expected = Vec3::new(theta.sin(), -theta.cos(), 0.0);

            for _ in 0..50 {
                let mut rec = BsdfRecord::new(&isct, wo);
                let s = bsdf.sample(&mut rec, gen_vec2(&mut rng), &mut rng);
                assert!(approx(s.wi, expected), "theta={theta} wi={:?}", s.wi);
                assert_eq!(s.pdf, 1.0);
            }
            theta += 0.05;
        }
    }

    #[test]
    fn test_transmission_mostly_refracts_at_normal_incidence() {
        let mut rng = StdRng::seed_from_u64(4);
        let bsdf = Bsdf::specular_transmission(1.5);
        let isct = flat_hit(Vec3::Y);

        let draws = 5000;
        let mut refracted = 0;
        for _ in 0..draws {
            let mut rec = BsdfRecord::new(&isct, Vec3::Y);
            let s = bsdf.sample(&mut rec, gen_vec2(&mut rng), &mut rng);
            if approx(s.wi, -Vec3::Y) {
                refracted += 1;
            } else {
                assert!(approx(s.wi, Vec3::Y));
            }
        }

        // Schlick at normal incidence reflects r0 = 0.04 of the time
        let fraction = refracted as f32 / draws as f32;
        assert!((fraction - 0.96).abs() < 0.02, "refracted fraction {fraction}");
    }

    #[test]
    fn test_transmission_entering_obeys_snell() {
        let bsdf = Bsdf::specular_transmission(1.5);
        let isct = flat_hit(Vec3::Y);
        let theta = 0.5_f32;
        let travel = Vec3::new(theta.sin(), -theta.cos(), 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        let mut saw_refraction = false;
        for _ in 0..100 {
            let mut rec = BsdfRecord::new(&isct, -travel);
            let s = bsdf.sample(&mut rec, gen_vec2(&mut rng), &mut rng);
            if s.wi.y < 0.0 {
                saw_refraction = true;
                assert!((s.wi.x - theta.sin() / 1.5).abs() < 1e-5);
            }
        }
        assert!(saw_refraction);
    }

    #[test]
    fn test_transmission_is_reproducible_under_fixed_seed() {
        let bsdf = Bsdf::specular_transmission(1.33);
        let isct = flat_hit(Vec3::Z);
        let wo = Vec3::new(0.7, 0.0, 0.3);

        let run = |seed: u64| -> Vec<Vec3> {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..64)
                .map(|_| {
                    let mut rec = BsdfRecord::new(&isct, wo);
                    bsdf.sample(&mut rec, Vec2::ZERO, &mut rng).wi
                })
                .collect()
        };

        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_bsdf_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Bsdf>();
    }
}
