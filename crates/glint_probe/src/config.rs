//! Probe descriptions.
//!
//! A probe is one sphere, one ray and one BSDF, read from JSON:
//!
//! ```json
//! {
//!   "sphere": { "radius": 1.0, "transform": { "position": [0, 0, 0] } },
//!   "ray": { "origin": [0, 0, 5], "direction": [0, 0, -1] },
//!   "bsdf": { "type": "specular_transmission", "refract_rate": 1.5 },
//!   "samples": 4096,
//!   "seed": 7
//! }
//! ```
//!
//! The shading kernel does not validate its inputs, so everything it treats
//! as a precondition is checked here.

use std::path::Path;
use std::sync::Arc;

use glint_math::{Ray, Transform, Vec3};
use glint_shading::{Bsdf, Sphere};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading a probe description.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid probe description: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_samples() -> u32 {
    1024
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    pub sphere: SphereDesc,
    pub ray: RayDesc,
    pub bsdf: BsdfDesc,
    #[serde(default = "default_samples")]
    pub samples: u32,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereDesc {
    pub radius: f32,
    #[serde(default)]
    pub transform: TransformDesc,
}

/// Translate, rotate about `axis` by `angle` radians, scale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformDesc {
    pub position: [f32; 3],
    pub axis: [f32; 3],
    pub angle: f32,
    pub scale: [f32; 3],
}

impl Default for TransformDesc {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            axis: [0.0, 1.0, 0.0],
            angle: 0.0,
            scale: [1.0; 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RayDesc {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
    #[serde(default)]
    pub mint: f32,
    /// Missing or null means unbounded.
    #[serde(default)]
    pub maxt: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BsdfDesc {
    Lambertian,
    SpecularReflection {
        #[serde(default)]
        roughness: f32,
    },
    SpecularTransmission {
        refract_rate: f32,
    },
}

impl ProbeConfig {
    /// Read and validate a probe description from disk.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("Read probe description {} ({} bytes)", path.display(), text.len());
        Self::from_json(&text)
    }

    /// Parse and validate a probe description.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: ProbeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject inputs the kernel treats as undefined.
    pub fn validate(&self) -> ConfigResult<()> {
        let radius = self.sphere.radius;
        if !(radius.is_finite() && radius > 0.0) {
            return invalid(format!("sphere radius must be positive, got {radius}"));
        }

        let t = &self.sphere.transform;
        if Vec3::from(t.axis).length_squared() == 0.0 {
            return invalid("rotation axis must be non-zero".to_string());
        }
        if t.scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            return invalid(format!("scale components must be non-zero, got {:?}", t.scale));
        }

        let ray = &self.ray;
        if Vec3::from(ray.direction).length_squared() == 0.0 {
            return invalid("ray direction must be non-zero".to_string());
        }
        if !ray.mint.is_finite() {
            return invalid(format!("ray mint must be finite, got {}", ray.mint));
        }
        let maxt = ray.maxt.unwrap_or(f32::INFINITY);
        if maxt.is_nan() || ray.mint > maxt {
            return invalid(format!("ray interval [{}, {}] is empty", ray.mint, maxt));
        }

        match self.bsdf {
            BsdfDesc::Lambertian => {}
            BsdfDesc::SpecularReflection { roughness } => {
                if !(roughness.is_finite() && roughness >= 0.0) {
                    return invalid(format!("roughness must be non-negative, got {roughness}"));
                }
            }
            BsdfDesc::SpecularTransmission { refract_rate } => {
                if !(refract_rate.is_finite() && refract_rate > 0.0) {
                    return invalid(format!("refract_rate must be positive, got {refract_rate}"));
                }
            }
        }

        if self.samples == 0 {
            return invalid("samples must be at least 1".to_string());
        }

        Ok(())
    }

    pub fn sphere(&self) -> Sphere {
        let t = &self.sphere.transform;
        let transform = Transform::from_trs(
            Vec3::from(t.position),
            Vec3::from(t.axis),
            t.angle,
            Vec3::from(t.scale),
        );
        Sphere::new(self.sphere.radius, Arc::new(transform))
    }

    pub fn ray(&self) -> Ray {
        Ray::with_interval(
            Vec3::from(self.ray.origin),
            Vec3::from(self.ray.direction),
            self.ray.mint,
            self.ray.maxt.unwrap_or(f32::INFINITY),
        )
    }

    pub fn bsdf(&self) -> Bsdf {
        match self.bsdf {
            BsdfDesc::Lambertian => Bsdf::lambertian(),
            BsdfDesc::SpecularReflection { roughness } => Bsdf::specular_reflection(roughness),
            BsdfDesc::SpecularTransmission { refract_rate } => {
                Bsdf::specular_transmission(refract_rate)
            }
        }
    }
}

fn invalid(message: String) -> ConfigResult<()> {
    Err(ConfigError::Invalid(message))
}
