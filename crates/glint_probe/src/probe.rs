//! Probe runner.
//!
//! Intersects one ray with a sphere, then draws BSDF samples at the hit.
//! Samples are split into fixed-size chunks rendered in parallel with rayon;
//! every chunk owns its own generator so the result only depends on the seed.

use std::fmt;

use glint_math::sampling::gen_vec2;
use glint_math::{Ray, Vec2, Vec3};
use glint_shading::{Bsdf, BsdfRecord, Intersection, Shape, Sphere};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Samples per parallel work item.
pub const CHUNK_SIZE: u32 = 256;

/// Accumulated statistics over a batch of BSDF draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub count: u32,
    pub wi_sum: Vec3,
    /// Draws leaving on the same side of the geometric normal as `wo`
    pub reflected: u32,
    /// Largest `| |wi| - 1 |` seen
    pub max_unit_error: f32,
    pub sample_pdf_sum: f32,
    pub query_pdf_sum: f32,
}

impl Default for SampleStats {
    fn default() -> Self {
        Self {
            count: 0,
            wi_sum: Vec3::ZERO,
            reflected: 0,
            max_unit_error: 0.0,
            sample_pdf_sum: 0.0,
            query_pdf_sum: 0.0,
        }
    }
}

impl SampleStats {
    pub fn merge(self, other: SampleStats) -> SampleStats {
        SampleStats {
            count: self.count + other.count,
            wi_sum: self.wi_sum + other.wi_sum,
            reflected: self.reflected + other.reflected,
            max_unit_error: self.max_unit_error.max(other.max_unit_error),
            sample_pdf_sum: self.sample_pdf_sum + other.sample_pdf_sum,
            query_pdf_sum: self.query_pdf_sum + other.query_pdf_sum,
        }
    }

    pub fn mean_wi(&self) -> Vec3 {
        self.wi_sum / self.count.max(1) as f32
    }

    pub fn reflected_fraction(&self) -> f32 {
        self.reflected as f32 / self.count.max(1) as f32
    }

    pub fn mean_sample_pdf(&self) -> f32 {
        self.sample_pdf_sum / self.count.max(1) as f32
    }

    pub fn mean_query_pdf(&self) -> f32 {
        self.query_pdf_sum / self.count.max(1) as f32
    }
}

/// Everything a probe run found.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub hit: Option<Intersection>,
    /// The ray after intersection (`maxt` narrowed on a hit)
    pub ray: Ray,
    pub bsdf: Bsdf,
    pub stats: Option<SampleStats>,
}

/// Intersect `ray` with `sphere` and, on a hit, draw `samples` directions
/// from `bsdf` with `wo` pointing back along the ray.
pub fn run_probe(sphere: &Sphere, mut ray: Ray, bsdf: &Bsdf, samples: u32, seed: u64) -> ProbeReport {
    let hit = sphere.intersect(&mut ray);

    let stats = hit.as_ref().map(|isct| {
        let wo = -ray.direction;
        let chunks = samples.div_ceil(CHUNK_SIZE);
        log::debug!("Sampling {} directions in {} chunks", samples, chunks);

        // Collect in chunk order so the float sums do not depend on scheduling
        let per_chunk: Vec<SampleStats> = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * CHUNK_SIZE;
                let count = CHUNK_SIZE.min(samples - start);
                sample_chunk(bsdf, isct, wo, count, chunk_seed(seed, chunk))
            })
            .collect();

        per_chunk
            .into_iter()
            .fold(SampleStats::default(), SampleStats::merge)
    });

    ProbeReport {
        hit,
        ray,
        bsdf: *bsdf,
        stats,
    }
}

/// Per-chunk stream seed. The multiply is odd, so distinct seeds stay
/// distinct for a given chunk.
fn chunk_seed(seed: u64, chunk: u32) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ u64::from(chunk)
}

fn sample_chunk(bsdf: &Bsdf, isct: &Intersection, wo: Vec3, count: u32, seed: u64) -> SampleStats {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = SampleStats::default();

    for _ in 0..count {
        let mut rec = BsdfRecord::new(isct, wo);
        let u: Vec2 = gen_vec2(&mut rng);
        let sample = bsdf.sample(&mut rec, u, &mut rng);

        stats.count += 1;
        stats.wi_sum += sample.wi;
        if sample.wi.dot(isct.geo_n) > 0.0 {
            stats.reflected += 1;
        }
        stats.max_unit_error = stats.max_unit_error.max((sample.wi.length() - 1.0).abs());
        stats.sample_pdf_sum += sample.pdf;
        stats.query_pdf_sum += bsdf.pdf(&rec);
    }

    stats
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(isct) = &self.hit else {
            return writeln!(f, "miss");
        };

        writeln!(f, "hit")?;
        writeln!(f, "  t            {:.6}", isct.t)?;
        writeln!(f, "  point        {:?}", isct.p)?;
        writeln!(f, "  geo normal   {:?}", isct.geo_n)?;
        writeln!(f, "  shade normal {:?}", isct.sh_n)?;
        writeln!(f, "  uv           {:?}", isct.uv)?;
        writeln!(f, "  ray maxt     {:.6}", self.ray.maxt)?;

        if let Some(stats) = &self.stats {
            writeln!(f, "bsdf {:?} (delta: {})", self.bsdf, self.bsdf.is_delta())?;
            writeln!(f, "  samples      {}", stats.count)?;
            writeln!(f, "  mean wi      {:?}", stats.mean_wi())?;
            writeln!(f, "  reflected    {:.4}", stats.reflected_fraction())?;
            writeln!(f, "  max |wi|-1   {:.3e}", stats.max_unit_error)?;
            writeln!(f, "  sample pdf   {:.6}", stats.mean_sample_pdf())?;
            writeln!(f, "  query pdf    {:.6}", stats.mean_query_pdf())?;
        }

        Ok(())
    }
}
