//! Sampling of initial conditions: the [`Sampler`] trait plus low-discrepancy
//! sequences (Halton, golden-angle spiral).
//!
//! Visuals seed their stores through a `Sampler` so the same seeding code can
//! run on the PRNG (organic scatter) or on a Halton sequence (even coverage).

use std::f64::consts::TAU;

use glam::DVec2;

use crate::error::EngineError;

/// Golden angle in radians, `π(3 − √5)`.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// A deterministic source of scalars in [0, 1).
pub trait Sampler {
    /// Next value in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Uniform point in the disk of `radius` around `center`.
    fn in_disk(&mut self, center: DVec2, radius: f64) -> DVec2 {
        let r = radius * self.next_f64().sqrt();
        let theta = TAU * self.next_f64();
        center + DVec2::new(theta.cos(), theta.sin()) * r
    }

    /// Uniform point on the circle of `radius` around `center`.
    fn on_ring(&mut self, center: DVec2, radius: f64) -> DVec2 {
        let theta = TAU * self.next_f64();
        center + DVec2::new(theta.cos(), theta.sin()) * radius
    }

    /// Uniform point in the axis-aligned box `[min, max)`.
    fn in_box(&mut self, min: DVec2, max: DVec2) -> DVec2 {
        let x = min.x + self.next_f64() * (max.x - min.x);
        let y = min.y + self.next_f64() * (max.y - min.y);
        DVec2::new(x, y)
    }
}

/// Radical inverse of `index` in `base`: the `index`-th Halton value.
///
/// Returns `EngineError::InvalidBase` for `base <= 1`.
pub fn halton(index: u64, base: u32) -> Result<f64, EngineError> {
    if base < 2 {
        return Err(EngineError::InvalidBase(base));
    }
    Ok(radical_inverse(index, base))
}

fn radical_inverse(mut index: u64, base: u32) -> f64 {
    let b = u64::from(base);
    let inv = 1.0 / base as f64;
    let mut f = 1.0;
    let mut r = 0.0;
    while index > 0 {
        f *= inv;
        r += f * (index % b) as f64;
        index /= b;
    }
    r
}

/// Point `index` of a `count`-point Vogel (golden-angle) spiral in the unit disk.
///
/// Radii are `sqrt((i + 0.5) / n)`, so every point lies strictly inside the disk.
/// Returns the origin when `count` is 0.
pub fn golden_angle(index: usize, count: usize) -> DVec2 {
    if count == 0 {
        return DVec2::ZERO;
    }
    let r = ((index as f64 + 0.5) / count as f64).sqrt();
    let theta = index as f64 * GOLDEN_ANGLE;
    DVec2::new(theta.cos(), theta.sin()) * r
}

/// Two-dimensional Halton sampler (bases 2 and 3).
///
/// Successive calls alternate between the two bases and the index advances
/// after each pair, so the paired draws in [`Sampler::in_box`] and
/// [`Sampler::in_disk`] land on proper 2-D Halton points.
#[derive(Debug, Clone)]
pub struct HaltonSampler {
    index: u64,
    second: bool,
}

impl HaltonSampler {
    const BASES: [u32; 2] = [2, 3];

    /// Starts at index 1 (index 0 maps to the origin in every base).
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Starts at an arbitrary index, for decorrelating several samplers.
    pub fn starting_at(index: u64) -> Self {
        Self {
            index,
            second: false,
        }
    }

    /// Current sequence index.
    pub fn index(&self) -> u64 {
        self.index
    }
}

impl Default for HaltonSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for HaltonSampler {
    fn next_f64(&mut self) -> f64 {
        let base = Self::BASES[usize::from(self.second)];
        let v = radical_inverse(self.index, base);
        if self.second {
            self.index += 1;
        }
        self.second = !self.second;
        v
    }
}
