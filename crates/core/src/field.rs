//! Vector fields for advecting particles.
//!
//! A [`FieldSource`] returns a velocity at any point in space and time. Point
//! sources (vortices, dipoles, sources/sinks) add an `ε` to the squared
//! distance so the velocity stays finite at their centres; noise-based
//! sources take the curl of Perlin noise for divergence-free flow.
//!
//! All implementations are deterministic: same inputs produce the same output.

use glam::DVec2;
use noise::{NoiseFn, Perlin};

/// A source of 2D velocity values.
pub trait FieldSource {
    /// Velocity at `p` at time `t`.
    fn sample(&self, p: DVec2, t: f64) -> DVec2;
}

/// Default smoothing term added to squared distances.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// Point vortex: circulation `strength` around `center`.
///
/// Velocity is `strength * perp(r) / (|r|² + ε)`, counter-clockwise for
/// positive strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointVortex {
    pub center: DVec2,
    pub strength: f64,
    pub epsilon: f64,
}

/// Point source (positive strength) or sink (negative strength).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceSink {
    pub center: DVec2,
    pub strength: f64,
    pub epsilon: f64,
}

/// Doublet: a source and sink pair collapsed along `axis`.
///
/// Velocity is `moment * (2 (axis·r) r − |r|² axis) / (|r|² + ε)²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dipole {
    pub center: DVec2,
    pub axis: DVec2,
    pub moment: f64,
    pub epsilon: f64,
}

/// Curl of a scalar Perlin potential, approximately divergence-free.
pub struct CurlNoise {
    noise: Perlin,
    scale: f64,
    strength: f64,
    /// How fast the potential drifts with time.
    speed: f64,
}

/// Sums the velocities of several sources.
#[derive(Default)]
pub struct CompositeField {
    sources: Vec<Box<dyn FieldSource>>,
}

impl PointVortex {
    pub fn new(center: DVec2, strength: f64) -> Self {
        Self {
            center,
            strength,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl SourceSink {
    pub fn new(center: DVec2, strength: f64) -> Self {
        Self {
            center,
            strength,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Dipole {
    /// `axis` is normalized; a zero axis falls back to +x.
    pub fn new(center: DVec2, axis: DVec2, moment: f64) -> Self {
        Self {
            center,
            axis: axis.try_normalize().unwrap_or(DVec2::X),
            moment,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl CurlNoise {
    pub fn new(scale: f64, strength: f64, speed: f64, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
            strength,
            speed,
        }
    }

    fn potential(&self, x: f64, y: f64, t: f64) -> f64 {
        self.noise.get([x, y, t * self.speed])
    }
}

impl CompositeField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source (builder pattern).
    pub fn with(mut self, source: impl FieldSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl FieldSource for PointVortex {
    fn sample(&self, p: DVec2, _t: f64) -> DVec2 {
        let r = p - self.center;
        r.perp() * (self.strength / (r.length_squared() + self.epsilon))
    }
}

impl FieldSource for SourceSink {
    fn sample(&self, p: DVec2, _t: f64) -> DVec2 {
        let r = p - self.center;
        r * (self.strength / (r.length_squared() + self.epsilon))
    }
}

impl FieldSource for Dipole {
    fn sample(&self, p: DVec2, _t: f64) -> DVec2 {
        let r = p - self.center;
        let r2 = r.length_squared();
        let denom = (r2 + self.epsilon) * (r2 + self.epsilon);
        (r * (2.0 * self.axis.dot(r)) - self.axis * r2) * (self.moment / denom)
    }
}

impl FieldSource for CurlNoise {
    fn sample(&self, p: DVec2, t: f64) -> DVec2 {
        let x = p.x * self.scale;
        let y = p.y * self.scale;
        let h = 1e-4;
        // curl of scalar potential F: (dF/dy, -dF/dx)
        let df_dy = (self.potential(x, y + h, t) - self.potential(x, y - h, t)) / (2.0 * h);
        let df_dx = (self.potential(x + h, y, t) - self.potential(x - h, y, t)) / (2.0 * h);
        DVec2::new(df_dy, -df_dx) * self.strength
    }
}

impl FieldSource for CompositeField {
    fn sample(&self, p: DVec2, t: f64) -> DVec2 {
        self.sources
            .iter()
            .fold(DVec2::ZERO, |acc, s| acc + s.sample(p, t))
    }
}

/// How a particle moves through a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdvectMode {
    /// `p += normalize(v) * step`: constant speed, direction from the field.
    Normalized { step: f64 },
    /// `p += v * dt`: speed follows the field magnitude.
    Scaled { dt: f64 },
}

/// Moves `p` one step through `field`. A zero velocity leaves `p` in place.
pub fn advect<F: FieldSource + ?Sized>(field: &F, p: DVec2, t: f64, mode: AdvectMode) -> DVec2 {
    let v = field.sample(p, t);
    match mode {
        AdvectMode::Normalized { step } => p + v.normalize_or_zero() * step,
        AdvectMode::Scaled { dt } => p + v * dt,
    }
}
