//! Damped Newton iteration on `z³ − 1` over the complex plane.
//!
//! Walkers crawl toward one of the three cube roots of unity. Once a step is
//! shorter than the tolerance the walker has converged and is re-seeded, so
//! the trails sketch the fractal boundaries between the basins.

use glam::DVec2;
use motif_core::stepper::DiscreteMap;
use serde_json::{json, Value};

/// The cube roots of unity as `(re, im)`.
pub const ROOTS: [DVec2; 3] = [
    DVec2::new(1.0, 0.0),
    DVec2::new(-0.5, 0.866_025_403_784_438_6),
    DVec2::new(-0.5, -0.866_025_403_784_438_6),
];

fn cmul(a: DVec2, b: DVec2) -> DVec2 {
    DVec2::new(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x)
}

/// Complex division. A zero divisor yields non-finite components.
fn cdiv(a: DVec2, b: DVec2) -> DVec2 {
    let d = b.length_squared();
    DVec2::new(a.x * b.x + a.y * b.y, a.y * b.x - a.x * b.y) / d
}

/// `z ← z − relaxation · (z³ − 1) / 3z²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonCubic {
    /// Fraction of the full Newton step taken per iteration.
    pub relaxation: f64,
    /// Step length below which a walker counts as converged.
    pub tolerance: f64,
}

impl Default for NewtonCubic {
    fn default() -> Self {
        Self {
            relaxation: 0.08,
            tolerance: 1e-4,
        }
    }
}

impl NewtonCubic {
    /// Index into [`ROOTS`] of the root nearest `z`.
    pub fn basin(z: DVec2) -> usize {
        let mut best = 0;
        for (i, r) in ROOTS.iter().enumerate().skip(1) {
            if z.distance_squared(*r) < z.distance_squared(ROOTS[best]) {
                best = i;
            }
        }
        best
    }

    pub fn params(&self) -> Value {
        json!({"relaxation": self.relaxation, "tolerance": self.tolerance})
    }
}

impl DiscreteMap for NewtonCubic {
    fn apply(&self, z: DVec2) -> DVec2 {
        let z2 = cmul(z, z);
        let f = cmul(z2, z) - DVec2::X;
        let df = z2 * 3.0;
        z - cdiv(f, df) * self.relaxation
    }
}
