//! Three-variable strange attractors integrated with explicit Euler.
//!
//! Each system fixes its own `dt`, small enough for a stable picture at one
//! step per frame. Drift from the true trajectory is accepted; divergence is
//! caught by the per-model escape radius and the element is re-seeded.

use glam::{DVec2, DVec3};
use motif_core::stepper::{EscapePolicy, Flow, Reseed};
use serde_json::{json, Value};

/// A flow together with how to project, frame and bound it.
pub trait FlowModel: Flow {
    const NAME: &'static str;

    /// Drops one axis for display.
    fn project(&self, p: DVec3) -> DVec2;

    /// Projected rectangle `(min, max)` shown on the surface.
    fn view(&self) -> (DVec2, DVec2);

    fn escape(&self) -> EscapePolicy;

    fn reseed(&self) -> Reseed;

    fn params(&self) -> Value;
}

/// Lorenz system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lorenz {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
    pub dt: f64,
}

impl Default for Lorenz {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            dt: 0.005,
        }
    }
}

impl Flow for Lorenz {
    fn derivative(&self, p: DVec3) -> DVec3 {
        DVec3::new(
            self.sigma * (p.y - p.x),
            p.x * (self.rho - p.z) - p.y,
            p.x * p.y - self.beta * p.z,
        )
    }

    fn dt(&self) -> f64 {
        self.dt
    }
}

impl FlowModel for Lorenz {
    const NAME: &'static str = "lorenz";

    fn project(&self, p: DVec3) -> DVec2 {
        DVec2::new(p.x, p.z)
    }

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-25.0, 0.0), DVec2::new(25.0, 52.0))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(200.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Cube {
            center: DVec3::new(0.0, 0.0, 25.0),
            half: 10.0,
        }
    }

    fn params(&self) -> Value {
        json!({"sigma": self.sigma, "rho": self.rho, "beta": self.beta, "dt": self.dt})
    }
}

/// Aizawa system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aizawa {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub dt: f64,
}

impl Default for Aizawa {
    fn default() -> Self {
        Self {
            a: 0.95,
            b: 0.7,
            c: 0.6,
            d: 3.5,
            e: 0.25,
            f: 0.1,
            dt: 0.01,
        }
    }
}

impl Flow for Aizawa {
    fn derivative(&self, p: DVec3) -> DVec3 {
        let DVec3 { x, y, z } = p;
        DVec3::new(
            (z - self.b) * x - self.d * y,
            self.d * x + (z - self.b) * y,
            self.c + self.a * z - z * z * z / 3.0 - (x * x + y * y) * (1.0 + self.e * z)
                + self.f * z * x * x * x,
        )
    }

    fn dt(&self) -> f64 {
        self.dt
    }
}

impl FlowModel for Aizawa {
    const NAME: &'static str = "aizawa";

    fn project(&self, p: DVec3) -> DVec2 {
        DVec2::new(p.x, p.z)
    }

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-1.6, -0.6), DVec2::new(1.6, 2.0))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(10.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Cube {
            center: DVec3::new(0.1, 0.0, 0.0),
            half: 0.5,
        }
    }

    fn params(&self) -> Value {
        json!({
            "a": self.a, "b": self.b, "c": self.c,
            "d": self.d, "e": self.e, "f": self.f, "dt": self.dt,
        })
    }
}

/// Rössler system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rossler {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub dt: f64,
}

impl Default for Rossler {
    fn default() -> Self {
        Self {
            a: 0.2,
            b: 0.2,
            c: 5.7,
            dt: 0.01,
        }
    }
}

impl Flow for Rossler {
    fn derivative(&self, p: DVec3) -> DVec3 {
        DVec3::new(-p.y - p.z, p.x + self.a * p.y, self.b + p.z * (p.x - self.c))
    }

    fn dt(&self) -> f64 {
        self.dt
    }
}

impl FlowModel for Rossler {
    const NAME: &'static str = "rossler";

    fn project(&self, p: DVec3) -> DVec2 {
        p.truncate()
    }

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-12.0, -12.0), DVec2::new(14.0, 10.0))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(100.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Cube {
            center: DVec3::new(1.0, 1.0, 0.0),
            half: 2.0,
        }
    }

    fn params(&self) -> Value {
        json!({"a": self.a, "b": self.b, "c": self.c, "dt": self.dt})
    }
}

/// Rabinovich–Fabrikant system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RabinovichFabrikant {
    pub alpha: f64,
    pub gamma: f64,
    pub dt: f64,
}

impl Default for RabinovichFabrikant {
    fn default() -> Self {
        Self {
            alpha: 0.14,
            gamma: 0.1,
            dt: 0.005,
        }
    }
}

impl Flow for RabinovichFabrikant {
    fn derivative(&self, p: DVec3) -> DVec3 {
        let DVec3 { x, y, z } = p;
        DVec3::new(
            y * (z - 1.0 + x * x) + self.gamma * x,
            x * (3.0 * z + 1.0 - x * x) + self.gamma * y,
            -2.0 * z * (self.alpha + x * y),
        )
    }

    fn dt(&self) -> f64 {
        self.dt
    }
}

impl FlowModel for RabinovichFabrikant {
    const NAME: &'static str = "rabinovich-fabrikant";

    fn project(&self, p: DVec3) -> DVec2 {
        p.truncate()
    }

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-2.5, -2.5), DVec2::new(2.5, 2.5))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(10.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Cube {
            center: DVec3::new(-1.0, 0.0, 0.5),
            half: 0.1,
        }
    }

    fn params(&self) -> Value {
        json!({"alpha": self.alpha, "gamma": self.gamma, "dt": self.dt})
    }
}

/// Dadras system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dadras {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub dt: f64,
}

impl Default for Dadras {
    fn default() -> Self {
        Self {
            a: 3.0,
            b: 2.7,
            c: 1.7,
            d: 2.0,
            e: 9.0,
            dt: 0.005,
        }
    }
}

impl Flow for Dadras {
    fn derivative(&self, p: DVec3) -> DVec3 {
        let DVec3 { x, y, z } = p;
        DVec3::new(
            y - self.a * x + self.b * y * z,
            self.c * y - x * z + z,
            self.d * x * y - self.e * z,
        )
    }

    fn dt(&self) -> f64 {
        self.dt
    }
}

impl FlowModel for Dadras {
    const NAME: &'static str = "dadras";

    fn project(&self, p: DVec3) -> DVec2 {
        p.truncate()
    }

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-15.0, -15.0), DVec2::new(15.0, 15.0))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(100.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Cube {
            center: DVec3::new(1.1, 2.1, -2.0),
            half: 1.0,
        }
    }

    fn params(&self) -> Value {
        json!({
            "a": self.a, "b": self.b, "c": self.c,
            "d": self.d, "e": self.e, "dt": self.dt,
        })
    }
}

/// Thomas' cyclically symmetric attractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thomas {
    pub b: f64,
    pub dt: f64,
}

impl Default for Thomas {
    fn default() -> Self {
        Self {
            b: 0.208_186,
            dt: 0.01,
        }
    }
}

impl Flow for Thomas {
    fn derivative(&self, p: DVec3) -> DVec3 {
        DVec3::new(
            p.y.sin() - self.b * p.x,
            p.z.sin() - self.b * p.y,
            p.x.sin() - self.b * p.z,
        )
    }

    fn dt(&self) -> f64 {
        self.dt
    }
}

impl FlowModel for Thomas {
    const NAME: &'static str = "thomas";

    fn project(&self, p: DVec3) -> DVec2 {
        p.truncate()
    }

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-4.5, -4.5), DVec2::new(4.5, 4.5))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(20.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Cube {
            center: DVec3::ZERO,
            half: 3.0,
        }
    }

    fn params(&self) -> Value {
        json!({"b": self.b, "dt": self.dt})
    }
}
