//! Two-dimensional chaotic maps.
//!
//! Each model is a small `Copy` struct of coefficients with the classic
//! values as its [`Default`], plus the per-model view rectangle, escape bound
//! and re-seed distribution used by [`MapVisual`](crate::MapVisual).

use glam::DVec2;
use motif_core::stepper::{DiscreteMap, EscapePolicy, Reseed};
use serde_json::{json, Value};

/// A discrete map together with how to frame and bound it.
pub trait MapModel: DiscreteMap {
    /// Registry name of the visual built from this model.
    const NAME: &'static str;

    /// World-space rectangle `(min, max)` shown on the surface.
    fn view(&self) -> (DVec2, DVec2);

    fn escape(&self) -> EscapePolicy;

    fn reseed(&self) -> Reseed;

    /// Coefficients as a JSON object.
    fn params(&self) -> Value;
}

/// Hénon map: `x' = 1 − a x² + y`, `y' = b x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Henon {
    pub a: f64,
    pub b: f64,
}

impl Default for Henon {
    fn default() -> Self {
        Self { a: 1.4, b: 0.3 }
    }
}

impl DiscreteMap for Henon {
    fn apply(&self, p: DVec2) -> DVec2 {
        DVec2::new(1.0 - self.a * p.x * p.x + p.y, self.b * p.x)
    }
}

impl MapModel for Henon {
    const NAME: &'static str = "henon";

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-1.5, -0.45), DVec2::new(1.5, 0.45))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(4.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Disk {
            center: DVec2::ZERO,
            radius: 0.5,
        }
    }

    fn params(&self) -> Value {
        json!({"a": self.a, "b": self.b})
    }
}

/// Ikeda map of a laser cavity, `u` is the dissipation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ikeda {
    pub u: f64,
}

impl Default for Ikeda {
    fn default() -> Self {
        Self { u: 0.918 }
    }
}

impl DiscreteMap for Ikeda {
    fn apply(&self, p: DVec2) -> DVec2 {
        let t = 0.4 - 6.0 / (1.0 + p.length_squared());
        let (sin_t, cos_t) = t.sin_cos();
        DVec2::new(
            1.0 + self.u * (p.x * cos_t - p.y * sin_t),
            self.u * (p.x * sin_t + p.y * cos_t),
        )
    }
}

impl MapModel for Ikeda {
    const NAME: &'static str = "ikeda";

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-0.6, -2.5), DVec2::new(2.0, 1.0))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(20.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Disk {
            center: DVec2::new(0.5, -0.5),
            radius: 1.0,
        }
    }

    fn params(&self) -> Value {
        json!({"u": self.u})
    }
}

/// Lozi map, the piecewise-linear Hénon: `x' = 1 − a|x| + y`, `y' = b x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lozi {
    pub a: f64,
    pub b: f64,
}

impl Default for Lozi {
    fn default() -> Self {
        Self { a: 1.7, b: 0.5 }
    }
}

impl DiscreteMap for Lozi {
    fn apply(&self, p: DVec2) -> DVec2 {
        DVec2::new(1.0 - self.a * p.x.abs() + p.y, self.b * p.x)
    }
}

impl MapModel for Lozi {
    const NAME: &'static str = "lozi";

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-1.5, -0.8), DVec2::new(1.5, 0.8))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(4.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Disk {
            center: DVec2::ZERO,
            radius: 0.5,
        }
    }

    fn params(&self) -> Value {
        json!({"a": self.a, "b": self.b})
    }
}

/// Tinkerbell map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tinkerbell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for Tinkerbell {
    fn default() -> Self {
        Self {
            a: 0.9,
            b: -0.6013,
            c: 2.0,
            d: 0.5,
        }
    }
}

impl DiscreteMap for Tinkerbell {
    fn apply(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x * p.x - p.y * p.y + self.a * p.x + self.b * p.y,
            2.0 * p.x * p.y + self.c * p.x + self.d * p.y,
        )
    }
}

impl MapModel for Tinkerbell {
    const NAME: &'static str = "tinkerbell";

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-1.4, -1.7), DVec2::new(0.6, 0.7))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(4.0)
    }

    // The basin is thin, so re-entry stays close to a known orbit point.
    fn reseed(&self) -> Reseed {
        Reseed::Disk {
            center: DVec2::new(-0.72, -0.64),
            radius: 0.05,
        }
    }

    fn params(&self) -> Value {
        json!({"a": self.a, "b": self.b, "c": self.c, "d": self.d})
    }
}

/// Gingerbread-man map: `x' = 1 − y + |x|`, `y' = x`. No coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gingerbread;

impl DiscreteMap for Gingerbread {
    fn apply(&self, p: DVec2) -> DVec2 {
        DVec2::new(1.0 - p.y + p.x.abs(), p.x)
    }
}

impl MapModel for Gingerbread {
    const NAME: &'static str = "gingerbread";

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-3.5, -3.5), DVec2::new(8.0, 8.0))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(50.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Disk {
            center: DVec2::new(-0.1, 0.0),
            radius: 0.6,
        }
    }

    fn params(&self) -> Value {
        json!({})
    }
}

/// Gumowski–Mira map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GumowskiMira {
    pub a: f64,
    pub b: f64,
    pub mu: f64,
}

impl Default for GumowskiMira {
    fn default() -> Self {
        Self {
            a: 0.008,
            b: 0.05,
            mu: -0.496,
        }
    }
}

impl GumowskiMira {
    fn f(&self, x: f64) -> f64 {
        let x2 = x * x;
        self.mu * x + 2.0 * (1.0 - self.mu) * x2 / (1.0 + x2)
    }
}

impl DiscreteMap for GumowskiMira {
    fn apply(&self, p: DVec2) -> DVec2 {
        let x = p.y + self.a * (1.0 - self.b * p.y * p.y) * p.y + self.f(p.x);
        let y = -p.x + self.f(x);
        DVec2::new(x, y)
    }
}

impl MapModel for GumowskiMira {
    const NAME: &'static str = "gumowski-mira";

    fn view(&self) -> (DVec2, DVec2) {
        (DVec2::new(-20.0, -20.0), DVec2::new(20.0, 20.0))
    }

    fn escape(&self) -> EscapePolicy {
        EscapePolicy::Radius(100.0)
    }

    fn reseed(&self) -> Reseed {
        Reseed::Disk {
            center: DVec2::ZERO,
            radius: 8.0,
        }
    }

    fn params(&self) -> Value {
        json!({"a": self.a, "b": self.b, "mu": self.mu})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: DVec2, expected: DVec2) {
        assert!(
            (p - expected).length() < 1e-12,
            "expected {expected:?}, got {p:?}"
        );
    }

    #[test]
    fn henon_one_step_from_reference_point() {
        let p = Henon::default().apply(DVec2::new(0.1, 0.1));
        assert!((p.x - 1.086).abs() < 1e-12);
        assert!((p.y - 0.03).abs() < 1e-12);
    }

    #[test]
    fn lozi_uses_absolute_value() {
        let m = Lozi::default();
        assert_close(m.apply(DVec2::new(0.1, 0.1)), DVec2::new(0.93, 0.05));
        assert_close(m.apply(DVec2::new(-0.1, 0.1)), DVec2::new(0.93, -0.05));
    }

    #[test]
    fn ikeda_maps_origin_to_unit_x() {
        assert_close(Ikeda::default().apply(DVec2::ZERO), DVec2::X);
    }

    #[test]
    fn tinkerbell_reference_step() {
        let p = Tinkerbell::default().apply(DVec2::new(0.1, 0.2));
        assert_close(p, DVec2::new(-0.06026, 0.34));
    }

    #[test]
    fn gingerbread_fixed_point() {
        assert_close(Gingerbread.apply(DVec2::ONE), DVec2::ONE);
    }

    #[test]
    fn gumowski_mira_fixed_point() {
        assert_close(GumowskiMira::default().apply(DVec2::X), DVec2::X);
    }

    #[test]
    fn reseed_regions_lie_inside_escape_bounds() {
        fn check<M: MapModel>(m: M) {
            let Reseed::Disk { center, radius } = m.reseed() else {
                panic!("{} should reseed from a disk", M::NAME);
            };
            let edge = center.extend(0.0) + glam::DVec3::new(radius, 0.0, 0.0);
            assert!(!m.escape().escaped(edge), "{} reseeds outside its bound", M::NAME);
        }
        check(Henon::default());
        check(Ikeda::default());
        check(Lozi::default());
        check(Tinkerbell::default());
        check(Gingerbread);
        check(GumowskiMira::default());
    }

    #[test]
    fn henon_orbit_stays_on_attractor() {
        let m = Henon::default();
        let mut p = DVec2::new(0.1, 0.1);
        for _ in 0..10_000 {
            p = m.apply(p);
        }
        assert!(p.x.abs() < 1.5 && p.y.abs() < 0.45, "left attractor: {p:?}");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn maps_are_finite_on_bounded_inputs(x in -10.0_f64..10.0, y in -10.0_f64..10.0) {
                let p = DVec2::new(x, y);
                prop_assert!(Henon::default().apply(p).is_finite());
                prop_assert!(Ikeda::default().apply(p).is_finite());
                prop_assert!(Lozi::default().apply(p).is_finite());
                prop_assert!(Tinkerbell::default().apply(p).is_finite());
                prop_assert!(Gingerbread.apply(p).is_finite());
                prop_assert!(GumowskiMira::default().apply(p).is_finite());
            }
        }
    }
}
