//! Per-element steppers: discrete maps, explicit-Euler flows, and the
//! escape/reseed policy that keeps them bounded.
//!
//! Every stepper runs the same loop: compute the next position, move the
//! element there, and if the result escaped (or went non-finite) re-seed that
//! single element from its [`Reseed`] distribution before the next step.

use glam::{DVec2, DVec3};
use serde_json::{json, Value};

use crate::sampler::Sampler;
use crate::store::{reseed_element, Element, ElementState, Store};

/// Per-model divergence predicate.
///
/// Every variant also treats non-finite coordinates as escaped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EscapePolicy {
    /// Escaped when the position's length exceeds the radius.
    Radius(f64),
    /// Escaped when the planar position leaves the axis-aligned box.
    Bounds { min: DVec2, max: DVec2 },
    /// Escaped only on NaN or infinity.
    NonFinite,
}

impl EscapePolicy {
    pub fn escaped(&self, p: DVec3) -> bool {
        if !p.is_finite() {
            return true;
        }
        match *self {
            EscapePolicy::Radius(r) => p.length_squared() > r * r,
            EscapePolicy::Bounds { min, max } => {
                p.x < min.x || p.y < min.y || p.x > max.x || p.y > max.y
            }
            EscapePolicy::NonFinite => false,
        }
    }

    pub fn to_json(&self) -> Value {
        match *self {
            EscapePolicy::Radius(r) => json!({"kind": "radius", "radius": r}),
            EscapePolicy::Bounds { min, max } => {
                json!({"kind": "bounds", "min": [min.x, min.y], "max": [max.x, max.y]})
            }
            EscapePolicy::NonFinite => json!({"kind": "non_finite"}),
        }
    }
}

/// Per-model re-seed distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reseed {
    /// Uniform in a planar disk.
    Disk { center: DVec2, radius: f64 },
    /// Uniform on a planar circle.
    Ring { center: DVec2, radius: f64 },
    /// Uniform in a planar box.
    Box { min: DVec2, max: DVec2 },
    /// Uniform in an axis-aligned cube of half-width `half` (for 3-variable flows).
    Cube { center: DVec3, half: f64 },
    /// Always the same re-entry point.
    Point(DVec3),
}

impl Reseed {
    /// Draws a fresh position.
    pub fn sample<S: Sampler + ?Sized>(&self, sampler: &mut S) -> DVec3 {
        match *self {
            Reseed::Disk { center, radius } => sampler.in_disk(center, radius).extend(0.0),
            Reseed::Ring { center, radius } => sampler.on_ring(center, radius).extend(0.0),
            Reseed::Box { min, max } => sampler.in_box(min, max).extend(0.0),
            Reseed::Cube { center, half } => {
                let x = sampler.next_f64() * 2.0 - 1.0;
                let y = sampler.next_f64() * 2.0 - 1.0;
                let z = sampler.next_f64() * 2.0 - 1.0;
                center + DVec3::new(x, y, z) * half
            }
            Reseed::Point(p) => p,
        }
    }

    pub fn to_json(&self) -> Value {
        match *self {
            Reseed::Disk { center, radius } => {
                json!({"kind": "disk", "center": [center.x, center.y], "radius": radius})
            }
            Reseed::Ring { center, radius } => {
                json!({"kind": "ring", "center": [center.x, center.y], "radius": radius})
            }
            Reseed::Box { min, max } => {
                json!({"kind": "box", "min": [min.x, min.y], "max": [max.x, max.y]})
            }
            Reseed::Cube { center, half } => {
                json!({"kind": "cube", "center": [center.x, center.y, center.z], "half": half})
            }
            Reseed::Point(p) => json!({"kind": "point", "at": [p.x, p.y, p.z]}),
        }
    }
}

/// A two-dimensional discrete dynamical system `(x, y) -> (f(x, y), g(x, y))`.
pub trait DiscreteMap {
    fn apply(&self, p: DVec2) -> DVec2;
}

/// A three-variable continuous system integrated with explicit Euler.
pub trait Flow {
    /// Time derivative at `p`.
    fn derivative(&self, p: DVec3) -> DVec3;

    /// Fixed integration step, chosen per system for visual stability.
    fn dt(&self) -> f64;
}

/// One explicit Euler step: `p + derivative(p) * dt`.
pub fn euler_step<F: Flow + ?Sized>(flow: &F, p: DVec3) -> DVec3 {
    p + flow.derivative(p) * flow.dt()
}

/// Moves every element to `next(element)` and re-seeds the ones that escape.
///
/// Returns the number of elements re-seeded this step.
pub fn step_elements<S, F>(
    store: &mut Store,
    escape: &EscapePolicy,
    reseed: &Reseed,
    sampler: &mut S,
    next: F,
) -> usize
where
    S: Sampler + ?Sized,
    F: FnMut(usize, &Element) -> DVec3,
{
    advance_all(store, escape, reseed, sampler, None, next)
}

/// Like [`step_elements`], but an element whose step was shorter than
/// `tolerance` has converged and is re-seeded as well.
pub fn converge_elements<S, F>(
    store: &mut Store,
    tolerance: f64,
    escape: &EscapePolicy,
    reseed: &Reseed,
    sampler: &mut S,
    next: F,
) -> usize
where
    S: Sampler + ?Sized,
    F: FnMut(usize, &Element) -> DVec3,
{
    advance_all(store, escape, reseed, sampler, Some(tolerance), next)
}

/// Classifies an element that was just stepped. Escape wins over
/// convergence; anything else is still `Evolving`.
pub fn settle_state(e: &Element, escape: &EscapePolicy, tolerance: Option<f64>) -> ElementState {
    if escape.escaped(e.pos) {
        ElementState::Escaped
    } else if tolerance.is_some_and(|tol| e.pos.distance_squared(e.prev) < tol * tol) {
        ElementState::Converged
    } else {
        ElementState::Evolving
    }
}

fn advance_all<S, F>(
    store: &mut Store,
    escape: &EscapePolicy,
    reseed: &Reseed,
    sampler: &mut S,
    tolerance: Option<f64>,
    mut next: F,
) -> usize
where
    S: Sampler + ?Sized,
    F: FnMut(usize, &Element) -> DVec3,
{
    let mut escaped = 0;
    let mut converged = 0;
    store.for_each_mut(|i, e| {
        let p = next(i, e);
        e.advance_to(p);
        match settle_state(e, escape, tolerance) {
            ElementState::Escaped => escaped += 1,
            ElementState::Converged => converged += 1,
            ElementState::Seeded | ElementState::Evolving => return,
        }
        reseed_element(i, e, |_, fresh| fresh.pos = reseed.sample(sampler));
    });
    if escaped + converged > 0 {
        tracing::trace!(escaped, converged, "re-seeded elements");
    }
    escaped + converged
}

/// Applies a discrete map once to every element.
pub fn iterate_map<M, S>(
    map: &M,
    store: &mut Store,
    escape: &EscapePolicy,
    reseed: &Reseed,
    sampler: &mut S,
) -> usize
where
    M: DiscreteMap + ?Sized,
    S: Sampler + ?Sized,
{
    step_elements(store, escape, reseed, sampler, |_, e| {
        map.apply(e.xy()).extend(0.0)
    })
}

/// Integrates a flow one Euler step for every element.
pub fn integrate_flow<F, S>(
    flow: &F,
    store: &mut Store,
    escape: &EscapePolicy,
    reseed: &Reseed,
    sampler: &mut S,
) -> usize
where
    F: Flow + ?Sized,
    S: Sampler + ?Sized,
{
    step_elements(store, escape, reseed, sampler, |_, e| euler_step(flow, e.pos))
}
