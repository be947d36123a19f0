//! Tracers swept around a handful of point vortices and a dipole.

use glam::{DVec2, DVec3};
use motif_core::color::{Palette, Srgb};
use motif_core::compositor::{Compositor, Projection};
use motif_core::field::{advect, AdvectMode, CompositeField, Dipole, PointVortex};
use motif_core::prng::Xorshift64;
use motif_core::sampler::golden_angle;
use motif_core::stepper::{step_elements, EscapePolicy, Reseed};
use motif_core::store::{reseed_element, Store};
use motif_core::surface::SurfaceDescriptor;
use motif_core::visual::{FrameClock, Visual};
use serde_json::{json, Value};

use crate::{bounds_for, lifespan};

/// Tracer count.
const PARTICLES: usize = 2500;
/// Number of point vortices placed at seeding.
const VORTICES: usize = 5;
/// Smoothing added to squared distances, in world units².
const EPSILON: f64 = 0.02;
/// Distance a tracer moves per frame, in world units.
const STEP: f64 = 0.004;
const FADE: f64 = 0.04;

/// Parameters for [`VortexVisual`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VortexParams {
    pub particles: usize,
    pub vortices: usize,
    pub epsilon: f64,
    pub step: f64,
    pub fade: f64,
}

impl Default for VortexParams {
    fn default() -> Self {
        Self {
            particles: PARTICLES,
            vortices: VORTICES,
            epsilon: EPSILON,
            step: STEP,
            fade: FADE,
        }
    }
}

/// Constant-speed tracers following the summed vortex/dipole velocity.
///
/// Source positions and strengths are drawn once per seeding and stay fixed;
/// tracers leaving the visible rectangle re-enter uniformly inside it.
pub struct VortexVisual {
    params: VortexParams,
    vortices: Vec<PointVortex>,
    dipole: Option<Dipole>,
    field: CompositeField,
    escape: EscapePolicy,
    reseed: Reseed,
    palette: Palette,
    store: Store,
    projection: Option<Projection>,
}

impl VortexVisual {
    pub const NAME: &'static str = "vortex";

    pub fn new(params: VortexParams) -> Self {
        Self {
            params,
            vortices: Vec::new(),
            dipole: None,
            field: CompositeField::new(),
            escape: EscapePolicy::NonFinite,
            reseed: Reseed::Point(DVec3::ZERO),
            palette: Palette::ink(),
            store: Store::empty(),
            projection: None,
        }
    }

    pub fn vortices(&self) -> &[PointVortex] {
        &self.vortices
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Default for VortexVisual {
    fn default() -> Self {
        Self::new(VortexParams::default())
    }
}

impl Visual for VortexVisual {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        let (min, max) = bounds_for(viewport);
        let inner = (max - min) * 0.4;
        let centre = (min + max) * 0.5;

        self.vortices = (0..self.params.vortices)
            .map(|i| {
                // spread over a Vogel spiral so no two vortices start on top of each other
                let jitter = DVec2::new(rng.next_signed(), rng.next_signed()) * 0.15;
                let at = centre + (golden_angle(i, self.params.vortices) + jitter) * inner;
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                PointVortex {
                    epsilon: self.params.epsilon,
                    ..PointVortex::new(at, sign * rng.next_range(0.05, 0.15))
                }
            })
            .collect();
        let dipole = Dipole {
            epsilon: self.params.epsilon,
            ..Dipole::new(
                centre + DVec2::new(rng.next_signed(), rng.next_signed()) * inner,
                DVec2::from_angle(rng.next_range(0.0, std::f64::consts::TAU)),
                rng.next_range(0.01, 0.03),
            )
        };
        self.dipole = Some(dipole);
        self.field = self
            .vortices
            .iter()
            .fold(CompositeField::new(), |f, v| f.with(*v))
            .with(dipole);

        self.escape = EscapePolicy::Bounds { min, max };
        self.reseed = Reseed::Box { min, max };
        let reseed = self.reseed;
        self.store = Store::create(self.params.particles, |_, e| e.pos = reseed.sample(rng));
        self.projection = Some(Projection::fit(min, max, viewport.width, viewport.height));
    }

    fn step(&mut self, clock: &FrameClock, rng: &mut Xorshift64) {
        let t = clock.time();
        let mode = AdvectMode::Normalized {
            step: self.params.step,
        };
        let field = &self.field;
        step_elements(&mut self.store, &self.escape, &self.reseed, rng, |_, e| {
            advect(field, e.xy(), t, mode).extend(0.0)
        });
        // tracers caught in a vortex core would otherwise circle forever
        let reseed = self.reseed;
        self.store.for_each_mut(|i, e| {
            if e.age > lifespan(i) {
                reseed_element(i, e, |_, fresh| fresh.pos = reseed.sample(rng));
            }
        });
    }

    fn paint(&self, canvas: &mut Compositor<'_>, _clock: &FrameClock) {
        let Some(proj) = self.projection else {
            return;
        };
        canvas.fade(self.params.fade);
        for (i, e) in self.store.iter().enumerate().filter(|(_, e)| e.age > 0) {
            let life = f64::from(e.age) / f64::from(lifespan(i));
            let color = self.palette.sample(1.0 - life);
            canvas.segment(proj.to_screen(e.prev_xy()), proj.to_screen(e.xy()), color, 0.5);
        }
    }

    fn release(&mut self) {
        self.store = Store::empty();
        self.vortices.clear();
        self.dipole = None;
        self.field = CompositeField::new();
        self.projection = None;
    }

    fn background(&self) -> Srgb {
        Srgb::new(0.93, 0.92, 0.88)
    }

    fn params(&self) -> Value {
        json!({
            "particles": self.params.particles,
            "epsilon": self.params.epsilon,
            "step": self.params.step,
            "fade": self.params.fade,
            "vortices": self.vortices.iter().map(|v| json!({
                "center": [v.center.x, v.center.y],
                "strength": v.strength,
            })).collect::<Vec<_>>(),
            "dipole": self.dipole.map(|d| json!({
                "center": [d.center.x, d.center.y],
                "axis": [d.axis.x, d.axis.y],
                "moment": d.moment,
            })),
            "escape": self.escape.to_json(),
        })
    }

    fn element_count(&self) -> usize {
        self.store.len()
    }
}
