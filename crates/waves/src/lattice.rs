//! Closed-form scalar fields painted as a lattice of cells.
//!
//! Each cell is one store element positioned at its world-space centre.
//! Every frame its intensity is recomputed from the field at the current
//! time and mapped from `[-1, 1]` into `[0, 1]`.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use motif_core::color::{Palette, Srgb};
use motif_core::compositor::{Compositor, Projection};
use motif_core::prng::Xorshift64;
use motif_core::store::Store;
use motif_core::surface::SurfaceDescriptor;
use motif_core::visual::{FrameClock, Visual};
use serde_json::{json, Value};

use crate::special::{airy_ai, bessel_j0, bessel_j1, jacobi_theta3};

/// Cell edge in pixels.
pub const CELL: usize = 6;

/// A scalar field of space and time with values in `[-1, 1]`.
pub trait WaveField {
    const NAME: &'static str;

    /// Draws any per-instance constants. `aspect` is width over height.
    fn seed(&mut self, aspect: f64, rng: &mut Xorshift64);

    fn value(&self, p: DVec2, t: f64) -> f64;

    fn palette(&self) -> Palette;

    fn params(&self) -> Value;

    /// Optional strokes drawn over the cells.
    fn overlay(&self, _canvas: &mut Compositor<'_>, _proj: &Projection, _t: f64) {}
}

/// Renders a [`WaveField`] on a `CELL`-pixel grid.
pub struct LatticeVisual<W: WaveField> {
    field: W,
    palette: Palette,
    cols: usize,
    store: Store,
    projection: Option<Projection>,
    time: f64,
}

impl<W: WaveField> LatticeVisual<W> {
    pub fn new(field: W) -> Self {
        Self {
            palette: field.palette(),
            field,
            cols: 0,
            store: Store::empty(),
            projection: None,
            time: 0.0,
        }
    }

    pub fn field(&self) -> &W {
        &self.field
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl<W: WaveField + Default> Default for LatticeVisual<W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}

impl<W: WaveField> Visual for LatticeVisual<W> {
    fn name(&self) -> &'static str {
        W::NAME
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        let aspect = viewport.aspect();
        self.field.seed(aspect, rng);
        let min = DVec2::new(-aspect, -1.0);
        let max = DVec2::new(aspect, 1.0);
        let proj = Projection::fit(min, max, viewport.width, viewport.height);

        let cols = viewport.width.div_ceil(CELL);
        let rows = viewport.height.div_ceil(CELL);
        self.cols = cols;
        self.store = Store::create(cols * rows, |i, e| {
            let (col, row) = (i % cols, i / cols);
            let centre = DVec2::new((col * CELL) as f64, (row * CELL) as f64) + CELL as f64 * 0.5;
            e.pos = proj.to_world(centre).extend(0.0);
            e.intensity = 0.5;
        });
        self.projection = Some(proj);
        self.time = 0.0;
    }

    fn step(&mut self, clock: &FrameClock, _rng: &mut Xorshift64) {
        let t = clock.time();
        let field = &self.field;
        self.store.for_each_mut(|_, e| {
            e.intensity = 0.5 + 0.5 * field.value(e.xy(), t).clamp(-1.0, 1.0);
            e.age = e.age.saturating_add(1);
        });
        self.time = t;
    }

    fn paint(&self, canvas: &mut Compositor<'_>, _clock: &FrameClock) {
        let Some(proj) = self.projection else {
            return;
        };
        let size = DVec2::splat(CELL as f64);
        for (i, e) in self.store.iter().enumerate() {
            let origin = DVec2::new(((i % self.cols) * CELL) as f64, ((i / self.cols) * CELL) as f64);
            let color = self.palette.sample(e.intensity);
            canvas.cell(origin, size, color, 1.0);
        }
        self.field.overlay(canvas, &proj, self.time);
    }

    fn release(&mut self) {
        self.store = Store::empty();
        self.projection = None;
    }

    fn params(&self) -> Value {
        json!({"field": self.field.params(), "cell": CELL})
    }

    fn element_count(&self) -> usize {
        self.store.len()
    }
}

/// One drum-head source: a standing `J0` mode plus a rotating `J1` mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drum {
    pub center: DVec2,
    /// Radial wavenumber.
    pub k: f64,
    /// Angular frequency.
    pub omega: f64,
    pub phase: f64,
}

/// Interfering Bessel drum modes.
#[derive(Debug, Clone, PartialEq)]
pub struct Ripple {
    pub sources: usize,
    drums: Vec<Drum>,
}

impl Default for Ripple {
    fn default() -> Self {
        Self {
            sources: 3,
            drums: Vec::new(),
        }
    }
}

impl Ripple {
    pub fn drums(&self) -> &[Drum] {
        &self.drums
    }
}

impl WaveField for Ripple {
    const NAME: &'static str = "ripple";

    fn seed(&mut self, aspect: f64, rng: &mut Xorshift64) {
        self.drums = (0..self.sources)
            .map(|_| Drum {
                center: DVec2::new(rng.next_signed() * aspect * 0.7, rng.next_signed() * 0.7),
                k: rng.next_range(8.0, 18.0),
                omega: rng.next_range(1.0, 3.0),
                phase: rng.next_range(0.0, TAU),
            })
            .collect();
    }

    fn value(&self, p: DVec2, t: f64) -> f64 {
        if self.drums.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .drums
            .iter()
            .map(|d| {
                let r = p - d.center;
                let kr = d.k * r.length();
                let theta = r.y.atan2(r.x);
                bessel_j0(kr) * (d.omega * t + d.phase).cos()
                    + 0.5 * bessel_j1(kr) * (theta - d.omega * t).cos()
            })
            .sum();
        sum / self.drums.len() as f64
    }

    fn palette(&self) -> Palette {
        Palette::ocean()
    }

    fn params(&self) -> Value {
        json!({
            "drums": self.drums.iter().map(|d| json!({
                "center": [d.center.x, d.center.y],
                "k": d.k,
                "omega": d.omega,
                "phase": d.phase,
            })).collect::<Vec<_>>(),
        })
    }

    /// Rings at the first zero of `J0`, pulsing with each drum.
    fn overlay(&self, canvas: &mut Compositor<'_>, proj: &Projection, t: f64) {
        const J0_FIRST_ZERO: f64 = 2.404_825_557_695_773;
        for d in &self.drums {
            let pulse = 0.5 + 0.5 * (d.omega * t + d.phase).cos();
            let radius = J0_FIRST_ZERO / d.k * proj.scale();
            canvas.arc(proj.to_screen(d.center), radius, 0.0, TAU, Srgb::WHITE, 0.2 + 0.3 * pulse);
        }
    }
}

/// Fold caustic: `Ai` across a gently swaying fold line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Caustic {
    /// Spatial scale of the Airy argument.
    pub scale: f64,
    pub sway: f64,
    pub tilt: f64,
}

impl Default for Caustic {
    fn default() -> Self {
        Self {
            scale: 6.0,
            sway: 0.25,
            tilt: 0.0,
        }
    }
}

/// Largest value of `Ai`, reached near `x ≈ −1.0188`.
const AIRY_PEAK: f64 = 0.535_656_656_015_7;

impl WaveField for Caustic {
    const NAME: &'static str = "caustic";

    fn seed(&mut self, _aspect: f64, rng: &mut Xorshift64) {
        self.tilt = rng.next_range(-0.3, 0.3);
    }

    fn value(&self, p: DVec2, t: f64) -> f64 {
        let fold = self.tilt * p.x + self.sway * (2.0 * p.x + 0.7 * t).sin();
        let s = self.scale * (p.y - fold);
        airy_ai(s) / AIRY_PEAK
    }

    fn palette(&self) -> Palette {
        Palette::ember()
    }

    fn params(&self) -> Value {
        json!({"scale": self.scale, "sway": self.sway, "tilt": self.tilt})
    }
}

/// Theta-function interference: nome varies down the surface, phase drifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theta {
    pub q_min: f64,
    pub q_max: f64,
    pub drift: f64,
}

impl Default for Theta {
    fn default() -> Self {
        Self {
            q_min: 0.05,
            q_max: 0.7,
            drift: 0.3,
        }
    }
}

impl WaveField for Theta {
    const NAME: &'static str = "theta";

    fn seed(&mut self, _aspect: f64, _rng: &mut Xorshift64) {}

    fn value(&self, p: DVec2, t: f64) -> f64 {
        let q = self.q_min + (self.q_max - self.q_min) * (0.5 + 0.5 * p.y.clamp(-1.0, 1.0));
        // θ₃ over one period spans [θ₃(π/2), θ₃(0)]
        let hi = jacobi_theta3(0.0, q);
        let lo = jacobi_theta3(0.5 * PI, q);
        let v = jacobi_theta3(0.5 * PI * p.x + self.drift * t, q);
        2.0 * (v - lo) / (hi - lo) - 1.0
    }

    fn palette(&self) -> Palette {
        Palette::aurora()
    }

    fn params(&self) -> Value {
        json!({"q_min": self.q_min, "q_max": self.q_max, "drift": self.drift})
    }
}
