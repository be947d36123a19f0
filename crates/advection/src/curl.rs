//! Tracers drifting through the curl of a slowly evolving Perlin potential.

use motif_core::color::{Palette, Srgb};
use motif_core::compositor::{BlendMode, Compositor, Projection};
use motif_core::field::{advect, AdvectMode, CurlNoise};
use motif_core::prng::Xorshift64;
use motif_core::stepper::{step_elements, EscapePolicy, Reseed};
use motif_core::store::{reseed_element, Store};
use motif_core::surface::SurfaceDescriptor;
use motif_core::visual::{FrameClock, Visual};
use serde_json::{json, Value};

use crate::{bounds_for, lifespan};

/// Parameters for [`CurlVisual`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurlParams {
    pub particles: usize,
    /// Spatial frequency of the potential.
    pub scale: f64,
    pub strength: f64,
    /// Rate at which the potential evolves.
    pub speed: f64,
    pub fade: f64,
}

impl Default for CurlParams {
    fn default() -> Self {
        Self {
            particles: 3000,
            scale: 1.6,
            strength: 1.0,
            speed: 0.15,
            fade: 0.03,
        }
    }
}

/// Divergence-free drift: tracers neither bunch up nor thin out.
pub struct CurlVisual {
    params: CurlParams,
    field: Option<CurlNoise>,
    noise_seed: u32,
    escape: EscapePolicy,
    reseed: Reseed,
    palette: Palette,
    store: Store,
    projection: Option<Projection>,
}

impl CurlVisual {
    pub const NAME: &'static str = "curl";

    pub fn new(params: CurlParams) -> Self {
        Self {
            params,
            field: None,
            noise_seed: 0,
            escape: EscapePolicy::NonFinite,
            reseed: Reseed::Point(glam::DVec3::ZERO),
            palette: Palette::aurora(),
            store: Store::empty(),
            projection: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Default for CurlVisual {
    fn default() -> Self {
        Self::new(CurlParams::default())
    }
}

impl Visual for CurlVisual {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        let (min, max) = bounds_for(viewport);
        self.noise_seed = (rng.next_u64() >> 32) as u32;
        self.field = Some(CurlNoise::new(
            self.params.scale,
            self.params.strength,
            self.params.speed,
            self.noise_seed,
        ));
        self.escape = EscapePolicy::Bounds { min, max };
        self.reseed = Reseed::Box { min, max };
        let reseed = self.reseed;
        self.store = Store::create(self.params.particles, |_, e| e.pos = reseed.sample(rng));
        self.projection = Some(Projection::fit(min, max, viewport.width, viewport.height));
    }

    fn step(&mut self, clock: &FrameClock, rng: &mut Xorshift64) {
        let Some(field) = self.field.as_ref() else {
            return;
        };
        let t = clock.time();
        let mode = AdvectMode::Scaled { dt: clock.dt() };
        step_elements(&mut self.store, &self.escape, &self.reseed, rng, |_, e| {
            advect(field, e.xy(), t, mode).extend(0.0)
        });
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
        canvas.set_blend(BlendMode::Additive);
        for (i, e) in self.store.iter().enumerate().filter(|(_, e)| e.age > 0) {
            // color bands follow the index so they survive re-seeding
            let color = self.palette.sample((i % 97) as f64 / 96.0);
            canvas.segment(proj.to_screen(e.prev_xy()), proj.to_screen(e.xy()), color, 0.25);
        }
    }

    fn release(&mut self) {
        self.store = Store::empty();
        self.field = None;
        self.projection = None;
    }

    fn background(&self) -> Srgb {
        Srgb::new(0.01, 0.02, 0.03)
    }

    fn params(&self) -> Value {
        json!({
            "particles": self.params.particles,
            "scale": self.params.scale,
            "strength": self.params.strength,
            "speed": self.params.speed,
            "fade": self.params.fade,
            "noise_seed": self.noise_seed,
            "escape": self.escape.to_json(),
        })
    }

    fn element_count(&self) -> usize {
        self.store.len()
    }
}
