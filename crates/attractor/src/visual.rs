//! Visuals that draw orbit clouds, Newton walkers and projected flows.

use glam::DVec2;
use motif_core::color::{Palette, Srgb};
use motif_core::compositor::{BlendMode, Compositor, Projection};
use motif_core::prng::Xorshift64;
use motif_core::sampler::HaltonSampler;
use motif_core::stepper::{
    converge_elements, integrate_flow, iterate_map, DiscreteMap, EscapePolicy, Reseed,
};
use motif_core::store::Store;
use motif_core::surface::SurfaceDescriptor;
use motif_core::visual::{FrameClock, Visual};
use serde_json::{json, Value};

use crate::flows::FlowModel;
use crate::maps::MapModel;
use crate::newton::NewtonCubic;

const MAP_COUNT: usize = 4000;
const FLOW_COUNT: usize = 600;
const NEWTON_COUNT: usize = 1500;

/// Per-frame background overlay opacity.
const MAP_FADE: f64 = 0.06;
const FLOW_FADE: f64 = 0.02;
const NEWTON_FADE: f64 = 0.03;

/// How quickly trap intensity relaxes toward the current distance weight.
const TRAP_SMOOTHING: f64 = 0.15;

/// Background shared by the attractor visuals.
const NIGHT: Srgb = Srgb::new(0.02, 0.02, 0.04);

/// Seeds a store from a Halton sequence whose starting index comes from `rng`.
///
/// Even coverage of the seed region makes the first frames less clumpy than
/// uniform random scatter.
fn halton_store(count: usize, reseed: &Reseed, rng: &mut Xorshift64) -> Store {
    let mut halton = HaltonSampler::starting_at(1 + rng.next_u64() % 4096);
    Store::create(count, |i, e| {
        e.pos = reseed.sample(&mut halton);
        e.phase = i as f64 / count.max(1) as f64;
    })
}

fn fit(view: (DVec2, DVec2), viewport: SurfaceDescriptor) -> Projection {
    Projection::fit(view.0, view.1, viewport.width, viewport.height)
}

/// Circular region of the plane that lights up orbits passing near it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitTrap {
    pub center: DVec2,
    pub radius: f64,
}

impl OrbitTrap {
    /// 1 at the centre, falling off as a Gaussian of distance.
    pub fn weight(&self, p: DVec2) -> f64 {
        let d = p.distance(self.center) / self.radius;
        (-d * d).exp()
    }
}

/// Point cloud of many independent orbits of a discrete map.
pub struct MapVisual<M: MapModel> {
    model: M,
    escape: EscapePolicy,
    reseed: Reseed,
    trap: OrbitTrap,
    palette: Palette,
    count: usize,
    store: Store,
    projection: Option<Projection>,
}

impl<M: MapModel> MapVisual<M> {
    pub fn new(model: M) -> Self {
        let (min, max) = model.view();
        Self {
            escape: model.escape(),
            reseed: model.reseed(),
            trap: OrbitTrap {
                center: (min + max) * 0.5,
                radius: (max - min).min_element() * 0.25,
            },
            model,
            palette: Palette::ember(),
            count: MAP_COUNT,
            store: Store::empty(),
            projection: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl<M: MapModel + Default> Default for MapVisual<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: MapModel> Visual for MapVisual<M> {
    fn name(&self) -> &'static str {
        M::NAME
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        self.store = halton_store(self.count, &self.reseed, rng);
        self.projection = Some(fit(self.model.view(), viewport));
    }

    fn step(&mut self, _clock: &FrameClock, rng: &mut Xorshift64) {
        iterate_map(&self.model, &mut self.store, &self.escape, &self.reseed, rng);
        let trap = self.trap;
        self.store.for_each_mut(|_, e| {
            let w = trap.weight(e.xy());
            e.intensity += (w - e.intensity) * TRAP_SMOOTHING;
        });
    }

    fn paint(&self, canvas: &mut Compositor<'_>, _clock: &FrameClock) {
        let Some(proj) = self.projection else {
            return;
        };
        canvas.fade(MAP_FADE);
        canvas.set_blend(BlendMode::Additive);
        for e in self.store.iter().filter(|e| e.age > 0) {
            let color = self.palette.sample(0.25 + 0.75 * e.intensity);
            canvas.point(proj.to_screen(e.xy()), color, 0.35);
        }
    }

    fn release(&mut self) {
        self.store = Store::empty();
        self.projection = None;
    }

    fn background(&self) -> Srgb {
        NIGHT
    }

    fn params(&self) -> Value {
        json!({
            "model": self.model.params(),
            "count": self.count,
            "escape": self.escape.to_json(),
            "reseed": self.reseed.to_json(),
            "trap": {"center": [self.trap.center.x, self.trap.center.y], "radius": self.trap.radius},
            "fade": MAP_FADE,
        })
    }

    fn element_count(&self) -> usize {
        self.store.len()
    }
}

/// Walkers following damped Newton steps toward the cube roots of unity.
pub struct NewtonVisual {
    newton: NewtonCubic,
    escape: EscapePolicy,
    reseed: Reseed,
    palette: Palette,
    count: usize,
    store: Store,
    projection: Option<Projection>,
}

impl NewtonVisual {
    pub const NAME: &'static str = "newton";

    pub fn new(newton: NewtonCubic) -> Self {
        Self {
            newton,
            escape: EscapePolicy::Radius(4.0),
            reseed: Reseed::Box {
                min: DVec2::splat(-2.0),
                max: DVec2::splat(2.0),
            },
            palette: Palette::aurora(),
            count: NEWTON_COUNT,
            store: Store::empty(),
            projection: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Default for NewtonVisual {
    fn default() -> Self {
        Self::new(NewtonCubic::default())
    }
}

impl Visual for NewtonVisual {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        self.store = halton_store(self.count, &self.reseed, rng);
        self.projection = Some(fit(
            (DVec2::splat(-2.0), DVec2::splat(2.0)),
            viewport,
        ));
    }

    fn step(&mut self, _clock: &FrameClock, rng: &mut Xorshift64) {
        let newton = self.newton;
        converge_elements(
            &mut self.store,
            newton.tolerance,
            &self.escape,
            &self.reseed,
            rng,
            |_, e| newton.apply(e.xy()).extend(0.0),
        );
        self.store.for_each_mut(|_, e| {
            e.intensity = NewtonCubic::basin(e.xy()) as f64 / 2.0;
        });
    }

    fn paint(&self, canvas: &mut Compositor<'_>, _clock: &FrameClock) {
        let Some(proj) = self.projection else {
            return;
        };
        canvas.fade(NEWTON_FADE);
        canvas.set_blend(BlendMode::Over);
        for e in self.store.iter().filter(|e| e.age > 0) {
            let color = self.palette.sample(0.3 + 0.7 * e.intensity);
            canvas.segment(
                proj.to_screen(e.prev_xy()),
                proj.to_screen(e.xy()),
                color,
                0.6,
            );
        }
    }

    fn release(&mut self) {
        self.store = Store::empty();
        self.projection = None;
    }

    fn background(&self) -> Srgb {
        NIGHT
    }

    fn params(&self) -> Value {
        json!({
            "newton": self.newton.params(),
            "count": self.count,
            "escape": self.escape.to_json(),
            "reseed": self.reseed.to_json(),
            "fade": NEWTON_FADE,
        })
    }

    fn element_count(&self) -> usize {
        self.store.len()
    }
}

/// Euler-integrated particles drawn as short projected segments.
pub struct FlowVisual<F: FlowModel> {
    flow: F,
    escape: EscapePolicy,
    reseed: Reseed,
    palette: Palette,
    count: usize,
    store: Store,
    projection: Option<Projection>,
}

impl<F: FlowModel> FlowVisual<F> {
    pub fn new(flow: F) -> Self {
        Self {
            escape: flow.escape(),
            reseed: flow.reseed(),
            flow,
            palette: Palette::ocean(),
            count: FLOW_COUNT,
            store: Store::empty(),
            projection: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl<F: FlowModel + Default> Default for FlowVisual<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: FlowModel> Visual for FlowVisual<F> {
    fn name(&self) -> &'static str {
        F::NAME
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        let reseed = self.reseed;
        let count = self.count;
        self.store = Store::create(count, |i, e| {
            e.pos = reseed.sample(rng);
            e.phase = i as f64 / count.max(1) as f64;
        });
        self.projection = Some(fit(self.flow.view(), viewport));
    }

    fn step(&mut self, _clock: &FrameClock, rng: &mut Xorshift64) {
        integrate_flow(&self.flow, &mut self.store, &self.escape, &self.reseed, rng);
    }

    fn paint(&self, canvas: &mut Compositor<'_>, clock: &FrameClock) {
        let Some(proj) = self.projection else {
            return;
        };
        canvas.fade(FLOW_FADE);
        canvas.set_blend(BlendMode::Additive);
        // slow hue drift across the element population
        let drift = (clock.time() * 0.05).fract();
        for e in self.store.iter().filter(|e| e.age > 0) {
            let color = self.palette.sample((e.phase + drift).fract());
            canvas.segment(
                proj.to_screen(self.flow.project(e.prev)),
                proj.to_screen(self.flow.project(e.pos)),
                color,
                0.4,
            );
        }
    }

    fn release(&mut self) {
        self.store = Store::empty();
        self.projection = None;
    }

    fn background(&self) -> Srgb {
        NIGHT
    }

    fn params(&self) -> Value {
        json!({
            "flow": self.flow.params(),
            "count": self.count,
            "escape": self.escape.to_json(),
            "reseed": self.reseed.to_json(),
            "fade": FLOW_FADE,
        })
    }

    fn element_count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::{Lorenz, Thomas};
    use crate::maps::{Henon, Tinkerbell};
    use glam::DVec3;
    use motif_core::surface::Surface;

    fn viewport() -> SurfaceDescriptor {
        SurfaceDescriptor::new(64, 48)
    }

    fn run<V: Visual>(v: &mut V, frames: usize, seed: u64) -> Surface {
        let mut rng = Xorshift64::new(seed);
        let mut surface = Surface::new(64, 48, v.background()).unwrap();
        let mut clock = FrameClock::new();
        v.seed(viewport(), &mut rng);
        for _ in 0..frames {
            v.step(&clock, &mut rng);
            let mut c = Compositor::new(&mut surface);
            v.paint(&mut c, &clock);
            clock.advance();
        }
        surface
    }

    #[test]
    fn single_henon_element_follows_reference_step() {
        let mut v = MapVisual::new(Henon::default()).with_count(1);
        let mut rng = Xorshift64::new(1);
        v.seed(viewport(), &mut rng);
        v.store.reset(0, |_, e| e.pos = DVec3::new(0.1, 0.1, 0.0));
        v.step(&FrameClock::new(), &mut rng);
        let e = v.store().get(0).unwrap();
        assert!((e.pos.x - 1.086).abs() < 1e-12);
        assert!((e.pos.y - 0.03).abs() < 1e-12);
        assert_eq!(e.prev, DVec3::new(0.1, 0.1, 0.0));
    }

    #[test]
    fn map_elements_stay_inside_escape_bound() {
        let mut v = MapVisual::new(Tinkerbell::default()).with_count(300);
        run(&mut v, 200, 9);
        let escape = v.model().escape();
        assert_eq!(v.element_count(), 300);
        assert!(v.store().iter().all(|e| !escape.escaped(e.pos)));
    }

    #[test]
    fn trap_weight_peaks_at_centre() {
        let trap = OrbitTrap {
            center: DVec2::ZERO,
            radius: 1.0,
        };
        assert_eq!(trap.weight(DVec2::ZERO), 1.0);
        assert!(trap.weight(DVec2::X) < trap.weight(DVec2::X * 0.5));
    }

    #[test]
    fn map_visual_paints_something() {
        let mut v = MapVisual::new(Henon::default()).with_count(500);
        let s = run(&mut v, 30, 3);
        assert!(s.mean_luminance() > NIGHT.luminance());
    }

    #[test]
    fn newton_walkers_never_leave_the_plane_window() {
        let mut v = NewtonVisual::default().with_count(200);
        run(&mut v, 120, 4);
        assert_eq!(v.element_count(), 200);
        for e in v.store().iter() {
            assert!(e.pos.is_finite());
            assert!(e.xy().length() <= 4.0);
        }
    }

    #[test]
    fn newton_intensity_tracks_nearest_root() {
        let mut v = NewtonVisual::default().with_count(50);
        run(&mut v, 10, 6);
        for e in v.store().iter() {
            let expected = NewtonCubic::basin(e.xy()) as f64 / 2.0;
            assert_eq!(e.intensity, expected);
        }
    }

    #[test]
    fn flow_store_size_is_fixed() {
        let mut v = FlowVisual::new(Lorenz::default()).with_count(50);
        run(&mut v, 300, 11);
        assert_eq!(v.element_count(), 50);
        assert!(v.store().iter().all(|e| e.pos.is_finite()));
    }

    #[test]
    fn same_seed_gives_identical_flow_pixels() {
        let mut a = FlowVisual::new(Thomas::default()).with_count(40);
        let mut b = FlowVisual::new(Thomas::default()).with_count(40);
        let sa = run(&mut a, 50, 77);
        let sb = run(&mut b, 50, 77);
        assert!(sa
            .data()
            .iter()
            .zip(sb.data())
            .all(|(x, y)| x.r.to_bits() == y.r.to_bits() && x.b.to_bits() == y.b.to_bits()));
    }

    #[test]
    fn release_empties_the_store() {
        let mut v = FlowVisual::new(Lorenz::default()).with_count(10);
        run(&mut v, 1, 1);
        v.release();
        assert_eq!(v.element_count(), 0);
    }

    #[test]
    fn params_report_model_and_policies() {
        let v = MapVisual::new(Henon::default());
        let p = v.params();
        assert_eq!(p["model"]["a"], 1.4);
        assert_eq!(p["escape"]["kind"], "radius");
        assert_eq!(p["count"], MAP_COUNT);
    }
}
