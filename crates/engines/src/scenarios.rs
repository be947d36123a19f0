//! End-to-end lifecycle scenarios run against every registered visual.

use std::cell::Cell;
use std::rc::Rc;

use motif_core::color::Srgb;
use motif_core::compositor::Compositor;
use motif_core::error::EngineError;
use motif_core::lifecycle::{
    run_headless, Controller, HeadlessScheduler, LifecycleState, TickOutcome,
};
use motif_core::prng::Xorshift64;
use motif_core::seed::Seed;
use motif_core::surface::{Surface, SurfaceDescriptor};
use motif_core::visual::{FrameClock, Visual};
use serde_json::Value;

use crate::{render, VisualKind};

fn bits(surface: &Surface) -> Vec<u64> {
    surface
        .data()
        .iter()
        .flat_map(|p| [p.r.to_bits(), p.g.to_bits(), p.b.to_bits()])
        .collect()
}

fn mounted(name: &str, w: usize, h: usize, seed: u64) -> Controller<VisualKind, HeadlessScheduler> {
    let visual = VisualKind::from_name(name).unwrap();
    let mut c = Controller::new(visual, HeadlessScheduler::new(), seed);
    c.mount(SurfaceDescriptor::new(w, h)).unwrap();
    c
}

/// Counts how many wrapped visuals are currently holding seeded state, and
/// how many steps they have taken in total.
struct Tracked {
    inner: VisualKind,
    live: Rc<Cell<i64>>,
    steps: Rc<Cell<u64>>,
    seeded: bool,
}

impl Tracked {
    fn new(name: &str, live: &Rc<Cell<i64>>) -> Self {
        Self {
            inner: VisualKind::from_name(name).unwrap(),
            live: Rc::clone(live),
            steps: Rc::new(Cell::new(0)),
            seeded: false,
        }
    }

    fn counting_steps(mut self, steps: &Rc<Cell<u64>>) -> Self {
        self.steps = Rc::clone(steps);
        self
    }
}

impl Visual for Tracked {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        if !self.seeded {
            self.live.set(self.live.get() + 1);
            self.seeded = true;
        }
        self.inner.seed(viewport, rng);
    }

    fn step(&mut self, clock: &FrameClock, rng: &mut Xorshift64) {
        self.steps.set(self.steps.get() + 1);
        self.inner.step(clock, rng);
    }

    fn paint(&self, canvas: &mut Compositor<'_>, clock: &FrameClock) {
        self.inner.paint(canvas, clock);
    }

    fn release(&mut self) {
        if self.seeded {
            self.live.set(self.live.get() - 1);
            self.seeded = false;
        }
        self.inner.release();
    }

    fn background(&self) -> Srgb {
        self.inner.background()
    }

    fn params(&self) -> Value {
        self.inner.params()
    }

    fn element_count(&self) -> usize {
        self.inner.element_count()
    }
}

#[test]
fn same_seed_renders_bit_identical_frames() {
    for name in VisualKind::list_visuals() {
        let mut seed = Seed::new(name, 48, 32, 2024);
        seed.frames = 20;
        let a = render(&seed).unwrap();
        let b = render(&seed).unwrap();
        assert_eq!(a.frames, 20, "{name}");
        assert!(bits(&a.surface) == bits(&b.surface), "{name} diverged");
        assert_eq!(a.params, b.params, "{name}");
    }
}

#[test]
fn different_seeds_render_different_frames() {
    let mut a = Seed::new("vortex", 48, 32, 1);
    a.frames = 30;
    let mut b = a.clone();
    b.seed = 2;
    assert!(bits(&render(&a).unwrap().surface) != bits(&render(&b).unwrap().surface));
}

#[test]
fn element_count_is_fixed_while_running() {
    for name in VisualKind::list_visuals() {
        let mut c = mounted(name, 48, 32, 5);
        let at_mount = c.visual().element_count();
        assert!(at_mount > 0, "{name} seeded nothing");
        for _ in 0..4 {
            run_headless(&mut c, 50);
            assert_eq!(c.visual().element_count(), at_mount, "{name}");
        }
    }
}

#[test]
fn pixels_stay_finite_and_in_gamut() {
    for name in VisualKind::list_visuals() {
        let mut c = mounted(name, 40, 40, 9);
        run_headless(&mut c, 120);
        let surface = c.surface().unwrap();
        for p in surface.data() {
            for ch in [p.r, p.g, p.b] {
                assert!(ch.is_finite() && (-1e-9..=1.0 + 1e-9).contains(&ch), "{name}: {p:?}");
            }
        }
    }
}

#[test]
fn unmount_is_idempotent_and_cancels_the_frame() {
    let mut c = mounted("lorenz", 32, 32, 3);
    run_headless(&mut c, 10);
    let pending = c.pending().unwrap();

    c.unmount();
    assert_eq!(c.state(), LifecycleState::Unmounted);
    assert_eq!(c.scheduler().pending_count(), 0);
    assert!(c.surface().is_none());
    assert_eq!(c.visual().element_count(), 0);

    c.unmount();
    assert_eq!(c.state(), LifecycleState::Unmounted);
    assert_eq!(c.tick(pending), TickOutcome::Inactive);
    assert_eq!(c.scheduler().cancelled_total(), 1);
}

#[test]
fn resize_mid_run_keeps_animating() {
    for name in ["vortex", "henon", "ripple", "carpet"] {
        let mut c = mounted(name, 400, 400, 11);
        assert_eq!(run_headless(&mut c, 60), 60);

        c.resize(SurfaceDescriptor::new(800, 300)).unwrap();
        let surface = c.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (800, 300), "{name}");
        assert_eq!(c.state(), LifecycleState::Running);

        assert_eq!(run_headless(&mut c, 60), 60, "{name}");
        assert_eq!(c.clock().frame(), 120);
        assert!(c.visual().element_count() > 0);
    }
}

#[test]
fn invalid_resize_keeps_the_old_surface() {
    let mut c = mounted("curl", 64, 64, 1);
    run_headless(&mut c, 5);
    assert!(matches!(
        c.resize(SurfaceDescriptor::new(0, 64)),
        Err(EngineError::InvalidDimensions)
    ));
    assert_eq!(c.surface().map(Surface::width), Some(64));
    assert_eq!(run_headless(&mut c, 5), 5);
}

#[test]
fn mount_unmount_churn_leaks_nothing() {
    let live = Rc::new(Cell::new(0));
    let scheduler = HeadlessScheduler::new();
    let names = VisualKind::list_visuals();

    let mut controllers: Vec<_> = (0..100)
        .map(|i| {
            let visual = Tracked::new(names[i % names.len()], &live);
            Controller::new(visual, scheduler.clone(), i as u64)
        })
        .collect();
    for c in &mut controllers {
        c.mount(SurfaceDescriptor::new(24, 16)).unwrap();
    }
    assert_eq!(live.get(), 100);
    assert_eq!(scheduler.pending_count(), 100);

    // every controller sees every fired handle; only its own renders
    for _ in 0..3 {
        for handle in scheduler.take_due() {
            let rendered = controllers
                .iter_mut()
                .map(|c| c.tick(handle))
                .filter(|outcome| *outcome == TickOutcome::Rendered)
                .count();
            assert_eq!(rendered, 1);
        }
    }

    for c in controllers.iter_mut().step_by(2) {
        c.unmount();
        c.unmount();
    }
    assert_eq!(live.get(), 50);

    drop(controllers);
    assert_eq!(live.get(), 0);
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(scheduler.requested_total(), 400);
}

#[test]
fn immediate_unmount_churn_never_steps() {
    let live = Rc::new(Cell::new(0));
    let steps = Rc::new(Cell::new(0));
    let scheduler = HeadlessScheduler::new();
    let names = VisualKind::list_visuals();

    let mut handles = Vec::new();
    let mut controllers: Vec<_> = (0..100)
        .map(|i| {
            let visual = Tracked::new(names[i % names.len()], &live).counting_steps(&steps);
            let mut c = Controller::new(visual, scheduler.clone(), i as u64);
            c.mount(SurfaceDescriptor::new(24, 16)).unwrap();
            handles.extend(c.pending());
            c.unmount();
            c
        })
        .collect();
    assert_eq!(handles.len(), 100);
    assert!(handles.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(scheduler.cancelled_total(), 100);

    // late deliveries of every cancelled frame, to every instance
    for &handle in &handles {
        for c in &mut controllers {
            assert_eq!(c.tick(handle), TickOutcome::Inactive);
        }
    }
    assert_eq!(steps.get(), 0);
    assert_eq!(live.get(), 0);
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(scheduler.requested_total(), 100);
}

#[test]
fn run_headless_on_a_shared_queue_keeps_siblings_alive() {
    let scheduler = HeadlessScheduler::new();
    let mut a = Controller::new(VisualKind::from_name("lorenz").unwrap(), scheduler.clone(), 1);
    let mut b = Controller::new(VisualKind::from_name("ripple").unwrap(), scheduler.clone(), 2);
    a.mount(SurfaceDescriptor::new(32, 32)).unwrap();
    b.mount(SurfaceDescriptor::new(32, 32)).unwrap();

    assert_eq!(run_headless(&mut a, 5), 5);
    assert_eq!(b.clock().frame(), 0);
    assert_eq!(run_headless(&mut b, 5), 5);
    assert_eq!(run_headless(&mut a, 5), 5);
    assert_eq!((a.clock().frame(), b.clock().frame()), (10, 5));
    assert_eq!(scheduler.pending_count(), 2);
}

#[test]
fn remount_after_unmount_starts_fresh() {
    let live = Rc::new(Cell::new(0));
    let mut c = Controller::new(Tracked::new("ikeda", &live), HeadlessScheduler::new(), 8);
    for _ in 0..5 {
        c.mount(SurfaceDescriptor::new(32, 32)).unwrap();
        run_headless(&mut c, 3);
        assert_eq!(live.get(), 1);
        c.unmount();
        assert_eq!(live.get(), 0);
    }
    assert_eq!(c.scheduler().pending_count(), 0);
}

#[test]
fn failed_mount_then_unmount_is_quiet() {
    let live = Rc::new(Cell::new(0));
    let mut c = Controller::new(Tracked::new("theta", &live), HeadlessScheduler::new(), 1);
    assert!(matches!(
        c.mount(SurfaceDescriptor::new(0, 10)),
        Err(EngineError::InvalidDimensions)
    ));
    assert_eq!(c.state(), LifecycleState::Failed);
    assert!(c.pending().is_none());
    assert_eq!(c.scheduler().requested_total(), 0);
    assert_eq!(live.get(), 0);

    c.unmount();
    c.unmount();
    assert_eq!(c.state(), LifecycleState::Unmounted);
    assert_eq!(live.get(), 0);
}

#[test]
fn resize_after_failed_mount_recovers() {
    let mut c = Controller::new(
        VisualKind::from_name("soliton").unwrap(),
        HeadlessScheduler::new(),
        4,
    );
    assert!(c.mount(SurfaceDescriptor::new(10, 0)).is_err());
    c.resize(SurfaceDescriptor::new(40, 20)).unwrap();
    assert_eq!(c.state(), LifecycleState::Running);
    assert_eq!(run_headless(&mut c, 4), 4);
}
