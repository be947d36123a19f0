//! The `Visual` trait every generative piece implements.
//!
//! The trait is object-safe so a host can hold `Box<dyn Visual>` when it
//! chooses visuals at runtime. A visual owns its simulation state and never
//! touches scheduling or surface allocation; the
//! [`Controller`](crate::lifecycle::Controller) calls into it.

use serde_json::Value;

use crate::color::Srgb;
use crate::compositor::Compositor;
use crate::prng::Xorshift64;
use crate::surface::SurfaceDescriptor;

/// Simulated seconds per frame.
pub const FRAME_DT: f64 = 1.0 / 60.0;

/// Frame counter and simulated time handed to `step` and `paint`.
///
/// Time advances by a fixed [`FRAME_DT`] per rendered frame, never by wall
/// clock, so two runs with the same seed see identical time values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameClock {
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered before the current one.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Elapsed simulated seconds.
    pub fn time(&self) -> f64 {
        self.frame as f64 * FRAME_DT
    }

    pub fn dt(&self) -> f64 {
        FRAME_DT
    }

    pub fn advance(&mut self) {
        self.frame += 1;
    }
}

/// A time-driven animation rendered onto a raster surface.
pub trait Visual {
    /// Registry name, e.g. `"henon"`.
    fn name(&self) -> &'static str;

    /// Builds all simulation state for a freshly acquired surface.
    ///
    /// Called once per mount. `rng` is the only entropy available.
    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64);

    /// Advances the simulation by one frame.
    fn step(&mut self, clock: &FrameClock, rng: &mut Xorshift64);

    /// Draws the current state over the previous frame's pixels.
    fn paint(&self, canvas: &mut Compositor<'_>, clock: &FrameClock);

    /// Adapts to a new surface size. Reseeds from scratch unless overridden.
    fn resize(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        self.seed(viewport, rng);
    }

    /// Drops simulation state at teardown.
    fn release(&mut self) {}

    /// Color the surface is cleared and faded toward.
    fn background(&self) -> Srgb {
        Srgb::BLACK
    }

    /// Current model parameters as a JSON object.
    fn params(&self) -> Value;

    /// Number of live simulation elements (0 before seeding).
    fn element_count(&self) -> usize;
}

impl<T: Visual + ?Sized> Visual for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        (**self).seed(viewport, rng)
    }

    fn step(&mut self, clock: &FrameClock, rng: &mut Xorshift64) {
        (**self).step(clock, rng)
    }

    fn paint(&self, canvas: &mut Compositor<'_>, clock: &FrameClock) {
        (**self).paint(canvas, clock)
    }

    fn resize(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        (**self).resize(viewport, rng)
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn background(&self) -> Srgb {
        (**self).background()
    }

    fn params(&self) -> Value {
        (**self).params()
    }

    fn element_count(&self) -> usize {
        (**self).element_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;
    use glam::DVec2;
    use serde_json::json;

    /// Minimal visual used to verify trait object safety.
    struct Dot {
        pos: Option<DVec2>,
        steps: usize,
    }

    impl Visual for Dot {
        fn name(&self) -> &'static str {
            "dot"
        }

        fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
            self.pos = Some(DVec2::new(
                rng.next_f64() * viewport.width as f64,
                rng.next_f64() * viewport.height as f64,
            ));
        }

        fn step(&mut self, _clock: &FrameClock, _rng: &mut Xorshift64) {
            self.steps += 1;
        }

        fn paint(&self, canvas: &mut Compositor<'_>, _clock: &FrameClock) {
            if let Some(p) = self.pos {
                canvas.point(p, Srgb::WHITE, 1.0);
            }
        }

        fn release(&mut self) {
            self.pos = None;
        }

        fn params(&self) -> Value {
            json!({"steps": self.steps})
        }

        fn element_count(&self) -> usize {
            usize::from(self.pos.is_some())
        }
    }

    fn dot() -> Dot {
        Dot { pos: None, steps: 0 }
    }

    #[test]
    fn clock_advances_in_fixed_steps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.time(), 0.0);
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.frame(), 60);
        assert!((clock.time() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn visual_trait_is_object_safe() {
        let mut v: Box<dyn Visual> = Box::new(dot());
        let mut rng = Xorshift64::new(1);
        v.seed(SurfaceDescriptor::new(8, 8), &mut rng);
        assert_eq!(v.name(), "dot");
        assert_eq!(v.element_count(), 1);
    }

    #[test]
    fn default_resize_reseeds() {
        let mut v = dot();
        let mut rng = Xorshift64::new(7);
        v.seed(SurfaceDescriptor::new(4, 4), &mut rng);
        v.resize(SurfaceDescriptor::new(1000, 1000), &mut rng);
        assert_eq!(v.element_count(), 1);
        assert_ne!(v.pos, None);
    }

    #[test]
    fn boxed_visual_delegates_paint_and_params() {
        let mut v: Box<dyn Visual> = Box::new(dot());
        let mut rng = Xorshift64::new(3);
        let clock = FrameClock::new();
        v.seed(SurfaceDescriptor::new(4, 4), &mut rng);
        v.step(&clock, &mut rng);

        let mut s = Surface::new(4, 4, v.background()).unwrap();
        let mut c = Compositor::new(&mut s);
        v.paint(&mut c, &clock);
        assert_eq!(c.touched(), 1);
        assert_eq!(v.params()["steps"], 1);
    }

    #[test]
    fn release_drops_state() {
        let mut v = dot();
        v.seed(SurfaceDescriptor::new(4, 4), &mut Xorshift64::new(1));
        v.release();
        assert_eq!(v.element_count(), 0);
    }
}
