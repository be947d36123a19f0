//! Mount/tick/resize/unmount state machine for one visual instance.
//!
//! A [`Controller`] owns a visual, its surface, its PRNG and the handle of
//! the one frame it has scheduled. The host fires frames through a
//! [`FrameScheduler`]; the controller only honours the handle it is waiting
//! on, so a frame delivered after `unmount` (or a duplicate delivery) never
//! steps or paints.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::color::Srgb;
use crate::compositor::Compositor;
use crate::error::EngineError;
use crate::prng::Xorshift64;
use crate::surface::{Surface, SurfaceDescriptor};
use crate::visual::{FrameClock, Visual};

/// Opaque token for one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

/// Host-side source of animation frames.
pub trait FrameScheduler {
    /// Schedules one frame callback and returns its handle.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraws a scheduled frame. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct FrameQueue {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

/// In-memory scheduler for tests and offline rendering.
///
/// Clones share one queue, so several controllers can interleave on it the
/// way several mounted pieces share a browser's frame callbacks. The host
/// decides when a frame "fires" by calling [`HeadlessScheduler::take_due`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessScheduler {
    queue: Rc<RefCell<FrameQueue>>,
}

impl HeadlessScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every scheduled handle, oldest first.
    pub fn take_due(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.queue.borrow_mut().pending)
            .into_iter()
            .collect()
    }

    /// Removes one scheduled handle so it can be fired on its own. Returns
    /// false if the handle was not pending.
    pub fn take(&self, handle: FrameHandle) -> bool {
        self.queue.borrow_mut().pending.remove(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.queue.borrow().pending.contains(&handle)
    }

    /// Total frames ever requested through this queue.
    pub fn requested_total(&self) -> u64 {
        self.queue.borrow().requested
    }

    /// Total pending frames withdrawn through this queue.
    pub fn cancelled_total(&self) -> u64 {
        self.queue.borrow().cancelled
    }
}

impl FrameScheduler for HeadlessScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut q = self.queue.borrow_mut();
        let handle = FrameHandle(q.next_id);
        q.next_id += 1;
        q.requested += 1;
        q.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut q = self.queue.borrow_mut();
        if q.pending.remove(&handle) {
            q.cancelled += 1;
        }
    }
}

/// Hands out drawing surfaces.
pub trait SurfaceProvider {
    fn acquire(
        &mut self,
        viewport: SurfaceDescriptor,
        background: Srgb,
    ) -> Result<Surface, EngineError>;

    /// Takes back a surface the controller no longer uses.
    fn release(&mut self, _surface: Surface) {}
}

/// Allocates plain in-memory rasters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterProvider;

impl SurfaceProvider for RasterProvider {
    fn acquire(
        &mut self,
        viewport: SurfaceDescriptor,
        background: Srgb,
    ) -> Result<Surface, EngineError> {
        Surface::new(viewport.width, viewport.height, background)
    }
}

/// Where a controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, not yet mounted.
    Idle,
    /// Mounted with a frame scheduled.
    Running,
    /// Mount failed; nothing is scheduled and nothing renders.
    Failed,
    /// Torn down.
    Unmounted,
}

/// Result of delivering a frame to [`Controller::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The visual stepped and painted, and the next frame is scheduled.
    Rendered,
    /// The handle is not the one this controller is waiting on.
    Stale,
    /// The controller is not running.
    Inactive,
}

/// Drives one visual from mount to unmount.
pub struct Controller<V, S, P = RasterProvider>
where
    V: Visual,
    S: FrameScheduler,
    P: SurfaceProvider,
{
    visual: V,
    scheduler: S,
    provider: P,
    seed: u64,
    rng: Xorshift64,
    clock: FrameClock,
    surface: Option<Surface>,
    pending: Option<FrameHandle>,
    state: LifecycleState,
}

impl<V: Visual, S: FrameScheduler> Controller<V, S, RasterProvider> {
    pub fn new(visual: V, scheduler: S, seed: u64) -> Self {
        Self::with_provider(visual, scheduler, RasterProvider, seed)
    }
}

impl<V, S, P> Controller<V, S, P>
where
    V: Visual,
    S: FrameScheduler,
    P: SurfaceProvider,
{
    pub fn with_provider(visual: V, scheduler: S, provider: P, seed: u64) -> Self {
        Self {
            visual,
            scheduler,
            provider,
            seed,
            rng: Xorshift64::new(seed),
            clock: FrameClock::new(),
            surface: None,
            pending: None,
            state: LifecycleState::Idle,
        }
    }

    /// Acquires a surface, seeds the visual and schedules the first frame.
    ///
    /// On failure the controller enters [`LifecycleState::Failed`], logs one
    /// warning and schedules nothing. Mounting a running controller tears the
    /// old instance down first.
    pub fn mount(&mut self, viewport: SurfaceDescriptor) -> Result<(), EngineError> {
        if self.state == LifecycleState::Running {
            self.unmount();
        }
        let surface = match viewport
            .validate()
            .and_then(|_| self.provider.acquire(viewport, self.visual.background()))
        {
            Ok(surface) => surface,
            Err(e) => {
                self.state = LifecycleState::Failed;
                warn!(
                    visual = self.visual.name(),
                    width = viewport.width,
                    height = viewport.height,
                    error = %e,
                    "mount failed, visual will not render"
                );
                return Err(e);
            }
        };

        self.rng = Xorshift64::new(self.seed);
        self.clock = FrameClock::new();
        self.visual.seed(viewport, &mut self.rng);
        self.surface = Some(surface);
        self.pending = Some(self.scheduler.request_frame());
        self.state = LifecycleState::Running;
        debug!(
            visual = self.visual.name(),
            width = viewport.width,
            height = viewport.height,
            elements = self.visual.element_count(),
            "mounted"
        );
        Ok(())
    }

    /// Delivers a fired frame.
    pub fn tick(&mut self, handle: FrameHandle) -> TickOutcome {
        if self.state != LifecycleState::Running {
            return TickOutcome::Inactive;
        }
        if self.pending != Some(handle) {
            return TickOutcome::Stale;
        }
        let Some(surface) = self.surface.as_mut() else {
            return TickOutcome::Inactive;
        };
        self.pending = None;

        self.visual.step(&self.clock, &mut self.rng);
        let mut canvas = Compositor::new(surface);
        self.visual.paint(&mut canvas, &self.clock);
        self.clock.advance();

        self.pending = Some(self.scheduler.request_frame());
        TickOutcome::Rendered
    }

    /// Reallocates the surface at the new size and lets the visual adapt.
    ///
    /// A controller whose mount failed (or never happened) treats this as a
    /// fresh mount. After unmount it does nothing. An invalid size leaves a
    /// running instance on its old surface.
    pub fn resize(&mut self, viewport: SurfaceDescriptor) -> Result<(), EngineError> {
        match self.state {
            LifecycleState::Idle | LifecycleState::Failed => return self.mount(viewport),
            LifecycleState::Unmounted => return Ok(()),
            LifecycleState::Running => {}
        }
        viewport.validate()?;
        let surface = self
            .provider
            .acquire(viewport, self.visual.background())
            .inspect_err(|e| {
                warn!(
                    visual = self.visual.name(),
                    width = viewport.width,
                    height = viewport.height,
                    error = %e,
                    "resize failed, keeping previous surface"
                )
            })?;
        if let Some(old) = self.surface.replace(surface) {
            self.provider.release(old);
        }
        self.visual.resize(viewport, &mut self.rng);
        debug!(
            visual = self.visual.name(),
            width = viewport.width,
            height = viewport.height,
            "resized"
        );
        Ok(())
    }

    /// Cancels the scheduled frame and releases the surface and visual state.
    ///
    /// Safe to call any number of times, including after a failed mount.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(surface) = self.surface.take() {
            self.provider.release(surface);
        }
        if self.state == LifecycleState::Running {
            self.visual.release();
            debug!(
                visual = self.visual.name(),
                frames = self.clock.frame(),
                "unmounted"
            );
        }
        self.state = LifecycleState::Unmounted;
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The frame this controller is waiting on, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn visual(&self) -> &V {
        &self.visual
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

}

impl<V, S, P> Drop for Controller<V, S, P>
where
    V: Visual,
    S: FrameScheduler,
    P: SurfaceProvider,
{
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Fires up to `frames` of `controller`'s own frames on a headless queue.
/// Returns how many frames rendered.
///
/// Only the handle the controller is waiting on is taken off the queue, so
/// other controllers sharing it keep their scheduled frames.
pub fn run_headless<V, P>(
    controller: &mut Controller<V, HeadlessScheduler, P>,
    frames: usize,
) -> usize
where
    V: Visual,
    P: SurfaceProvider,
{
    let mut rendered = 0;
    for _ in 0..frames {
        let Some(handle) = controller.pending() else {
            break;
        };
        if !controller.scheduler().take(handle) {
            break;
        }
        if controller.tick(handle) != TickOutcome::Rendered {
            break;
        }
        rendered += 1;
    }
    rendered
}
