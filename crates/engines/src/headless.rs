//! Headless rendering of a [`Seed`] through the full lifecycle.

use motif_core::error::EngineError;
use motif_core::lifecycle::{run_headless, Controller, HeadlessScheduler};
use motif_core::seed::Seed;
use motif_core::surface::Surface;
use motif_core::visual::Visual;
use serde_json::Value;
use tracing::debug;

use crate::VisualKind;

/// Output of [`render`].
#[derive(Debug, Clone)]
pub struct Rendered {
    pub surface: Surface,
    /// Frames actually stepped and painted.
    pub frames: usize,
    /// The visual's parameters after seeding.
    pub params: Value,
    pub elements: usize,
}

/// Mounts `seed.visual` on a headless scheduler, runs `seed.frames` frames
/// and unmounts, returning a copy of the final surface.
pub fn render(seed: &Seed) -> Result<Rendered, EngineError> {
    seed.validate()?;
    let visual = VisualKind::from_name(&seed.visual)?;
    let mut controller = Controller::new(visual, HeadlessScheduler::new(), seed.seed);
    controller.mount(seed.descriptor())?;
    let frames = run_headless(&mut controller, seed.frames);
    let params = controller.visual().params();
    let elements = controller.visual().element_count();
    let surface = controller
        .surface()
        .cloned()
        .ok_or_else(|| EngineError::SurfaceUnavailable("controller lost its surface".into()))?;
    controller.unmount();
    debug!(visual = %seed.visual, frames, elements, "rendered headless");
    Ok(Rendered {
        surface,
        frames,
        params,
        elements,
    })
}
