#![deny(unsafe_code)]
//! Field advection visuals for the motif gallery.
//!
//! Tracers move through a velocity field sampled from `motif_core::field`
//! and are re-seeded when they leave the visible rectangle or outlive their
//! lifespan. World space is `[-aspect, aspect] × [-1, 1]`.

pub mod curl;
pub mod vortex;

pub use curl::{CurlParams, CurlVisual};
pub use vortex::{VortexParams, VortexVisual};

use glam::DVec2;
use motif_core::surface::SurfaceDescriptor;

/// Frames a tracer lives before being re-seeded, staggered by index so
/// re-seeds don't arrive in waves.
pub(crate) fn lifespan(index: usize) -> u32 {
    240 + (index % 64) as u32
}

/// Visible world rectangle for a viewport.
pub(crate) fn bounds_for(viewport: SurfaceDescriptor) -> (DVec2, DVec2) {
    let aspect = viewport.aspect();
    (DVec2::new(-aspect, -1.0), DVec2::new(aspect, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_aspect_ratio() {
        let (min, max) = bounds_for(SurfaceDescriptor::new(800, 400));
        assert_eq!(min, DVec2::new(-2.0, -1.0));
        assert_eq!(max, DVec2::new(2.0, 1.0));
    }

    #[test]
    fn lifespans_are_staggered() {
        assert_ne!(lifespan(0), lifespan(1));
        assert_eq!(lifespan(0), lifespan(64));
    }
}
