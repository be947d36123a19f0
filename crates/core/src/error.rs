//! Error types for the motif core.

use thiserror::Error;

/// Errors produced by the animation core.
///
/// None of these are raised from inside a frame: numerical divergence is
/// handled by resetting the affected element, so only mount-time
/// preconditions and host-side I/O ever surface as an `EngineError`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A low-discrepancy sequence was asked for a base that cannot radix-invert.
    #[error("invalid sequence base {0}: base must be at least 2")]
    InvalidBase(u32),

    /// The host could not hand out a drawing surface.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// No visual is registered under the requested name.
    #[error("unknown visual: {0}")]
    UnknownVisual(String),

    /// Writing a snapshot or other host-side output failed.
    #[error("i/o error: {0}")]
    Io(String),
}
