//! Reproducible description of a headless render.
//!
//! A [`Seed`] captures everything needed to recreate a frame: visual name,
//! surface dimensions, PRNG seed and frame count.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::surface::SurfaceDescriptor;

/// Reproducible description of a headless render.
///
/// Two identical `Seed` values fed to the same binary produce bit-identical
/// surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seed {
    pub visual: String,
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub frames: usize,
}

impl Seed {
    /// Creates a new Seed with `frames` set to 0.
    pub fn new(visual: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            visual: visual.to_string(),
            width,
            height,
            seed,
            frames: 0,
        }
    }

    pub fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor::new(self.width, self.height)
    }

    /// Validates that the dimensions are non-zero and allocatable.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.descriptor().validate().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_at_frame_zero() {
        let s = Seed::new("henon", 512, 512, 42);
        assert_eq!(s.visual, "henon");
        assert_eq!((s.width, s.height), (512, 512));
        assert_eq!(s.seed, 42);
        assert_eq!(s.frames, 0);
    }

    #[test]
    fn json_round_trip() {
        let mut original = Seed::new("lorenz", 800, 600, 8675309);
        original.frames = 240;
        let json = serde_json::to_string_pretty(&original).unwrap();
        let restored: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn json_contains_expected_keys() {
        let v = serde_json::to_value(Seed::new("carpet", 128, 128, 1)).unwrap();
        for key in ["visual", "width", "height", "seed", "frames"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn validate_accepts_valid_seed() {
        assert!(Seed::new("henon", 400, 300, 42).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_or_overflowing_dimensions() {
        assert!(Seed::new("henon", 0, 512, 42).validate().is_err());
        assert!(Seed::new("henon", 512, 0, 42).validate().is_err());
        assert!(Seed::new("henon", usize::MAX, 2, 42).validate().is_err());
    }
}
