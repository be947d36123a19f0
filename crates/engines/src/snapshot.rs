//! PNG snapshots of a rendered [`Surface`].
//!
//! Feature-gated behind `png` (default on) so embedders that only need raw
//! bytes can skip the `image` crate. The byte conversion itself lives in
//! [`crate::pixel`].

use std::path::Path;

use motif_core::error::EngineError;
use motif_core::surface::Surface;

use crate::pixel::surface_to_rgba;

/// Writes `surface` as an 8-bit RGBA PNG.
///
/// Returns `EngineError::InvalidDimensions` if a dimension overflows `u32`,
/// or `EngineError::Io` on write failure.
pub fn write_png(surface: &Surface, path: &Path) -> Result<(), EngineError> {
    let rgba = surface_to_rgba(surface);
    let w = u32::try_from(surface.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_core::color::Srgb;

    #[test]
    fn write_png_round_trip() {
        let surface = Surface::new(16, 12, Srgb::new(1.0, 0.0, 0.0)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.png");

        write_png(&surface, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (16, 12));
        assert_eq!(img.get_pixel(3, 3).0, [255, 0, 0, 255]);
    }

    #[test]
    fn write_to_missing_directory_is_io_error() {
        let surface = Surface::new(2, 2, Srgb::BLACK).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("snap.png");
        assert!(matches!(write_png(&surface, &path), Err(EngineError::Io(_))));
    }
}
