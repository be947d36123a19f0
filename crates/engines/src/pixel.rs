//! Surface to RGBA8 conversion.
//!
//! Always available (no feature gate) so hosts that blit raw bytes do not
//! need the `png` feature.

use motif_core::surface::Surface;

/// Quantizes every pixel to `[r, g, b, 255]`. The buffer length is
/// `width * height * 4`.
pub fn surface_to_rgba(surface: &Surface) -> Vec<u8> {
    surface
        .data()
        .iter()
        .flat_map(|px| {
            let [r, g, b] = px.to_rgb8();
            [r, g, b, 255u8]
        })
        .collect()
}
