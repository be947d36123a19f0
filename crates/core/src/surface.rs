//! Raster drawing surface owned by a lifecycle controller.
//!
//! A `Surface` stores `width * height` opaque [`Srgb`] pixels in row-major
//! order. It is the "frame surface" of a mounted visual: the compositor
//! paints into it each frame and the host reads it back out.

use crate::color::Srgb;
use crate::error::EngineError;

/// Largest pixel count a surface will allocate (64 megapixels).
pub const MAX_PIXELS: usize = 1 << 26;

/// Width and height requested by the host for a mounted visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub width: usize,
    pub height: usize,
}

impl SurfaceDescriptor {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Rejects zero dimensions and sizes whose pixel count overflows or
    /// exceeds [`MAX_PIXELS`].
    pub fn validate(&self) -> Result<usize, EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = self
            .width
            .checked_mul(self.height)
            .ok_or(EngineError::InvalidDimensions)?;
        if len > MAX_PIXELS {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(len)
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// An opaque RGB raster.
#[derive(Debug, Clone)]
pub struct Surface {
    width: usize,
    height: usize,
    background: Srgb,
    data: Vec<Srgb>,
}

impl Surface {
    /// Allocates a surface filled with `background`.
    pub fn new(width: usize, height: usize, background: Srgb) -> Result<Self, EngineError> {
        let len = SurfaceDescriptor::new(width, height).validate()?;
        Ok(Self {
            width,
            height,
            background,
            data: vec![background; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor::new(self.width, self.height)
    }

    pub fn background(&self) -> Srgb {
        self.background
    }

    /// Read-only row-major pixels.
    pub fn data(&self) -> &[Srgb] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [Srgb] {
        &mut self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Srgb> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Mutable pixel at signed coordinates, `None` when clipped.
    pub(crate) fn pixel_mut(&mut self, x: i64, y: i64) -> Option<&mut Srgb> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(&mut self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Fills every pixel with the background.
    pub fn clear(&mut self) {
        let bg = self.background;
        self.data.fill(bg);
    }

    /// Mean Rec. 709 luminance over all pixels.
    pub fn mean_luminance(&self) -> f64 {
        let sum: f64 = self.data.iter().map(|c| c.luminance()).sum();
        sum / self.data.len() as f64
    }
}
