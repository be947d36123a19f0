//! Frame compositor: persistence fades and primitive drawing.
//!
//! Trails come from painting a low-opacity overlay of the background over
//! the previous frame ([`Compositor::fade`]) instead of clearing it, then
//! drawing the new primitives on top. With a fade factor `f` and constant
//! per-frame paint energy `E`, brightness follows `L ← (1 − f)·L + E` and
//! settles at `E / f` ([`steady_state_luminance`]).
//!
//! All drawing is clipped: off-surface or non-finite coordinates are skipped,
//! so stale positions from before a resize can never index out of bounds.

use glam::DVec2;

use crate::color::Srgb;
use crate::surface::Surface;

/// Upper bound on segments used to approximate one arc.
const MAX_ARC_SEGMENTS: usize = 720;

/// How new content combines with what is already on the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// `dst · (1 − a) + src · a`
    #[default]
    Over,
    /// `min(dst + src · a, 1)`
    Additive,
}

/// Brightness the fade/paint recurrence converges to, `energy / fade`.
///
/// Returns `None` unless `0 < fade <= 1`.
pub fn steady_state_luminance(fade: f64, energy: f64) -> Option<f64> {
    if fade > 0.0 && fade <= 1.0 {
        Some(energy / fade)
    } else {
        None
    }
}

/// Maps a rectangle of simulation space onto the surface, preserving aspect
/// ratio and centring the shorter axis. Screen `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    center: DVec2,
    scale: f64,
    screen_center: DVec2,
}

impl Projection {
    /// Fits `[min, max]` inside a `width × height` surface.
    pub fn fit(min: DVec2, max: DVec2, width: usize, height: usize) -> Self {
        let span = (max - min).max(DVec2::splat(f64::EPSILON));
        let scale = (width as f64 / span.x).min(height as f64 / span.y);
        Self {
            center: (min + max) * 0.5,
            scale,
            screen_center: DVec2::new(width as f64, height as f64) * 0.5,
        }
    }

    pub fn to_screen(&self, p: DVec2) -> DVec2 {
        let d = (p - self.center) * self.scale;
        DVec2::new(self.screen_center.x + d.x, self.screen_center.y - d.y)
    }

    pub fn to_world(&self, s: DVec2) -> DVec2 {
        let d = DVec2::new(s.x - self.screen_center.x, self.screen_center.y - s.y);
        self.center + d / self.scale
    }

    /// Pixels per world unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Paints onto a borrowed [`Surface`] for the duration of one frame.
pub struct Compositor<'a> {
    surface: &'a mut Surface,
    blend: BlendMode,
    touched: usize,
}

impl<'a> Compositor<'a> {
    pub fn new(surface: &'a mut Surface) -> Self {
        Self {
            surface,
            blend: BlendMode::Over,
            touched: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.surface.width()
    }

    pub fn height(&self) -> usize {
        self.surface.height()
    }

    pub fn background(&self) -> Srgb {
        self.surface.background()
    }

    pub fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    /// Pixels written by primitives so far (fades not counted).
    pub fn touched(&self) -> usize {
        self.touched
    }

    /// Read access to the previous frame's pixels.
    pub fn surface(&self) -> &Surface {
        &*self.surface
    }

    /// Full clear to the background.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Overlays the background at opacity `alpha`, decaying prior content by
    /// `1 − alpha`.
    pub fn fade(&mut self, alpha: f64) {
        let a = alpha.clamp(0.0, 1.0);
        if a == 0.0 {
            return;
        }
        let bg = self.surface.background();
        for px in self.surface.data_mut() {
            *px = px.lerp(bg, a);
        }
    }

    /// Single pixel at the cell containing `p`.
    pub fn point(&mut self, p: DVec2, color: Srgb, alpha: f64) {
        if !p.is_finite() {
            return;
        }
        self.plot(p.x.floor(), p.y.floor(), color, alpha);
    }

    /// Straight line from `a` to `b`, clipped to the surface.
    pub fn segment(&mut self, a: DVec2, b: DVec2, color: Srgb, alpha: f64) {
        let Some((a, b)) = self.clip(a, b) else {
            return;
        };
        let d = b - a;
        let steps = d.x.abs().max(d.y.abs()).ceil().max(1.0) as usize;
        let inc = d / steps as f64;
        let mut p = a;
        for _ in 0..=steps {
            self.plot(p.x.floor(), p.y.floor(), color, alpha);
            p += inc;
        }
    }

    /// Axis-aligned filled rectangle with top-left `origin` and `size`.
    pub fn cell(&mut self, origin: DVec2, size: DVec2, color: Srgb, alpha: f64) {
        if !origin.is_finite() || !size.is_finite() {
            return;
        }
        let w = self.surface.width() as f64;
        let h = self.surface.height() as f64;
        let x0 = origin.x.floor().clamp(0.0, w) as usize;
        let y0 = origin.y.floor().clamp(0.0, h) as usize;
        let x1 = (origin.x + size.x).ceil().clamp(0.0, w) as usize;
        let y1 = (origin.y + size.y).ceil().clamp(0.0, h) as usize;
        for y in y0..y1 {
            for x in x0..x1 {
                self.plot(x as f64, y as f64, color, alpha);
            }
        }
    }

    /// Stroked circular arc from angle `start` to `end` (radians, screen space).
    pub fn arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, color: Srgb, alpha: f64) {
        if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return;
        }
        if !start.is_finite() || !end.is_finite() {
            return;
        }
        let sweep = end - start;
        let segments = ((radius * sweep.abs() * 0.5).ceil() as usize).clamp(4, MAX_ARC_SEGMENTS);
        let at = |k: usize| {
            let theta = start + sweep * k as f64 / segments as f64;
            center + DVec2::new(theta.cos(), theta.sin()) * radius
        };
        let mut prev = at(0);
        for k in 1..=segments {
            let next = at(k);
            self.segment(prev, next, color, alpha);
            prev = next;
        }
    }

    fn plot(&mut self, x: f64, y: f64, color: Srgb, alpha: f64) {
        let a = alpha.clamp(0.0, 1.0);
        let blend = self.blend;
        if let Some(px) = self.surface.pixel_mut(x as i64, y as i64) {
            *px = match blend {
                BlendMode::Over => px.lerp(color, a),
                BlendMode::Additive => Srgb::new(
                    (px.r + color.r * a).min(1.0),
                    (px.g + color.g * a).min(1.0),
                    (px.b + color.b * a).min(1.0),
                ),
            };
            self.touched += 1;
        }
    }

    /// Liang–Barsky clip of `a → b` against the surface rectangle.
    fn clip(&self, a: DVec2, b: DVec2) -> Option<(DVec2, DVec2)> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        let max = DVec2::new(self.surface.width() as f64, self.surface.height() as f64);
        let d = b - a;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [
            (-d.x, a.x),
            (d.x, max.x - a.x),
            (-d.y, a.y),
            (d.y, max.y - a.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((a + d * t0, a + d * t1))
    }
}
