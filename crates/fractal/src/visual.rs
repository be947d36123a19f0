//! Fractal cell visuals: cells fade in one by one, then breathe.

use std::f64::consts::TAU;

use glam::DVec2;
use motif_core::color::{Palette, Srgb};
use motif_core::compositor::{Compositor, Projection};
use motif_core::prng::Xorshift64;
use motif_core::store::Store;
use motif_core::surface::SurfaceDescriptor;
use motif_core::visual::{FrameClock, Visual};
use serde_json::{json, Value};

use crate::subdivide::{depth_for, subdivide, Cell, Rule};

/// Smallest cell edge, in pixels, the depth is chosen for.
const MIN_CELL_PX: f64 = 2.0;
/// Seconds until the last cell has appeared.
const REVEAL_SECONDS: f64 = 4.0;
/// Breathing frequency in Hz.
const BREATH: f64 = 0.25;
const FADE: f64 = 0.12;

/// Paints the leaves of a [`Rule`] on a square centred in the surface.
///
/// Each cell gets a random phase at seeding that decides both when it
/// first appears and where it sits in the breathing cycle.
pub struct FractalVisual {
    rule: Rule,
    depth: u32,
    cells: Vec<Cell>,
    palette: Palette,
    store: Store,
    projection: Option<Projection>,
}

impl FractalVisual {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            depth: 0,
            cells: Vec::new(),
            palette: match rule {
                Rule::Dust => Palette::aurora(),
                Rule::Carpet => Palette::ember(),
            },
            store: Store::empty(),
            projection: None,
        }
    }

    pub fn dust() -> Self {
        Self::new(Rule::Dust)
    }

    pub fn carpet() -> Self {
        Self::new(Rule::Carpet)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Visual for FractalVisual {
    fn name(&self) -> &'static str {
        match self.rule {
            Rule::Dust => "dust",
            Rule::Carpet => "carpet",
        }
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        let side = viewport.width.min(viewport.height);
        self.depth = depth_for(side, MIN_CELL_PX);
        self.cells = subdivide(self.rule, self.depth);
        let cells = &self.cells;
        self.store = Store::create(cells.len(), |i, e| {
            e.pos = cells[i].center().extend(0.0);
            e.phase = rng.next_f64();
            e.intensity = 0.0;
        });
        // 5% margin around the unit square
        self.projection = Some(Projection::fit(
            DVec2::splat(-0.05),
            DVec2::splat(1.05),
            viewport.width,
            viewport.height,
        ));
    }

    fn step(&mut self, clock: &FrameClock, _rng: &mut Xorshift64) {
        let t = clock.time();
        let revealed = t / REVEAL_SECONDS;
        self.store.for_each_mut(|_, e| {
            e.intensity = if e.phase <= revealed {
                0.55 + 0.45 * (TAU * (BREATH * t + e.phase)).sin()
            } else {
                0.0
            };
            e.age = e.age.saturating_add(1);
        });
    }

    fn paint(&self, canvas: &mut Compositor<'_>, _clock: &FrameClock) {
        let Some(proj) = self.projection else {
            return;
        };
        canvas.fade(FADE);
        for (cell, e) in self.cells.iter().zip(self.store.iter()) {
            if e.intensity <= 0.0 {
                continue;
            }
            // screen y is flipped, so the top-left corner is the cell's max-y corner
            let top_left = proj.to_screen(cell.origin + DVec2::new(0.0, cell.size));
            let size = DVec2::splat(cell.size * proj.scale());
            canvas.cell(top_left, size, self.palette.sample(e.phase), e.intensity);
        }
    }

    fn release(&mut self) {
        self.cells = Vec::new();
        self.store = Store::empty();
        self.projection = None;
    }

    fn background(&self) -> Srgb {
        Srgb::gray(0.03)
    }

    fn params(&self) -> Value {
        json!({
            "rule": self.name(),
            "depth": self.depth,
            "cells": self.cells.len(),
            "reveal_seconds": REVEAL_SECONDS,
            "fade": FADE,
        })
    }

    fn element_count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_core::surface::Surface;

    #[test]
    fn depth_follows_viewport() {
        let mut v = FractalVisual::carpet();
        v.seed(SurfaceDescriptor::new(400, 600), &mut Xorshift64::new(1));
        assert_eq!(v.depth(), 4);
        assert_eq!(v.element_count(), 4096);
        assert_eq!(v.cells().len(), v.element_count());
    }

    #[test]
    fn dust_count_is_four_to_the_depth() {
        let mut v = FractalVisual::dust();
        v.seed(SurfaceDescriptor::new(200, 200), &mut Xorshift64::new(1));
        assert_eq!(v.element_count(), 4usize.pow(v.depth()));
    }

    #[test]
    fn nothing_shows_before_the_reveal_starts() {
        let mut v = FractalVisual::carpet();
        let mut rng = Xorshift64::new(2);
        v.seed(SurfaceDescriptor::new(81, 81), &mut rng);
        v.step(&FrameClock::new(), &mut rng);
        let visible = v.store().iter().filter(|e| e.intensity > 0.0).count();
        assert!(visible < v.element_count() / 10);
    }

    #[test]
    fn everything_shows_after_the_reveal() {
        let mut v = FractalVisual::dust();
        let mut rng = Xorshift64::new(3);
        v.seed(SurfaceDescriptor::new(81, 81), &mut rng);
        let mut clock = FrameClock::new();
        for _ in 0..((REVEAL_SECONDS + 0.5) * 60.0) as usize {
            clock.advance();
        }
        v.step(&clock, &mut rng);
        assert!(v.store().iter().all(|e| e.intensity > 0.0));
    }

    #[test]
    fn carpet_hole_stays_dark() {
        let mut v = FractalVisual::carpet();
        let mut rng = Xorshift64::new(4);
        let mut s = Surface::new(90, 90, v.background()).unwrap();
        v.seed(s.descriptor(), &mut rng);
        let mut clock = FrameClock::new();
        for _ in 0..300 {
            v.step(&clock, &mut rng);
            v.paint(&mut Compositor::new(&mut s), &clock);
            clock.advance();
        }
        let hole = s.pixel(45, 45).unwrap();
        assert!(hole.luminance() < 0.05, "{hole:?}");
        assert!(s.mean_luminance() > hole.luminance());
    }
}
