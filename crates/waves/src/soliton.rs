//! Stacked rows of KdV solitons overtaking each other on a periodic line.

use glam::{DVec2, DVec3};
use motif_core::color::{Palette, Srgb};
use motif_core::compositor::{Compositor, Projection};
use motif_core::prng::Xorshift64;
use motif_core::store::Store;
use motif_core::surface::SurfaceDescriptor;
use motif_core::visual::{FrameClock, Visual};
use serde_json::{json, Value};

use crate::special::kdv_soliton;

/// Parameters for [`SolitonVisual`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolitonParams {
    pub rows: usize,
    /// Sample points per row.
    pub samples: usize,
    /// KdV units per world unit along a row.
    pub stretch: f64,
    /// KdV time per second.
    pub tempo: f64,
    pub fade: f64,
}

impl Default for SolitonParams {
    fn default() -> Self {
        Self {
            rows: 14,
            samples: 160,
            stretch: 6.0,
            tempo: 0.5,
            fade: 0.08,
        }
    }
}

/// The two solitons travelling along one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolitonRow {
    pub baseline: f64,
    pub fast: (f64, f64),
    pub slow: (f64, f64),
}

/// Fastest soliton speed drawn at seeding; its peak is half of this.
const MAX_SPEED: f64 = 8.0;

/// Solitons wrap around a line of length `period`.
fn periodic_soliton(x: f64, t: f64, speed: f64, x0: f64, period: f64) -> f64 {
    let mut d = (x - speed * t - x0).rem_euclid(period);
    if d > 0.5 * period {
        d -= period;
    }
    kdv_soliton(d, 0.0, speed, 0.0)
}

/// Each row is a polyline of store elements whose heights follow the sum
/// of a fast and a slow soliton.
pub struct SolitonVisual {
    params: SolitonParams,
    rows: Vec<SolitonRow>,
    period: f64,
    amplitude: f64,
    palette: Palette,
    store: Store,
    projection: Option<Projection>,
}

impl SolitonVisual {
    pub const NAME: &'static str = "soliton";

    pub fn new(params: SolitonParams) -> Self {
        Self {
            params,
            rows: Vec::new(),
            period: 1.0,
            amplitude: 0.0,
            palette: Palette::ember(),
            store: Store::empty(),
            projection: None,
        }
    }

    pub fn rows(&self) -> &[SolitonRow] {
        &self.rows
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// Summed fast and slow soliton displacement of `row` at `x`.
fn row_height(params: &SolitonParams, period: f64, row: &SolitonRow, x: f64, t: f64) -> f64 {
    let s = x * params.stretch;
    let tau = t * params.tempo;
    periodic_soliton(s, tau, row.fast.0, row.fast.1, period)
        + periodic_soliton(s, tau, row.slow.0, row.slow.1, period)
}

impl Default for SolitonVisual {
    fn default() -> Self {
        Self::new(SolitonParams::default())
    }
}

impl Visual for SolitonVisual {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        let aspect = viewport.aspect();
        let rows = self.params.rows.max(1);
        let samples = self.params.samples.max(2);
        let spacing = 2.0 / rows as f64;
        self.period = 2.0 * aspect * self.params.stretch;
        // two peaks can stack; keep the sum inside one row gap
        self.amplitude = 0.9 * spacing / (MAX_SPEED * 0.5 + 1.0);

        self.rows = (0..rows)
            .map(|r| SolitonRow {
                baseline: -1.0 + spacing * (r as f64 + 0.25),
                fast: (
                    rng.next_range(3.0, MAX_SPEED),
                    rng.next_range(0.0, self.period),
                ),
                slow: (rng.next_range(0.5, 2.0), rng.next_range(0.0, self.period)),
            })
            .collect();

        let row_data = &self.rows;
        self.store = Store::create(rows * samples, |i, e| {
            let x = -aspect + 2.0 * aspect * (i % samples) as f64 / (samples - 1) as f64;
            e.pos = DVec3::new(x, row_data[i / samples].baseline, 0.0);
            e.intensity = 0.0;
        });
        self.projection = Some(Projection::fit(
            DVec2::new(-aspect, -1.0),
            DVec2::new(aspect, 1.0),
            viewport.width,
            viewport.height,
        ));
    }

    fn step(&mut self, clock: &FrameClock, _rng: &mut Xorshift64) {
        if self.rows.is_empty() {
            return;
        }
        let samples = self.store.len() / self.rows.len();
        let t = clock.time();
        let peak = MAX_SPEED * 0.5;
        let Self {
            params,
            rows,
            period,
            amplitude,
            store,
            ..
        } = self;
        store.for_each_mut(|i, e| {
            let row = &rows[i / samples];
            let u = row_height(params, *period, row, e.pos.x, t);
            let next = DVec3::new(e.pos.x, row.baseline + *amplitude * u, 0.0);
            e.advance_to(next);
            e.intensity = (u / peak).clamp(0.0, 1.0);
        });
    }

    fn paint(&self, canvas: &mut Compositor<'_>, _clock: &FrameClock) {
        let Some(proj) = self.projection else {
            return;
        };
        if self.rows.is_empty() {
            return;
        }
        canvas.fade(self.params.fade);
        let samples = self.store.len() / self.rows.len();
        for line in self.store.as_slice().chunks(samples) {
            for pair in line.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let heat = 0.5 * (a.intensity + b.intensity);
                let color = self.palette.sample(0.15 + 0.85 * heat);
                canvas.segment(proj.to_screen(a.xy()), proj.to_screen(b.xy()), color, 0.6 + 0.4 * heat);
            }
        }
    }

    fn release(&mut self) {
        self.rows.clear();
        self.store = Store::empty();
        self.projection = None;
    }

    fn background(&self) -> Srgb {
        Srgb::new(0.02, 0.015, 0.03)
    }

    fn params(&self) -> Value {
        json!({
            "rows": self.params.rows,
            "samples": self.params.samples,
            "stretch": self.params.stretch,
            "tempo": self.params.tempo,
            "fade": self.params.fade,
            "period": self.period,
            "speeds": self.rows.iter().map(|r| [r.fast.0, r.slow.0]).collect::<Vec<_>>(),
        })
    }

    fn element_count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> (SolitonVisual, Xorshift64) {
        let mut rng = Xorshift64::new(seed);
        let mut v = SolitonVisual::new(SolitonParams {
            rows: 4,
            samples: 50,
            ..SolitonParams::default()
        });
        v.seed(SurfaceDescriptor::new(200, 100), &mut rng);
        (v, rng)
    }

    #[test]
    fn periodic_soliton_wraps() {
        let p = 20.0;
        let a = periodic_soliton(1.0, 0.0, 4.0, 0.0, p);
        let b = periodic_soliton(1.0 + p, 0.0, 4.0, 0.0, p);
        assert!((a - b).abs() < 1e-12);
        assert!((periodic_soliton(0.0, 0.0, 4.0, 0.0, p) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn one_element_per_sample() {
        let (v, _) = seeded(1);
        assert_eq!(v.element_count(), 200);
        assert_eq!(v.rows().len(), 4);
    }

    #[test]
    fn fast_soliton_outruns_slow_one() {
        let (v, _) = seeded(2);
        for r in v.rows() {
            assert!(r.fast.0 > r.slow.0);
        }
    }

    #[test]
    fn displacement_stays_inside_row_gap() {
        let (mut v, mut rng) = seeded(3);
        let spacing = 2.0 / 4.0;
        let mut clock = FrameClock::new();
        for _ in 0..120 {
            v.step(&clock, &mut rng);
            clock.advance();
        }
        let samples = 50;
        for (i, e) in v.store().iter().enumerate() {
            let base = v.rows()[i / samples].baseline;
            let lift = e.pos.y - base;
            assert!((0.0..spacing).contains(&lift), "lift {lift}");
        }
    }

    #[test]
    fn step_moves_crests() {
        let (mut v, mut rng) = seeded(4);
        let mut clock = FrameClock::new();
        v.step(&clock, &mut rng);
        let first: Vec<f64> = v.store().iter().map(|e| e.pos.y).collect();
        for _ in 0..30 {
            clock.advance();
            v.step(&clock, &mut rng);
        }
        assert!(v.store().iter().zip(&first).any(|(e, y)| e.pos.y != *y));
    }

    #[test]
    fn step_places_each_sample_at_its_row_height() {
        let (mut v, mut rng) = seeded(6);
        let mut clock = FrameClock::new();
        for _ in 0..7 {
            clock.advance();
        }
        v.step(&clock, &mut rng);
        let samples = 50;
        for (i, e) in v.store().iter().enumerate() {
            let row = &v.rows()[i / samples];
            let u = row_height(&v.params, v.period, row, e.pos.x, clock.time());
            assert_eq!(e.pos.y, row.baseline + v.amplitude * u);
            assert_eq!(e.age, 1);
        }
    }

    #[test]
    fn release_clears_rows() {
        let (mut v, _) = seeded(5);
        v.release();
        assert_eq!(v.element_count(), 0);
        assert!(v.rows().is_empty());
    }
}
