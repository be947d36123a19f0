//! Fixed-capacity state store for simulation elements.
//!
//! A [`Store`] is created once per mount with a count chosen by the visual.
//! Its length never changes afterwards: elements that escape or converge are
//! re-seeded in place, so the per-frame hot path never allocates.

use glam::{DVec2, DVec3};

/// Where an element is in its per-element lifecycle.
///
/// `Escaped` and `Converged` only exist between a step and the re-seed that
/// follows it in the same call, so a stored element always reads as
/// `Seeded` or `Evolving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// Freshly seeded, not yet stepped.
    Seeded,
    /// Stepped at least once since its last seeding.
    Evolving,
    /// Left its escape region or went non-finite on the last step.
    Escaped,
    /// Moved less than the convergence tolerance on the last step.
    Converged,
}

/// One logical unit of a simulation: a particle, an orbit point, a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// Current position. Planar visuals leave `z` at 0.
    pub pos: DVec3,
    /// Position before the most recent step, for drawing segments.
    pub prev: DVec3,
    pub vel: DVec3,
    pub phase: f64,
    /// Steps since the element was last seeded.
    pub age: u32,
    /// Per-element paint intensity in [0, 1].
    pub intensity: f64,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            pos: DVec3::ZERO,
            prev: DVec3::ZERO,
            vel: DVec3::ZERO,
            phase: 0.0,
            age: 0,
            intensity: 1.0,
        }
    }
}

impl Element {
    /// Planar view of the position.
    pub fn xy(&self) -> DVec2 {
        self.pos.truncate()
    }

    /// Planar view of the previous position.
    pub fn prev_xy(&self) -> DVec2 {
        self.prev.truncate()
    }

    /// Moves to `next`, remembering the current position as `prev`.
    pub fn advance_to(&mut self, next: DVec3) {
        self.prev = self.pos;
        self.pos = next;
        self.age = self.age.saturating_add(1);
    }

    pub fn state(&self) -> ElementState {
        if self.age == 0 {
            ElementState::Seeded
        } else {
            ElementState::Evolving
        }
    }

    /// True when any coordinate is NaN or infinite.
    pub fn is_diverged(&self) -> bool {
        !self.pos.is_finite()
    }
}

/// An ordered, fixed-size collection of [`Element`]s.
#[derive(Debug, Clone)]
pub struct Store {
    elements: Vec<Element>,
}

impl Store {
    /// Creates `count` elements, seeding each with `seed_fn(index, element)`.
    pub fn create<F>(count: usize, mut seed_fn: F) -> Self
    where
        F: FnMut(usize, &mut Element),
    {
        let elements = (0..count)
            .map(|i| {
                let mut e = Element::default();
                seed_fn(i, &mut e);
                e.prev = e.pos;
                e.age = 0;
                e
            })
            .collect();
        Self { elements }
    }

    /// Re-seeds element `i` in place. Out-of-range indices are ignored.
    ///
    /// The element starts from a default state, so nothing from its previous
    /// life leaks through; `prev` is pinned to the new position so no streak
    /// is drawn across the jump.
    pub fn reset<F>(&mut self, i: usize, seed_fn: F)
    where
        F: FnOnce(usize, &mut Element),
    {
        if let Some(e) = self.elements.get_mut(i) {
            reseed_element(i, e, seed_fn);
        }
    }

    /// A store with no elements, for visuals that have released their state.
    pub fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Element> {
        self.elements.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter()
    }

    /// Read-only visit of every element with its index.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, &Element),
    {
        self.elements.iter().enumerate().for_each(|(i, e)| f(i, e));
    }

    /// Mutable visit of every element with its index.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &mut Element),
    {
        self.elements
            .iter_mut()
            .enumerate()
            .for_each(|(i, e)| f(i, e));
    }

    /// Raw slice access for visuals that need neighbouring elements.
    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }
}

/// Shared by [`Store::reset`] and the steppers, which already hold `&mut Element`.
pub fn reseed_element<F>(i: usize, e: &mut Element, seed_fn: F)
where
    F: FnOnce(usize, &mut Element),
{
    *e = Element::default();
    seed_fn(i, e);
    e.prev = e.pos;
    e.age = 0;
}
