//! Ternary subdivision of the unit square.
//!
//! Both fractals split a square into a 3×3 grid and keep a subset of the
//! nine children. The recursion is unrolled into an explicit worklist so
//! depth never touches the call stack, and the result is a flat list built
//! once per seeding.

use glam::DVec2;

/// Deepest level any fractal is built to. `8^6` carpet cells is already
/// well below one cell per pixel on common displays.
pub const MAX_DEPTH: u32 = 6;

/// An axis-aligned square in unit space, `y` growing upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub origin: DVec2,
    pub size: f64,
    pub depth: u32,
}

impl Cell {
    pub const UNIT: Cell = Cell {
        origin: DVec2::ZERO,
        size: 1.0,
        depth: 0,
    };

    pub fn center(&self) -> DVec2 {
        self.origin + DVec2::splat(0.5 * self.size)
    }

    /// The nine equal children, row-major from the origin corner.
    fn children(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let third = self.size / 3.0;
        (0..9).map(move |k| {
            let (col, row) = (k % 3, k / 3);
            let cell = Cell {
                origin: self.origin + DVec2::new(col as f64, row as f64) * third,
                size: third,
                depth: self.depth + 1,
            };
            (col, row, cell)
        })
    }
}

/// Which children of a 3×3 split survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Four corners: the Cantor dust, `4^n` cells.
    Dust,
    /// All but the centre: the Sierpinski carpet, `8^n` cells.
    Carpet,
}

impl Rule {
    pub fn keeps(self, col: usize, row: usize) -> bool {
        match self {
            Rule::Dust => col != 1 && row != 1,
            Rule::Carpet => !(col == 1 && row == 1),
        }
    }

    /// Surviving children per split.
    pub fn branching(self) -> usize {
        match self {
            Rule::Dust => 4,
            Rule::Carpet => 8,
        }
    }

    pub fn cell_count(self, depth: u32) -> usize {
        self.branching().pow(depth.min(MAX_DEPTH))
    }
}

/// Leaves of `rule` applied `depth` times to the unit square.
///
/// `depth` is clamped to [`MAX_DEPTH`]. Leaves come out in worklist order,
/// which is deterministic but not spatially sorted.
pub fn subdivide(rule: Rule, depth: u32) -> Vec<Cell> {
    let depth = depth.min(MAX_DEPTH);
    let mut leaves = Vec::with_capacity(rule.cell_count(depth));
    let mut work = vec![Cell::UNIT];
    while let Some(cell) = work.pop() {
        if cell.depth == depth {
            leaves.push(cell);
            continue;
        }
        work.extend(
            cell.children()
                .filter(|(col, row, _)| rule.keeps(*col, *row))
                .map(|(_, _, c)| c),
        );
    }
    leaves
}

/// Deepest level whose cells are still at least `min_px` pixels across on a
/// square of `side` pixels.
pub fn depth_for(side: usize, min_px: f64) -> u32 {
    let mut depth = 0;
    let mut px = side as f64;
    while depth < MAX_DEPTH && px / 3.0 >= min_px {
        px /= 3.0;
        depth += 1;
    }
    depth
}
