#![deny(unsafe_code)]
//! Self-similar cell fractals built by worklist subdivision.

pub mod subdivide;
pub mod visual;

pub use subdivide::{depth_for, subdivide, Cell, Rule, MAX_DEPTH};
pub use visual::FractalVisual;
