#![deny(unsafe_code)]
//! Analytic wave visuals: every frame is a pure function of time.

pub mod lattice;
pub mod soliton;
pub mod special;

pub use lattice::{Caustic, LatticeVisual, Ripple, Theta, WaveField};
pub use soliton::{SolitonParams, SolitonVisual};

pub type RippleVisual = LatticeVisual<Ripple>;
pub type CausticVisual = LatticeVisual<Caustic>;
pub type ThetaVisual = LatticeVisual<Theta>;
