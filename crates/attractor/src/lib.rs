#![deny(unsafe_code)]
//! Chaotic orbits for the motif gallery.
//!
//! Discrete maps (Hénon, Ikeda, Lozi, Tinkerbell, Gingerbread-man,
//! Gumowski–Mira) drawn as point clouds, damped Newton walkers on `z³ − 1`,
//! and Euler-integrated flows (Lorenz, Aizawa, Rössler, Rabinovich–Fabrikant,
//! Dadras, Thomas) drawn as projected trails.

pub mod flows;
pub mod maps;
pub mod newton;
pub mod visual;

pub use flows::{Aizawa, Dadras, FlowModel, Lorenz, RabinovichFabrikant, Rossler, Thomas};
pub use maps::{Gingerbread, GumowskiMira, Henon, Ikeda, Lozi, MapModel, Tinkerbell};
pub use newton::NewtonCubic;
pub use visual::{FlowVisual, MapVisual, NewtonVisual, OrbitTrap};
