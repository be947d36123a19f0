#![deny(unsafe_code)]
//! Visual registry: maps visual names to implementations and renders them
//! headlessly.
//!
//! This crate sits between `motif-core` (which defines the `Visual` trait
//! and the lifecycle controller) and the individual visual crates. The CLI
//! depends on it so name dispatch lives in one place.

pub mod headless;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

#[cfg(test)]
mod scenarios;

use motif_advection::{CurlVisual, VortexVisual};
use motif_attractor::{
    Aizawa, Dadras, FlowVisual, Gingerbread, GumowskiMira, Henon, Ikeda, Lorenz, Lozi,
    MapVisual, NewtonVisual, RabinovichFabrikant, Rossler, Thomas, Tinkerbell,
};
use motif_core::color::Srgb;
use motif_core::compositor::Compositor;
use motif_core::error::EngineError;
use motif_core::prng::Xorshift64;
use motif_core::surface::SurfaceDescriptor;
use motif_core::visual::{FrameClock, Visual};
use motif_fractal::FractalVisual;
use motif_waves::{CausticVisual, RippleVisual, SolitonVisual, ThetaVisual};
use serde_json::Value;

pub use headless::{render, Rendered};

/// All available visual names, grouped by family.
const VISUAL_NAMES: &[&str] = &[
    "henon",
    "ikeda",
    "lozi",
    "tinkerbell",
    "gingerbread",
    "gumowski-mira",
    "newton",
    "lorenz",
    "aizawa",
    "rossler",
    "rabinovich-fabrikant",
    "dadras",
    "thomas",
    "vortex",
    "curl",
    "ripple",
    "caustic",
    "theta",
    "soliton",
    "dust",
    "carpet",
];

/// Enumeration of every registered visual.
///
/// Wraps each implementation and delegates the `Visual` trait methods.
/// Use [`VisualKind::from_name`] for string-based construction.
pub enum VisualKind {
    Henon(MapVisual<Henon>),
    Ikeda(MapVisual<Ikeda>),
    Lozi(MapVisual<Lozi>),
    Tinkerbell(MapVisual<Tinkerbell>),
    Gingerbread(MapVisual<Gingerbread>),
    GumowskiMira(MapVisual<GumowskiMira>),
    Newton(NewtonVisual),
    Lorenz(FlowVisual<Lorenz>),
    Aizawa(FlowVisual<Aizawa>),
    Rossler(FlowVisual<Rossler>),
    RabinovichFabrikant(FlowVisual<RabinovichFabrikant>),
    Dadras(FlowVisual<Dadras>),
    Thomas(FlowVisual<Thomas>),
    Vortex(VortexVisual),
    Curl(CurlVisual),
    Ripple(RippleVisual),
    Caustic(CausticVisual),
    Theta(ThetaVisual),
    Soliton(SolitonVisual),
    /// Cantor dust or Sierpinski carpet.
    Fractal(FractalVisual),
}

/// Runs `$body` with `$v` bound to the wrapped visual, whatever the variant.
macro_rules! each_visual {
    ($kind:expr, $v:ident => $body:expr) => {
        match $kind {
            VisualKind::Henon($v) => $body,
            VisualKind::Ikeda($v) => $body,
            VisualKind::Lozi($v) => $body,
            VisualKind::Tinkerbell($v) => $body,
            VisualKind::Gingerbread($v) => $body,
            VisualKind::GumowskiMira($v) => $body,
            VisualKind::Newton($v) => $body,
            VisualKind::Lorenz($v) => $body,
            VisualKind::Aizawa($v) => $body,
            VisualKind::Rossler($v) => $body,
            VisualKind::RabinovichFabrikant($v) => $body,
            VisualKind::Dadras($v) => $body,
            VisualKind::Thomas($v) => $body,
            VisualKind::Vortex($v) => $body,
            VisualKind::Curl($v) => $body,
            VisualKind::Ripple($v) => $body,
            VisualKind::Caustic($v) => $body,
            VisualKind::Theta($v) => $body,
            VisualKind::Soliton($v) => $body,
            VisualKind::Fractal($v) => $body,
        }
    };
}

impl VisualKind {
    /// Constructs a visual with its default parameters.
    ///
    /// Returns `EngineError::UnknownVisual` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        Ok(match name {
            "henon" => VisualKind::Henon(MapVisual::default()),
            "ikeda" => VisualKind::Ikeda(MapVisual::default()),
            "lozi" => VisualKind::Lozi(MapVisual::default()),
            "tinkerbell" => VisualKind::Tinkerbell(MapVisual::default()),
            "gingerbread" => VisualKind::Gingerbread(MapVisual::default()),
            "gumowski-mira" => VisualKind::GumowskiMira(MapVisual::default()),
            "newton" => VisualKind::Newton(NewtonVisual::default()),
            "lorenz" => VisualKind::Lorenz(FlowVisual::default()),
            "aizawa" => VisualKind::Aizawa(FlowVisual::default()),
            "rossler" => VisualKind::Rossler(FlowVisual::default()),
            "rabinovich-fabrikant" => VisualKind::RabinovichFabrikant(FlowVisual::default()),
            "dadras" => VisualKind::Dadras(FlowVisual::default()),
            "thomas" => VisualKind::Thomas(FlowVisual::default()),
            "vortex" => VisualKind::Vortex(VortexVisual::default()),
            "curl" => VisualKind::Curl(CurlVisual::default()),
            "ripple" => VisualKind::Ripple(RippleVisual::default()),
            "caustic" => VisualKind::Caustic(CausticVisual::default()),
            "theta" => VisualKind::Theta(ThetaVisual::default()),
            "soliton" => VisualKind::Soliton(SolitonVisual::default()),
            "dust" => VisualKind::Fractal(FractalVisual::dust()),
            "carpet" => VisualKind::Fractal(FractalVisual::carpet()),
            _ => return Err(EngineError::UnknownVisual(name.to_string())),
        })
    }

    /// Returns a slice of all recognized visual names.
    pub fn list_visuals() -> &'static [&'static str] {
        VISUAL_NAMES
    }
}

impl Visual for VisualKind {
    fn name(&self) -> &'static str {
        each_visual!(self, v => v.name())
    }

    fn seed(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        each_visual!(self, v => v.seed(viewport, rng))
    }

    fn step(&mut self, clock: &FrameClock, rng: &mut Xorshift64) {
        each_visual!(self, v => v.step(clock, rng))
    }

    fn paint(&self, canvas: &mut Compositor<'_>, clock: &FrameClock) {
        each_visual!(self, v => v.paint(canvas, clock))
    }

    fn resize(&mut self, viewport: SurfaceDescriptor, rng: &mut Xorshift64) {
        each_visual!(self, v => v.resize(viewport, rng))
    }

    fn release(&mut self) {
        each_visual!(self, v => v.release())
    }

    fn background(&self) -> Srgb {
        each_visual!(self, v => v.background())
    }

    fn params(&self) -> Value {
        each_visual!(self, v => v.params())
    }

    fn element_count(&self) -> usize {
        each_visual!(self, v => v.element_count())
    }
}
