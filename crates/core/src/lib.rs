#![deny(unsafe_code)]
//! Core of the motif generative gallery.
//!
//! Provides the `Visual` trait, the `Controller` lifecycle state machine and
//! its scheduler/surface abstractions, the deterministic `Xorshift64` PRNG
//! and low-discrepancy samplers, the fixed-capacity element `Store`, stepper
//! primitives (discrete maps, Euler flows, vector fields, escape/reseed
//! policies), and the `Surface`/`Compositor` raster pipeline.

pub mod color;
pub mod compositor;
pub mod error;
pub mod field;
pub mod lifecycle;
pub mod prng;
pub mod sampler;
pub mod seed;
pub mod stepper;
pub mod store;
pub mod surface;
pub mod visual;

pub use color::{Palette, Srgb};
pub use compositor::{steady_state_luminance, BlendMode, Compositor, Projection};
pub use error::EngineError;
pub use field::{AdvectMode, FieldSource};
pub use lifecycle::{
    run_headless, Controller, FrameHandle, FrameScheduler, HeadlessScheduler, LifecycleState,
    RasterProvider, SurfaceProvider, TickOutcome,
};
pub use prng::Xorshift64;
pub use sampler::{golden_angle, halton, HaltonSampler, Sampler};
pub use seed::Seed;
pub use stepper::{DiscreteMap, EscapePolicy, Flow, Reseed};
pub use store::{Element, ElementState, Store};
pub use surface::{Surface, SurfaceDescriptor};
pub use visual::{FrameClock, Visual};
