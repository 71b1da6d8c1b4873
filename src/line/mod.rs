//! Per-entity target lines: lifecycle, sampling and draw emission.

/// The per-entity lifecycle controller.
pub mod controller;
pub mod draw;
/// Curve sample buffers and the adaptive sample count.
pub mod samples;
/// Line states and first-person blending.
pub mod state;

pub use controller::{FrameContext, TargetLine};
pub use draw::{DrawCommand, LineTexture};
pub use samples::{LinePoint, SampleBuffer};
pub use state::LineState;
