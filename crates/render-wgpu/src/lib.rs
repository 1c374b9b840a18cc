//! wgpu render backend for the rayview host loop.
//!
//! The ray tracer itself is a WGSL fragment shader drawn across a full-screen
//! quad; this crate owns the quad geometry, the per-frame uniform block, and
//! the hot-reloadable render pipeline.
//!
//! # Invariants
//! - Every uniform field is rewritten on every publish; the shader has no
//!   persistent state between frames.
//! - A failed shader reload leaves the previous pipeline active.
//! - The quad buffer is allocated exactly once, during renderer setup.

mod params;
mod pipeline;
mod quad;
mod renderer;

pub use params::{animated_light_position, ParameterFeed, RayParams};
pub use pipeline::{RaytracePipeline, ShaderError, DEFAULT_SHADER};
pub use quad::FullscreenQuad;
pub use renderer::RaytraceRenderer;
