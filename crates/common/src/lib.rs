//! Shared types for the rayview host loop.
//!
//! # Invariants
//! - Out-of-range input is clamped or ignored, never an error.
//! - `FrameTiming::delta` is non-negative and finite.

mod timing;
mod types;

pub use timing::FrameTiming;
pub use types::{QualitySettings, Viewport, MAX_RAY_DEPTH, MIN_RAY_DEPTH};
