//! Fly camera for the rayview host loop.
//!
//! # Invariants
//! - `front`/`right`/`up` always form a right-handed orthonormal basis
//!   derived from the current yaw/pitch; `up` is never mutated independently.
//! - Pitch stays strictly inside the clamp interval; zoom stays in range.
//! - Out-of-range input is clamped, never an error.

mod controller;

pub use controller::{FlyCamera, MoveDirection, MAX_ZOOM_DEG, MIN_ZOOM_DEG, PITCH_LIMIT_DEG};
