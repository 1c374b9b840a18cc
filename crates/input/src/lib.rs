//! Raw window/device events mapped to semantic camera commands.
//!
//! # Invariants
//! - The camera only consumes normalized deltas; it never sees raw events.
//! - Look deltas are tracked even while looking is disabled, so re-enabling
//!   the look button never produces a stale jump.
//! - The first cursor sample after startup or focus regain yields a zero
//!   effective delta.

mod router;

pub use router::{InputRouter, KeyQuery, PointerButton};
