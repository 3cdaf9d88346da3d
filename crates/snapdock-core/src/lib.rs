//! Core runtime for snapdock
//!
//! Everything runs on one UI event loop. Gesture handlers, animation frame
//! callbacks and hosted-surface signals are queued as discrete tasks and
//! drained by the host; nothing here blocks or spawns threads.

mod frame_clock;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use runtime::{Runtime, RuntimeHandle};

pub type FrameCallbackId = u64;

/// Nanoseconds per millisecond, for converting between frame time units.
pub const NANOS_PER_MILLI: u64 = 1_000_000;

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
