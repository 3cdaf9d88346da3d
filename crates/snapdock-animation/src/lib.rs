//! Animation system for snapdock
//!
//! Provides frame-driven animations with easing curves and spring physics.
//! An [`Animatable`] registers one frame callback at a time with the runtime
//! and reports how each animation ended through an optional listener.

mod animation;

pub use animation::*;

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
