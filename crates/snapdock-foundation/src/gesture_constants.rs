//! Shared gesture constants for touch/pointer handling.
//!
//! Values are in logical pixels.

/// Movement allowed between press and release for the gesture to still count
/// as a tap.
///
/// Movement strictly greater than this on either axis turns the press into a
/// drag. The floating launcher is small and sits over scrolling content, so
/// this is much tighter than a scroll slop.
pub const TAP_SLOP: f32 = 3.0;

/// Whether a pointer delta has left the tap slop on either axis.
pub fn exceeds_slop(dx: f32, dy: f32, slop: f32) -> bool {
    dx.abs() > slop || dy.abs() > slop
}
