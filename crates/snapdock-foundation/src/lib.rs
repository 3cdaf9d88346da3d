//! Foundation layer shared by snapdock components: pointer events, gesture
//! thresholds and capability traits the host platform may provide.

pub mod gesture_constants;
pub mod haptics;
pub mod input;

pub use haptics::{HapticFeedback, HapticKind, RecordingHaptics};
pub use input::{PointerEvent, PointerEventKind, PointerId, PointerPhase};

pub mod prelude {
    pub use crate::gesture_constants::*;
    pub use crate::haptics::{HapticFeedback, HapticKind};
    pub use crate::input::{PointerEvent, PointerEventKind, PointerId, PointerPhase};
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
