//! Tactile feedback as an optional platform capability.
//!
//! Components never check which platform they run on. The host hands them a
//! [`HapticFeedback`] implementation when the device can vibrate, and nothing
//! otherwise.

use std::cell::RefCell;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HapticKind {
    /// The pointer went down on the button.
    DragStart,
    /// A press was recognised as a tap.
    Tap,
}

pub trait HapticFeedback {
    fn perform(&self, kind: HapticKind, duration: Duration);
}

/// Records every pulse instead of vibrating. Used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    pulses: RefCell<Vec<(HapticKind, Duration)>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulses(&self) -> Vec<(HapticKind, Duration)> {
        self.pulses.borrow().clone()
    }

    pub fn count(&self, kind: HapticKind) -> usize {
        self.pulses
            .borrow()
            .iter()
            .filter(|(recorded, _)| *recorded == kind)
            .count()
    }
}

impl HapticFeedback for RecordingHaptics {
    fn perform(&self, kind: HapticKind, duration: Duration) {
        log::trace!("haptic {kind:?} for {duration:?}");
        self.pulses.borrow_mut().push((kind, duration));
    }
}
