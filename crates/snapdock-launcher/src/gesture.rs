//! Press/drag bookkeeping for a single gesture.
//!
//! A [`DragSession`] lives from pointer-down to pointer-up. It records the
//! launcher position captured at grant time and the pointer's travel since,
//! so the dragged position is always `origin + delta` and never depends on
//! state left over from an earlier gesture.

use crate::snap::{SnapBounds, SnapTarget};
use snapdock_foundation::gesture_constants::exceeds_slop;
use snapdock_geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    origin: Point,
    pointer_start: Point,
    delta: Point,
    exceeded_slop: bool,
}

/// Result of feeding a pointer move into a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragStep {
    /// Still inside the tap slop; the launcher does not move.
    WithinSlop,
    /// This move crossed the slop; the gesture is now a drag.
    Started,
    Moved,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReleaseOutcome {
    Tap,
    Snap(SnapTarget),
}

impl DragSession {
    pub fn grant(origin: Point, pointer: Point) -> Self {
        Self {
            origin,
            pointer_start: pointer,
            delta: Point::ZERO,
            exceeded_slop: false,
        }
    }

    pub fn track(&mut self, pointer: Point, slop: f32) -> DragStep {
        self.delta = pointer - self.pointer_start;
        if self.exceeded_slop {
            DragStep::Moved
        } else if exceeds_slop(self.delta.x, self.delta.y, slop) {
            self.exceeded_slop = true;
            DragStep::Started
        } else {
            DragStep::WithinSlop
        }
    }

    /// Where the launcher is drawn right now.
    pub fn position(&self) -> Point {
        if self.exceeded_slop {
            self.raw_position()
        } else {
            self.origin
        }
    }

    /// `origin + delta`, regardless of slop.
    pub fn raw_position(&self) -> Point {
        self.origin + self.delta
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn delta(&self) -> Point {
        self.delta
    }

    pub fn is_drag(&self) -> bool {
        self.exceeded_slop
    }

    /// Finish the gesture at `pointer`.
    pub fn release(mut self, pointer: Point, slop: f32, bounds: &SnapBounds) -> ReleaseOutcome {
        self.track(pointer, slop);
        if self.exceeded_slop {
            ReleaseOutcome::Snap(bounds.resolve(self.raw_position()))
        } else {
            ReleaseOutcome::Tap
        }
    }
}
