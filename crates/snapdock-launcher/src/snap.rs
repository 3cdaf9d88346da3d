//! Edge snapping: where the launcher comes to rest.
//!
//! Everything here is a pure function of the viewport and settings. At rest
//! the launcher's x is always exactly one of the two edge offsets.

use crate::settings::LauncherSettings;
use crate::theme::Viewport;
use snapdock_geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SnapSide {
    Left,
    Right,
}

/// Resolved rest position for a released drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapTarget {
    pub side: SnapSide,
    pub position: Point,
}

/// Rest-position solver for one viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapBounds {
    screen_width: f32,
    margin: f32,
    button_size: f32,
    min_y: f32,
    max_y: f32,
    anchor_top: f32,
    anchor_bottom: f32,
}

impl SnapBounds {
    pub fn new(viewport: &Viewport, settings: &LauncherSettings) -> Self {
        let top = finite_inset("top", viewport.insets.top);
        let bottom = finite_inset("bottom", viewport.insets.bottom);
        let min_y = top + settings.edge_clamp_padding;
        let max_y = viewport.height()
            - bottom
            - settings.button_size
            - settings.edge_clamp_padding;
        if max_y < min_y {
            log::warn!(
                "viewport {}x{} too short for vertical clamp [{min_y}, {max_y}]; pinning to top bound",
                viewport.width(),
                viewport.height()
            );
        }
        Self {
            screen_width: viewport.width(),
            margin: settings.margin,
            button_size: settings.button_size,
            min_y,
            max_y,
            anchor_top: top + settings.top_reservation,
            anchor_bottom: viewport.height() - bottom - settings.bottom_reservation,
        }
    }

    /// x offset of the launcher when resting on `side`.
    pub fn edge_x(&self, side: SnapSide) -> f32 {
        match side {
            SnapSide::Left => self.margin,
            SnapSide::Right => self.screen_width - self.margin - self.button_size,
        }
    }

    /// Left of the screen midline snaps left; the midline itself snaps right.
    pub fn side_for(&self, x: f32) -> SnapSide {
        if x < self.screen_width / 2.0 {
            SnapSide::Left
        } else {
            SnapSide::Right
        }
    }

    pub fn vertical_range(&self) -> (f32, f32) {
        (self.min_y, self.max_y.max(self.min_y))
    }

    pub fn clamp_y(&self, y: f32) -> f32 {
        let (min_y, max_y) = self.vertical_range();
        if y.is_nan() {
            return min_y;
        }
        y.clamp(min_y, max_y)
    }

    /// Rest position on `side` at height `y` (clamped).
    pub fn anchor(&self, side: SnapSide, y: f32) -> SnapTarget {
        SnapTarget {
            side,
            position: Point::new(self.edge_x(side), self.clamp_y(y)),
        }
    }

    pub fn resolve(&self, raw: Point) -> SnapTarget {
        self.anchor(self.side_for(raw.x), raw.y)
    }

    /// Initial placement: right edge, centered between the reserved top and
    /// bottom bands of the safe area.
    pub fn default_anchor(&self) -> SnapTarget {
        let centered = self.anchor_top + (self.anchor_bottom - self.anchor_top - self.button_size) / 2.0;
        self.anchor(SnapSide::Right, centered)
    }
}

fn finite_inset(edge: &str, inset: f32) -> f32 {
    if inset.is_finite() {
        inset
    } else {
        log::warn!("ignoring non-finite {edge} inset {inset}");
        0.0
    }
}
