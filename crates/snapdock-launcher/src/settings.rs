//! Launcher tuning values.

use snapdock_animation::{AnimationSpec, AnimationType, Easing, SpringSpec};
use std::fmt;
use std::time::Duration;

/// Below this the settle rings for seconds before coming to rest.
pub const MIN_SETTLE_DAMPING_RATIO: f32 = 0.2;

/// Geometry, thresholds and animation timings for the floating launcher.
///
/// All lengths are logical pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct LauncherSettings {
    /// Gap between the button and the screen edge it snaps to.
    pub margin: f32,
    /// Width and height of the round button.
    pub button_size: f32,
    /// Space kept free below the top inset when placing the default anchor.
    pub top_reservation: f32,
    /// Space kept free above the bottom inset when placing the default anchor.
    pub bottom_reservation: f32,
    /// Minimum distance from the safe area's top and bottom after a drag.
    pub edge_clamp_padding: f32,
    pub tap_slop: f32,
    pub press_scale: f32,
    pub press_opacity: f32,
    pub press_duration_millis: u64,
    pub tap_scale: f32,
    pub tap_pulse_millis: u64,
    pub settle_tension: f32,
    pub settle_friction: f32,
    pub drag_haptic_millis: u64,
    pub tap_haptic_millis: u64,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            margin: 20.0,
            button_size: 60.0,
            top_reservation: 80.0,
            bottom_reservation: 100.0,
            edge_clamp_padding: 60.0,
            tap_slop: snapdock_foundation::gesture_constants::TAP_SLOP,
            press_scale: 1.05,
            press_opacity: 0.9,
            press_duration_millis: 150,
            tap_scale: 0.95,
            tap_pulse_millis: 100,
            settle_tension: 300.0,
            settle_friction: 20.0,
            drag_haptic_millis: 50,
            tap_haptic_millis: 10,
        }
    }
}

impl LauncherSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_button_size(mut self, size: f32) -> Self {
        self.button_size = size;
        self
    }

    pub fn with_reservations(mut self, top: f32, bottom: f32) -> Self {
        self.top_reservation = top;
        self.bottom_reservation = bottom;
        self
    }

    pub fn with_edge_clamp_padding(mut self, padding: f32) -> Self {
        self.edge_clamp_padding = padding;
        self
    }

    pub fn with_tap_slop(mut self, slop: f32) -> Self {
        self.tap_slop = slop;
        self
    }

    pub fn with_settle_spring(mut self, tension: f32, friction: f32) -> Self {
        self.settle_tension = tension;
        self.settle_friction = friction;
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let lengths = [
            ("margin", self.margin),
            ("top_reservation", self.top_reservation),
            ("bottom_reservation", self.bottom_reservation),
            ("edge_clamp_padding", self.edge_clamp_padding),
            ("tap_slop", self.tap_slop),
        ];
        let positives = [
            ("button_size", self.button_size),
            ("press_scale", self.press_scale),
            ("press_opacity", self.press_opacity),
            ("tap_scale", self.tap_scale),
            ("settle_tension", self.settle_tension),
            ("settle_friction", self.settle_friction),
        ];

        for &(field, value) in lengths.iter().chain(positives.iter()) {
            if !value.is_finite() {
                return Err(SettingsError::NonFinite { field });
            }
        }
        for (field, value) in lengths {
            if value < 0.0 {
                return Err(SettingsError::Negative { field, value });
            }
        }
        for (field, value) in positives {
            if value <= 0.0 {
                return Err(SettingsError::NonPositive { field, value });
            }
        }
        let spring = self.settle_spring();
        if !(spring.stiffness > 0.0 && spring.damping_ratio >= MIN_SETTLE_DAMPING_RATIO) {
            return Err(SettingsError::DegenerateSpring {
                tension: self.settle_tension,
                friction: self.settle_friction,
            });
        }
        Ok(())
    }

    pub fn settle_spring(&self) -> SpringSpec {
        SpringSpec::from_tension_friction(self.settle_tension, self.settle_friction)
    }

    pub(crate) fn settle_animation(&self) -> AnimationType {
        AnimationType::Spring(self.settle_spring())
    }

    pub(crate) fn press_animation(&self) -> AnimationType {
        AnimationType::Tween(AnimationSpec::tween(self.press_duration_millis, Easing::EaseOut))
    }

    pub(crate) fn tap_pulse_animation(&self) -> AnimationType {
        AnimationType::Tween(AnimationSpec::tween(self.tap_pulse_millis, Easing::EaseInOut))
    }

    pub fn drag_haptic(&self) -> Duration {
        Duration::from_millis(self.drag_haptic_millis)
    }

    pub fn tap_haptic(&self) -> Duration {
        Duration::from_millis(self.tap_haptic_millis)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    NonFinite { field: &'static str },
    Negative { field: &'static str, value: f32 },
    NonPositive { field: &'static str, value: f32 },
    DegenerateSpring { tension: f32, friction: f32 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::NonFinite { field } => write!(f, "{field} must be finite"),
            SettingsError::Negative { field, value } => {
                write!(f, "{field} must not be negative (got {value})")
            }
            SettingsError::NonPositive { field, value } => {
                write!(f, "{field} must be greater than zero (got {value})")
            }
            SettingsError::DegenerateSpring { tension, friction } => write!(
                f,
                "tension {tension} / friction {friction} give a spring too bouncy to settle"
            ),
        }
    }
}

impl std::error::Error for SettingsError {}
