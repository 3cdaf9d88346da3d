//! Inputs from the host's theme and safe-area providers.

use snapdock_geometry::{Color, EdgeInsets, Size};

/// Color tokens the launcher draws with. Purely presentational.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LauncherTheme {
    pub accent: Color,
    pub dark: bool,
}

impl LauncherTheme {
    pub fn light(accent: Color) -> Self {
        Self {
            accent,
            dark: false,
        }
    }

    pub fn dark(accent: Color) -> Self {
        Self { accent, dark: true }
    }

    pub fn foreground(&self) -> Color {
        Color::WHITE
    }

    /// Shadow elevation; dark surfaces already separate the button, so it drops lower.
    pub fn elevation(&self) -> f32 {
        if self.dark {
            4.0
        } else {
            8.0
        }
    }
}

impl Default for LauncherTheme {
    fn default() -> Self {
        Self::light(Color::from_rgb_u8(0x4c, 0xaf, 0x50))
    }
}

/// Screen size plus the safe-area insets reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Viewport {
    pub size: Size,
    pub insets: EdgeInsets,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            insets: EdgeInsets::default(),
        }
    }

    pub fn with_insets(mut self, insets: EdgeInsets) -> Self {
        self.insets = insets;
        self
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }
}
