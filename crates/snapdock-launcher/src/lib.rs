//! Floating draggable chat launcher.
//!
//! A round button that floats over the app, can be dragged anywhere, snaps
//! to the nearest horizontal edge when released and opens a full-screen chat
//! overlay when tapped.
//!
//! The launcher performs no I/O. The host feeds it pointer events, pumps the
//! [`snapdock_core::Runtime`] once per frame and draws [`LauncherVisual`].

pub mod chat;
pub mod gesture;
pub mod launcher;
pub mod presentation;
pub mod settings;
pub mod snap;
pub mod theme;

pub use chat::{
    ChatBackend, ChatError, ChatMessage, ChatReply, ChatRequest, ChatRole, ChatSurface,
};
pub use gesture::{DragSession, DragStep, ReleaseOutcome};
pub use launcher::{FloatingLauncher, GesturePhase, LauncherVisual};
pub use presentation::{
    CollapseReason, HostedSurface, PresentationController, PresentationState, SurfaceCallbacks,
    SurfaceSignal,
};
pub use settings::{LauncherSettings, SettingsError};
pub use snap::{SnapBounds, SnapSide, SnapTarget};
pub use theme::{LauncherTheme, Viewport};

pub mod prelude {
    pub use crate::launcher::{FloatingLauncher, GesturePhase, LauncherVisual};
    pub use crate::presentation::{CollapseReason, PresentationState, SurfaceSignal};
    pub use crate::settings::LauncherSettings;
    pub use crate::snap::{SnapSide, SnapTarget};
    pub use crate::theme::{LauncherTheme, Viewport};
}

#[cfg(test)]
#[path = "tests/snap_tests.rs"]
mod snap_tests;

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod gesture_tests;

#[cfg(test)]
#[path = "tests/presentation_tests.rs"]
mod presentation_tests;

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod chat_tests;

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod settings_tests;
