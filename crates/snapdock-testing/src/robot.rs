//! Robot-style driver for the floating launcher.
//!
//! The robot owns a [`Runtime`], a [`FloatingLauncher`] and a fake frame
//! clock. Interactions are expressed in screen coordinates the way a finger
//! would perform them, and time only moves when the test advances it.
//!
//! # Example
//!
//! ```
//! use snapdock_testing::LauncherRobot;
//! use snapdock_launcher::SnapSide;
//!
//! let mut robot = LauncherRobot::new(400.0, 800.0);
//! let start = robot.button_center();
//! robot.drag(start, start.offset(-200.0, 0.0), 10);
//! robot.wait_for_idle();
//! assert_eq!(robot.launcher().side(), SnapSide::Left);
//! ```

use snapdock_core::Runtime;
use snapdock_foundation::{HapticFeedback, PointerEvent, RecordingHaptics};
use snapdock_geometry::Point;
use snapdock_launcher::{
    FloatingLauncher, HostedSurface, LauncherSettings, LauncherTheme, LauncherVisual, Viewport,
};
use std::rc::Rc;

/// ~60 FPS.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Frames `wait_for_idle` will pump before giving up.
pub const MAX_IDLE_FRAMES: usize = 600;

pub struct LauncherRobot {
    runtime: Runtime,
    launcher: FloatingLauncher,
    haptics: Rc<RecordingHaptics>,
    frame_time_nanos: u64,
    frames: Vec<LauncherVisual>,
}

impl LauncherRobot {
    /// Robot with default settings and no safe-area insets.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_viewport(Viewport::new(width, height), LauncherSettings::default())
    }

    pub fn with_viewport(viewport: Viewport, settings: LauncherSettings) -> Self {
        let runtime = Runtime::new();
        let haptics = Rc::new(RecordingHaptics::new());
        let launcher =
            match FloatingLauncher::new(settings, viewport, LauncherTheme::default(), runtime.handle()) {
                Ok(launcher) => launcher,
                Err(err) => panic!("robot launcher settings rejected: {err}"),
            };
        let launcher = launcher.with_haptics(Rc::clone(&haptics) as Rc<dyn HapticFeedback>);
        Self {
            runtime,
            launcher,
            haptics,
            frame_time_nanos: 0,
            frames: Vec::new(),
        }
    }

    pub fn with_surface(mut self, surface: impl HostedSurface + 'static) -> Self {
        self.launcher = self.launcher.with_surface(surface);
        self
    }

    pub fn launcher(&self) -> &FloatingLauncher {
        &self.launcher
    }

    pub fn launcher_mut(&mut self) -> &mut FloatingLauncher {
        &mut self.launcher
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn haptics(&self) -> &RecordingHaptics {
        &self.haptics
    }

    pub fn visual(&self) -> LauncherVisual {
        self.launcher.visual()
    }

    /// Every visual captured by `advance_frame`, oldest first.
    pub fn recorded_frames(&self) -> &[LauncherVisual] {
        &self.frames
    }

    pub fn clear_recorded_frames(&mut self) {
        self.frames.clear();
    }

    /// Center of the button as currently drawn.
    pub fn button_center(&self) -> Point {
        self.visual().bounds().center()
    }

    pub fn press(&mut self, at: Point) -> bool {
        let handled = self.launcher.on_pointer_event(&PointerEvent::down(at.x, at.y));
        self.runtime.drain_ui();
        handled
    }

    pub fn move_to(&mut self, to: Point) -> bool {
        let handled = self.launcher.on_pointer_event(&PointerEvent::moved(to.x, to.y));
        self.runtime.drain_ui();
        handled
    }

    pub fn release(&mut self, at: Point) -> bool {
        let handled = self.launcher.on_pointer_event(&PointerEvent::up(at.x, at.y));
        self.runtime.drain_ui();
        handled
    }

    pub fn cancel(&mut self) -> bool {
        let position = self.button_center();
        let handled = self
            .launcher
            .on_pointer_event(&PointerEvent::cancel(position.x, position.y));
        self.runtime.drain_ui();
        handled
    }

    /// Press and release at the same point.
    pub fn tap(&mut self, at: Point) -> bool {
        let pressed = self.press(at);
        self.release(at) && pressed
    }

    /// Press at `from`, move in `steps` equal increments, release at `to`.
    ///
    /// One frame elapses between moves.
    pub fn drag(&mut self, from: Point, to: Point, steps: usize) {
        let steps = steps.max(1);
        self.press(from);
        for step in 1..=steps {
            let fraction = step as f32 / steps as f32;
            let point = Point::new(
                from.x + (to.x - from.x) * fraction,
                from.y + (to.y - from.y) * fraction,
            );
            self.move_to(point);
            self.advance_frame();
        }
        self.release(to);
    }

    /// Advance the fake clock by one frame and run frame callbacks and UI tasks.
    pub fn advance_frame(&mut self) {
        self.frame_time_nanos += FRAME_NANOS;
        self.runtime.drain_frame_callbacks(self.frame_time_nanos);
        self.runtime.drain_ui();
        self.frames.push(self.launcher.visual());
    }

    pub fn advance_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.advance_frame();
        }
    }

    pub fn advance_millis(&mut self, millis: u64) {
        let frames = (millis * 1_000_000).div_ceil(FRAME_NANOS);
        self.advance_frames(frames as usize);
    }

    /// Pump frames until no animation is pending. Returns the frames pumped.
    pub fn wait_for_idle(&mut self) -> usize {
        self.runtime.drain_ui();
        let mut pumped = 0;
        while self.runtime.needs_frame() {
            if pumped == MAX_IDLE_FRAMES {
                log::warn!("launcher still animating after {MAX_IDLE_FRAMES} frames");
                break;
            }
            self.advance_frame();
            pumped += 1;
        }
        pumped
    }

    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }
}
