//! The floating draggable launcher.
//!
//! Gesture lifecycle: `Idle -> Pressed -> (Dragging) -> Settling -> Idle`.
//! The committed rest position is written once, at release, from the pure
//! snap solver; the animated values only chase it. A grant that lands while
//! the previous settle is still running stops those animations where they
//! are and starts the new drag from the displayed position, so there is no
//! hidden offset to drift.

use crate::gesture::{DragSession, DragStep, ReleaseOutcome};
use crate::presentation::{
    CollapseReason, HostedSurface, PresentationController, PresentationState, SurfaceSignal,
};
use crate::settings::{LauncherSettings, SettingsError};
use crate::snap::{SnapBounds, SnapSide, SnapTarget};
use crate::theme::{LauncherTheme, Viewport};
use snapdock_animation::{Animatable, AnimationEndReason};
use snapdock_core::RuntimeHandle;
use snapdock_foundation::{HapticFeedback, HapticKind, PointerEvent, PointerEventKind};
use snapdock_geometry::{Color, Point, Rect, Size};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// At rest on an edge.
    Idle,
    /// Pointer down, still within the tap slop.
    Pressed,
    /// Pointer down and tracking movement.
    Dragging,
    /// Released; animating to the committed rest position.
    Settling,
}

/// Everything a renderer needs to draw the button for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LauncherVisual {
    pub position: Point,
    pub size: Size,
    pub scale: f32,
    pub opacity: f32,
    pub side: SnapSide,
    pub phase: GesturePhase,
    pub presentation: PresentationState,
    pub background: Color,
    pub foreground: Color,
    pub elevation: f32,
}

impl LauncherVisual {
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

enum GestureState {
    Idle,
    Active(DragSession),
    Settling { generation: u64 },
}

/// Completion tracking for the animations started by one settle.
///
/// Listeners of superseded settles carry an old generation and are ignored.
#[derive(Default)]
struct SettleGroup {
    generation: Cell<u64>,
    pending: Cell<usize>,
}

impl SettleGroup {
    fn begin(&self, members: usize) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.pending.set(members);
        generation
    }

    fn supersede(&self) {
        self.generation.set(self.generation.get() + 1);
        self.pending.set(0);
    }

    fn member_finished(&self, generation: u64) {
        if self.generation.get() != generation {
            return;
        }
        let remaining = self.pending.get().saturating_sub(1);
        self.pending.set(remaining);
        if remaining == 0 {
            log::debug!("settle {generation} finished");
        }
    }

    fn is_settled(&self, generation: u64) -> bool {
        self.generation.get() == generation && self.pending.get() == 0
    }

    fn listener(self: &Rc<Self>, generation: u64) -> impl FnOnce(AnimationEndReason, f32) + 'static {
        let group = Rc::clone(self);
        move |reason, _| {
            if reason == AnimationEndReason::Finished {
                group.member_finished(generation);
            }
        }
    }
}

pub struct FloatingLauncher {
    settings: LauncherSettings,
    viewport: Viewport,
    theme: LauncherTheme,
    bounds: SnapBounds,
    rest: SnapTarget,
    gesture: GestureState,
    x: Animatable<f32>,
    y: Animatable<f32>,
    scale: Animatable<f32>,
    opacity: Animatable<f32>,
    settle: Rc<SettleGroup>,
    presentation: PresentationController,
    haptics: Option<Rc<dyn HapticFeedback>>,
}

impl FloatingLauncher {
    pub fn new(
        settings: LauncherSettings,
        viewport: Viewport,
        theme: LauncherTheme,
        runtime: RuntimeHandle,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let bounds = SnapBounds::new(&viewport, &settings);
        let rest = bounds.default_anchor();
        log::debug!(
            "launcher anchored {:?} at ({}, {})",
            rest.side,
            rest.position.x,
            rest.position.y
        );
        Ok(Self {
            x: Animatable::new(rest.position.x, runtime.clone()),
            y: Animatable::new(rest.position.y, runtime.clone()),
            scale: Animatable::new(1.0, runtime.clone()),
            opacity: Animatable::new(1.0, runtime.clone()),
            presentation: PresentationController::new(runtime),
            settings,
            viewport,
            theme,
            bounds,
            rest,
            gesture: GestureState::Idle,
            settle: Rc::new(SettleGroup::default()),
            haptics: None,
        })
    }

    pub fn with_surface(self, surface: impl HostedSurface + 'static) -> Self {
        self.presentation.set_surface(surface);
        self
    }

    pub fn with_haptics(mut self, haptics: Rc<dyn HapticFeedback>) -> Self {
        self.haptics = Some(haptics);
        self
    }

    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn bounds(&self) -> &SnapBounds {
        &self.bounds
    }

    pub fn theme(&self) -> LauncherTheme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: LauncherTheme) {
        self.theme = theme;
    }

    /// Committed rest position and side. Changes only when a drag ends or the viewport changes.
    pub fn rest(&self) -> SnapTarget {
        self.rest
    }

    pub fn side(&self) -> SnapSide {
        self.rest.side
    }

    /// Position as currently drawn.
    pub fn position(&self) -> Point {
        Point::new(self.x.value(), self.y.value())
    }

    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    pub fn phase(&self) -> GesturePhase {
        match &self.gesture {
            GestureState::Idle => GesturePhase::Idle,
            GestureState::Active(session) if session.is_drag() => GesturePhase::Dragging,
            GestureState::Active(_) => GesturePhase::Pressed,
            GestureState::Settling { generation } => {
                if self.settle.is_settled(*generation) {
                    GesturePhase::Idle
                } else {
                    GesturePhase::Settling
                }
            }
        }
    }

    pub fn presentation(&self) -> &PresentationController {
        &self.presentation
    }

    pub fn presentation_state(&self) -> PresentationState {
        self.presentation.state()
    }

    pub fn visual(&self) -> LauncherVisual {
        LauncherVisual {
            position: self.position(),
            size: Size::square(self.settings.button_size),
            scale: self.scale(),
            opacity: self.opacity(),
            side: self.rest.side,
            phase: self.phase(),
            presentation: self.presentation.state(),
            background: self.theme.accent,
            foreground: self.theme.foreground(),
            elevation: self.theme.elevation(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        Rect::from_origin_size(self.position(), Size::square(self.settings.button_size))
            .contains(point.x, point.y)
    }

    /// Show the chat overlay. No-op while it is already shown.
    pub fn expand(&self) -> bool {
        self.presentation.expand()
    }

    pub fn collapse(&self, reason: CollapseReason) -> bool {
        self.presentation.collapse(reason)
    }

    /// Close and minimize both collapse the overlay.
    pub fn handle_surface_signal(&self, signal: SurfaceSignal) -> bool {
        self.collapse(signal.collapse_reason())
    }

    /// Dispatch a pointer event. Returns `true` and consumes the event when the launcher handled it.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> bool {
        if event.is_consumed() {
            return false;
        }
        let handled = match event.kind {
            PointerEventKind::Down => self.pointer_down(event.position),
            PointerEventKind::Move => self.pointer_move(event.position),
            PointerEventKind::Up => self.pointer_up(event.position),
            PointerEventKind::Cancel => self.pointer_cancel(),
        };
        if handled {
            event.consume();
        }
        handled
    }

    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        self.reconcile();
        if matches!(self.gesture, GestureState::Active(_)) {
            log::debug!("pointer down ignored: gesture already active");
            return false;
        }
        if self.presentation.is_expanded() || !self.hit_test(pointer) {
            return false;
        }

        if let GestureState::Settling { generation } = self.gesture {
            log::debug!("grant interrupts settle {generation}");
            self.settle.supersede();
            self.x.stop();
            self.y.stop();
        }

        let origin = self.position();
        self.gesture = GestureState::Active(DragSession::grant(origin, pointer));
        log::debug!("grant at ({}, {}) from ({}, {})", pointer.x, pointer.y, origin.x, origin.y);

        self.pulse(HapticKind::DragStart);
        let press = self.settings.press_animation();
        self.scale.animate_to(self.settings.press_scale, press);
        self.opacity.animate_to(self.settings.press_opacity, press);
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let slop = self.settings.tap_slop;
        let GestureState::Active(session) = &mut self.gesture else {
            return false;
        };
        match session.track(pointer, slop) {
            DragStep::WithinSlop => {}
            DragStep::Started => {
                log::debug!("drag started, delta ({}, {})", session.delta().x, session.delta().y);
                let position = session.position();
                self.x.snap_to(position.x);
                self.y.snap_to(position.y);
            }
            DragStep::Moved => {
                let position = session.position();
                self.x.snap_to(position.x);
                self.y.snap_to(position.y);
            }
        }
        true
    }

    pub fn pointer_up(&mut self, pointer: Point) -> bool {
        let session = match std::mem::replace(&mut self.gesture, GestureState::Idle) {
            GestureState::Active(session) => session,
            other => {
                self.gesture = other;
                return false;
            }
        };
        match session.release(pointer, self.settings.tap_slop, &self.bounds) {
            ReleaseOutcome::Tap => self.on_tap(&session),
            ReleaseOutcome::Snap(target) => {
                log::debug!(
                    "release at ({}, {}) snaps {:?} to ({}, {})",
                    session.raw_position().x,
                    session.raw_position().y,
                    target.side,
                    target.position.x,
                    target.position.y
                );
                self.settle_to(target);
            }
        }
        true
    }

    /// The platform took the pointer away. Never counts as a tap.
    pub fn pointer_cancel(&mut self) -> bool {
        let session = match std::mem::replace(&mut self.gesture, GestureState::Idle) {
            GestureState::Active(session) => session,
            other => {
                self.gesture = other;
                return false;
            }
        };
        let target = if session.is_drag() {
            self.bounds.resolve(session.position())
        } else {
            self.rest
        };
        log::debug!("gesture cancelled; settling {:?}", target.side);
        self.settle_to(target);
        true
    }

    /// Apply new screen dimensions or safe-area insets.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.reconcile();
        self.viewport = viewport;
        self.bounds = SnapBounds::new(&viewport, &self.settings);
        let target = self.bounds.anchor(self.rest.side, self.rest.position.y);
        match self.gesture {
            GestureState::Idle => {
                self.rest = target;
                self.x.snap_to(target.position.x);
                self.y.snap_to(target.position.y);
            }
            GestureState::Settling { .. } => self.settle_to(target),
            GestureState::Active(_) => self.rest = target,
        }
    }

    fn on_tap(&mut self, session: &DragSession) {
        log::debug!("tap recognised");
        self.pulse(HapticKind::Tap);

        let pulse = self.settings.tap_pulse_animation();
        let scale = self.scale.downgrade();
        self.scale
            .animate_to_with_listener(self.settings.tap_scale, pulse, move |reason, _| {
                if reason != AnimationEndReason::Finished {
                    return;
                }
                if let Some(scale) = scale.upgrade() {
                    scale.animate_to(1.0, pulse);
                }
            });
        self.opacity.animate_to(1.0, pulse);

        if session.origin() != self.rest.position {
            // The tap interrupted a settle; finish moving to the same rest position.
            let generation = self.settle.begin(2);
            let animation = self.settings.settle_animation();
            self.x.animate_to_with_listener(
                self.rest.position.x,
                animation,
                self.settle.listener(generation),
            );
            self.y.animate_to_with_listener(
                self.rest.position.y,
                animation,
                self.settle.listener(generation),
            );
            self.gesture = GestureState::Settling { generation };
        } else {
            self.gesture = GestureState::Idle;
        }

        self.presentation.expand();
    }

    fn settle_to(&mut self, target: SnapTarget) {
        self.rest = target;
        let generation = self.settle.begin(4);
        let animation = self.settings.settle_animation();
        self.x.animate_to_with_listener(target.position.x, animation, self.settle.listener(generation));
        self.y.animate_to_with_listener(target.position.y, animation, self.settle.listener(generation));
        self.scale
            .animate_to_with_listener(1.0, animation, self.settle.listener(generation));
        self.opacity
            .animate_to_with_listener(1.0, animation, self.settle.listener(generation));
        self.gesture = GestureState::Settling { generation };
    }

    /// Drop back to `Idle` once the current settle has finished.
    fn reconcile(&mut self) {
        if let GestureState::Settling { generation } = self.gesture {
            if self.settle.is_settled(generation) {
                self.gesture = GestureState::Idle;
            }
        }
    }

    fn pulse(&self, kind: HapticKind) {
        let Some(haptics) = self.haptics.as_ref() else {
            return;
        };
        let duration = match kind {
            HapticKind::DragStart => self.settings.drag_haptic(),
            HapticKind::Tap => self.settings.tap_haptic(),
        };
        haptics.perform(kind, duration);
    }
}
