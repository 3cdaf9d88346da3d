//! Collapsed/expanded toggle and the contract with the hosted chat surface.

use snapdock_core::RuntimeHandle;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresentationState {
    /// Only the floating button is visible.
    Collapsed,
    /// The full-screen overlay hosting the chat surface is visible.
    Expanded,
}

/// What asked the overlay to go away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollapseReason {
    Closed,
    Minimized,
    /// The host collapsed the overlay itself (navigation, teardown).
    Host,
}

/// Signals a hosted surface can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceSignal {
    Close,
    Minimize,
}

impl SurfaceSignal {
    pub fn collapse_reason(self) -> CollapseReason {
        match self {
            SurfaceSignal::Close => CollapseReason::Closed,
            SurfaceSignal::Minimize => CollapseReason::Minimized,
        }
    }
}

/// Content shown inside the full-screen overlay.
pub trait HostedSurface {
    /// The overlay became visible. Keep `callbacks` to ask for dismissal later.
    fn on_presented(&mut self, callbacks: SurfaceCallbacks);

    /// The overlay was hidden.
    fn on_dismissed(&mut self, reason: CollapseReason);
}

impl<S: HostedSurface + ?Sized> HostedSurface for Rc<RefCell<S>> {
    fn on_presented(&mut self, callbacks: SurfaceCallbacks) {
        self.borrow_mut().on_presented(callbacks);
    }

    fn on_dismissed(&mut self, reason: CollapseReason) {
        self.borrow_mut().on_dismissed(reason);
    }
}

/// `onClose` / `onMinimize` handed to the hosted surface.
///
/// Invoking either posts the signal to the UI queue; the collapse happens when
/// the host next drains UI tasks, never re-entrantly inside the surface.
#[derive(Clone)]
pub struct SurfaceCallbacks {
    runtime: RuntimeHandle,
    presentation: Weak<RefCell<PresentationInner>>,
}

impl SurfaceCallbacks {
    pub fn on_close(&self) {
        self.post(SurfaceSignal::Close);
    }

    pub fn on_minimize(&self) {
        self.post(SurfaceSignal::Minimize);
    }

    fn post(&self, signal: SurfaceSignal) {
        log::debug!("surface signal {signal:?} queued");
        let presentation = self.presentation.clone();
        self.runtime.post_ui(move || {
            if let Some(inner) = presentation.upgrade() {
                PresentationController::apply_collapse(&inner, signal.collapse_reason());
            }
        });
    }
}

impl fmt::Debug for SurfaceCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceCallbacks")
            .field("attached", &(self.presentation.strong_count() > 0))
            .finish()
    }
}

struct PresentationInner {
    state: PresentationState,
    surface: Option<Box<dyn HostedSurface>>,
    presentations: u64,
    last_collapse: Option<CollapseReason>,
}

/// Owns [`PresentationState`]. At most one overlay is shown at a time.
pub struct PresentationController {
    runtime: RuntimeHandle,
    inner: Rc<RefCell<PresentationInner>>,
}

impl PresentationController {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self {
            runtime,
            inner: Rc::new(RefCell::new(PresentationInner {
                state: PresentationState::Collapsed,
                surface: None,
                presentations: 0,
                last_collapse: None,
            })),
        }
    }

    pub fn set_surface(&self, surface: impl HostedSurface + 'static) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == PresentationState::Expanded {
            log::warn!("replacing hosted surface while the overlay is shown");
        }
        inner.surface = Some(Box::new(surface));
    }

    pub fn state(&self) -> PresentationState {
        self.inner.borrow().state
    }

    pub fn is_expanded(&self) -> bool {
        self.state() == PresentationState::Expanded
    }

    /// Number of times the overlay has been shown.
    pub fn presentations(&self) -> u64 {
        self.inner.borrow().presentations
    }

    pub fn last_collapse(&self) -> Option<CollapseReason> {
        self.inner.borrow().last_collapse
    }

    /// Show the overlay. Returns `false` if it was already shown.
    pub fn expand(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.state == PresentationState::Expanded {
            log::debug!("expand ignored: overlay already shown");
            return false;
        }
        inner.state = PresentationState::Expanded;
        inner.presentations += 1;
        let callbacks = SurfaceCallbacks {
            runtime: self.runtime.clone(),
            presentation: Rc::downgrade(&self.inner),
        };
        if let Some(surface) = inner.surface.as_mut() {
            surface.on_presented(callbacks);
        }
        log::debug!("overlay expanded");
        true
    }

    /// Hide the overlay. Returns `false` if it was not shown.
    pub fn collapse(&self, reason: CollapseReason) -> bool {
        Self::apply_collapse(&self.inner, reason)
    }

    fn apply_collapse(inner: &Rc<RefCell<PresentationInner>>, reason: CollapseReason) -> bool {
        let mut inner = inner.borrow_mut();
        if inner.state == PresentationState::Collapsed {
            log::debug!("collapse ({reason:?}) ignored: overlay not shown");
            return false;
        }
        inner.state = PresentationState::Collapsed;
        inner.last_collapse = Some(reason);
        if let Some(surface) = inner.surface.as_mut() {
            surface.on_dismissed(reason);
        }
        log::debug!("overlay collapsed ({reason:?})");
        true
    }
}
