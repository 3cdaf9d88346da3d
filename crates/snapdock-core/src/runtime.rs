use crate::{FrameCallbackId, FrameClock};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct RuntimeInner {
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<FrameCallbackId>,
    ui_tasks: RefCell<VecDeque<Box<dyn FnOnce() + 'static>>>,
    last_frame_nanos: Cell<Option<u64>>,
}

impl RuntimeInner {
    fn new() -> Self {
        Self {
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            ui_tasks: RefCell::new(VecDeque::new()),
            last_frame_nanos: Cell::new(None),
        }
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(last) = self.last_frame_nanos.get() {
            if frame_time_nanos < last {
                log::warn!("frame time went backwards: {frame_time_nanos} < {last}");
            }
        }
        self.last_frame_nanos.set(Some(frame_time_nanos));

        // Callbacks registered while draining belong to the next frame.
        let mut pending: SmallVec<[Box<dyn FnOnce(u64) + 'static>; 8]> = SmallVec::new();
        {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            while let Some(mut entry) = callbacks.pop_front() {
                if let Some(callback) = entry.callback.take() {
                    pending.push(callback);
                }
            }
        }
        log::trace!("frame {frame_time_nanos}: {} callbacks", pending.len());
        for callback in pending {
            callback(frame_time_nanos);
        }
    }

    fn post_ui(&self, task: Box<dyn FnOnce() + 'static>) {
        self.ui_tasks.borrow_mut().push_back(task);
    }

    fn drain_ui(&self) {
        loop {
            let task = self.ui_tasks.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn has_pending_ui(&self) -> bool {
        !self.ui_tasks.borrow().is_empty()
    }
}

/// Owner of the UI loop's queues.
///
/// The host keeps the `Runtime` alive and pumps it: `drain_ui` after input,
/// `drain_frame_callbacks` once per display frame. Components hold a
/// [`RuntimeHandle`] instead so they never extend the runtime's lifetime.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new()),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain_frame_callbacks(frame_time_nanos);
    }

    pub fn drain_ui(&self) {
        self.inner.drain_ui();
    }

    /// Whether another frame or UI drain would do any work.
    pub fn needs_frame(&self) -> bool {
        self.inner.has_frame_callbacks() || self.inner.has_pending_ui()
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner.has_pending_ui()
    }

    pub fn last_frame_nanos(&self) -> Option<u64> {
        self.inner.last_frame_nanos.get()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak handle to a [`Runtime`]. All operations are no-ops once the runtime is gone.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Enqueues work to run on the next UI drain.
    pub fn post_ui(&self, task: impl FnOnce() + 'static) {
        if let Some(inner) = self.inner.upgrade() {
            inner.post_ui(Box::new(task));
        } else {
            log::debug!("post_ui after runtime dropped; task discarded");
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}
