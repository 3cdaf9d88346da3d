use crate::chat::{
    ChatBackend, ChatError, ChatMessage, ChatReply, ChatRequest, ChatRole, ChatSurface,
    FALLBACK_REPLY,
};
use crate::presentation::{HostedSurface, PresentationController, PresentationState};
use snapdock_core::Runtime;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Default)]
struct ScriptedBackend {
    replies: RefCell<VecDeque<Result<ChatReply, ChatError>>>,
    requests: RefCell<Vec<ChatRequest>>,
    history: Vec<ChatMessage>,
    history_fails: bool,
    clears: RefCell<usize>,
}

impl ScriptedBackend {
    fn reply(self, text: &str, conversation: Option<&str>) -> Self {
        self.replies.borrow_mut().push_back(Ok(ChatReply {
            text: text.to_string(),
            conversation_id: conversation.map(str::to_string),
        }));
        self
    }

    fn fail(self, error: ChatError) -> Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }
}

impl ChatBackend for ScriptedBackend {
    fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::Transport("no scripted reply".into())))
    }

    fn history(&self) -> Result<Vec<ChatMessage>, ChatError> {
        if self.history_fails {
            Err(ChatError::Transport("offline".into()))
        } else {
            Ok(self.history.clone())
        }
    }

    fn clear(&self) -> Result<(), ChatError> {
        *self.clears.borrow_mut() += 1;
        Ok(())
    }
}

#[test]
fn send_appends_exchange_and_threads_conversation_id() {
    let backend = ScriptedBackend::default()
        .reply("Aim for 2L of water today.", Some("c-1"))
        .reply("Logged.", None);
    let mut surface = ChatSurface::new(backend);

    let reply = surface.send("  how much water?  ").expect("reply").clone();
    assert_eq!(reply, ChatMessage::assistant("Aim for 2L of water today."));
    surface.send("log a glass").expect("reply");

    let requests = surface.backend().requests.borrow().clone();
    assert_eq!(requests[0].message, "how much water?");
    assert_eq!(requests[0].conversation_id, None);
    assert_eq!(requests[1].conversation_id.as_deref(), Some("c-1"));

    let roles: Vec<ChatRole> = surface.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![ChatRole::User, ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]
    );
}

#[test]
fn blank_message_is_rejected_without_calling_backend() {
    let mut surface = ChatSurface::new(ScriptedBackend::default());
    assert_eq!(surface.send("   ").unwrap_err(), ChatError::EmptyMessage);
    assert!(surface.messages().is_empty());
    assert!(surface.backend().requests.borrow().is_empty());
}

#[test]
fn backend_failure_leaves_fallback_notice() {
    let backend = ScriptedBackend::default().fail(ChatError::Rejected {
        status: 503,
        message: "maintenance".into(),
    });
    let mut surface = ChatSurface::new(backend);

    let err = surface.send("hi").unwrap_err();
    assert_eq!(
        err.to_string(),
        "chat backend rejected request (503): maintenance"
    );
    assert_eq!(
        surface.messages(),
        &[ChatMessage::user("hi"), ChatMessage::assistant(FALLBACK_REPLY)]
    );
}

#[test]
fn clear_empties_conversation() {
    let mut surface = ChatSurface::new(ScriptedBackend::default().reply("ok", Some("c-9")));
    surface.send("hello").expect("reply");
    surface.clear().expect("clear");
    assert!(surface.messages().is_empty());
    assert_eq!(*surface.backend().clears.borrow(), 1);
}

#[test]
fn presenting_loads_history_once_and_close_collapses() {
    let runtime = Runtime::new();
    let backend = ScriptedBackend {
        history: vec![ChatMessage::assistant("Welcome back!")],
        ..ScriptedBackend::default()
    }
    .reply("Sure.", None);
    let surface = Rc::new(RefCell::new(ChatSurface::new(backend)));
    let controller = PresentationController::new(runtime.handle());
    controller.set_surface(Rc::clone(&surface));

    controller.expand();
    assert!(surface.borrow().is_visible());
    assert_eq!(surface.borrow().messages().len(), 1);

    surface.borrow().close();
    runtime.drain_ui();
    assert_eq!(controller.state(), PresentationState::Collapsed);
    assert!(!surface.borrow().is_visible());

    surface.borrow_mut().send("one more thing").expect("reply");
    controller.expand();
    // History is not reloaded over the live conversation.
    assert_eq!(surface.borrow().messages().len(), 3);

    surface.borrow().minimize();
    runtime.drain_ui();
    assert_eq!(controller.state(), PresentationState::Collapsed);
}

#[test]
fn history_failure_keeps_surface_usable() {
    let runtime = Runtime::new();
    let backend = ScriptedBackend {
        history_fails: true,
        ..ScriptedBackend::default()
    }
    .reply("hello", None);
    let surface = Rc::new(RefCell::new(ChatSurface::new(backend)));
    let controller = PresentationController::new(runtime.handle());
    controller.set_surface(Rc::clone(&surface));

    controller.expand();
    assert!(surface.borrow().is_visible());
    assert!(surface.borrow().messages().is_empty());
    assert!(surface.borrow_mut().send("hi").is_ok());
}

#[test]
fn close_before_presentation_is_ignored() {
    let mut surface = ChatSurface::new(ScriptedBackend::default());
    surface.close();
    surface.minimize();
    assert!(!surface.is_visible());
    surface.on_dismissed(crate::presentation::CollapseReason::Host);
    assert_eq!(
        surface.last_dismissal(),
        Some(crate::presentation::CollapseReason::Host)
    );
}
