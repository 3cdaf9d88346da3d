//! Chat surface hosted inside the launcher's overlay.
//!
//! The backend speaks one typed contract: every send yields either a
//! [`ChatReply`] or a [`ChatError`], so the surface never has to guess at
//! the shape of a response.

use crate::presentation::{CollapseReason, HostedSurface, SurfaceCallbacks};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub conversation_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatError {
    /// The request never got a response.
    Transport(String),
    EmptyMessage,
    /// The backend answered with an error status.
    Rejected { status: u16, message: String },
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Transport(reason) => write!(f, "chat backend unreachable: {reason}"),
            ChatError::EmptyMessage => write!(f, "message is empty"),
            ChatError::Rejected { status, message } => {
                write!(f, "chat backend rejected request ({status}): {message}")
            }
        }
    }
}

impl std::error::Error for ChatError {}

pub trait ChatBackend {
    fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;

    fn history(&self) -> Result<Vec<ChatMessage>, ChatError>;

    fn clear(&self) -> Result<(), ChatError>;
}

pub const FALLBACK_REPLY: &str = "Sorry, I couldn't reach the assistant. Please try again.";

/// Message list plus the close/minimize affordances of the overlay.
pub struct ChatSurface<B: ChatBackend> {
    backend: B,
    messages: Vec<ChatMessage>,
    conversation_id: Option<String>,
    callbacks: Option<SurfaceCallbacks>,
    history_loaded: bool,
    last_dismissal: Option<CollapseReason>,
}

impl<B: ChatBackend> ChatSurface<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            messages: Vec::new(),
            conversation_id: None,
            callbacks: None,
            history_loaded: false,
            last_dismissal: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_visible(&self) -> bool {
        self.callbacks.is_some()
    }

    pub fn last_dismissal(&self) -> Option<CollapseReason> {
        self.last_dismissal
    }

    /// Send `text` and append both sides of the exchange.
    ///
    /// On failure the user's message stays in the list, followed by a
    /// fallback notice, and the error is returned for the host to surface.
    pub fn send(&mut self, text: &str) -> Result<&ChatMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.messages.push(ChatMessage::user(text));
        let request = ChatRequest {
            message: text.to_string(),
            conversation_id: self.conversation_id.clone(),
        };
        match self.backend.send(&request) {
            Ok(reply) => {
                if reply.conversation_id.is_some() {
                    self.conversation_id = reply.conversation_id;
                }
                self.messages.push(ChatMessage::assistant(reply.text));
            }
            Err(err) => {
                log::warn!("chat send failed: {err}");
                self.messages.push(ChatMessage::assistant(FALLBACK_REPLY));
                return Err(err);
            }
        }
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Clear the conversation on the backend, then locally.
    pub fn clear(&mut self) -> Result<(), ChatError> {
        self.backend.clear()?;
        self.messages.clear();
        self.conversation_id = None;
        Ok(())
    }

    pub fn close(&self) {
        if let Some(callbacks) = &self.callbacks {
            callbacks.on_close();
        }
    }

    pub fn minimize(&self) {
        if let Some(callbacks) = &self.callbacks {
            callbacks.on_minimize();
        }
    }

    fn load_history(&mut self) {
        match self.backend.history() {
            Ok(history) => {
                log::debug!("loaded {} chat messages", history.len());
                self.messages = history;
                self.history_loaded = true;
            }
            Err(err) => {
                log::warn!("chat history unavailable: {err}");
            }
        }
    }
}

impl<B: ChatBackend> HostedSurface for ChatSurface<B> {
    fn on_presented(&mut self, callbacks: SurfaceCallbacks) {
        self.callbacks = Some(callbacks);
        if !self.history_loaded {
            self.load_history();
        }
    }

    fn on_dismissed(&mut self, reason: CollapseReason) {
        self.callbacks = None;
        self.last_dismissal = Some(reason);
    }
}
