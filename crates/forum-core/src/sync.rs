//! Local view of the message board and the transitions that change it.
//!
//! Nothing in here touches the network. Callers run the store requests
//! themselves and feed the outcomes back through [`ForumState::on_load_result`]
//! and [`ForumState::on_submit_result`].

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::{ForumError, SyncFailure};
use crate::message::{Message, MessageBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

/// Identifies one create request between `prepare_submit` and its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmitToken(u64);

/// A validated submission that is ready to be sent to the store.
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    pub token: SubmitToken,
    pub body: MessageBody,
}

/// Contents of the compose form.
#[derive(Debug, Clone, Default)]
pub struct ComposeForm {
    pub username: String,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct ForumState {
    messages: Vec<Message>,
    error: Option<String>,
    phase: LoadPhase,
    pub form: ComposeForm,
    next_token: u64,
    in_flight: HashSet<SubmitToken>,
}

impl ForumState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The shared error slot. Holds the text of whichever operation failed last.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase != LoadPhase::Ready
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Move to `Loading`. Returns false if a load was already started, in which
    /// case the caller must not issue another fetch.
    pub fn begin_load(&mut self) -> bool {
        if self.phase != LoadPhase::Uninitialized {
            return false;
        }
        self.phase = LoadPhase::Loading;
        true
    }

    pub fn on_load_result(&mut self, result: Result<Vec<Message>, ForumError>) {
        if self.phase == LoadPhase::Ready {
            warn!("ignoring load result after the board was already loaded");
            return;
        }

        match result {
            Ok(messages) => {
                info!(count = messages.len(), "messages loaded");
                self.messages = messages;
            }
            Err(err) => {
                warn!(error = %err, "failed to load messages");
                self.messages.clear();
                self.fail(SyncFailure::Load);
            }
        }
        self.phase = LoadPhase::Ready;
    }

    /// Validate the compose form and register a new in-flight submission.
    /// Blank username or content yields `None` and leaves everything untouched.
    pub fn prepare_submit(&mut self) -> Option<PendingSubmit> {
        let body = MessageBody::compose(&self.form.username, &self.form.content)?;

        let token = SubmitToken(self.next_token);
        self.next_token += 1;
        self.in_flight.insert(token);
        debug!(token = token.0, "submission prepared");

        Some(PendingSubmit { token, body })
    }

    /// Forget an in-flight submission; its completion will be discarded.
    pub fn cancel_submit(&mut self, token: SubmitToken) -> bool {
        self.in_flight.remove(&token)
    }

    /// Apply the outcome of a create request. Returns true when the message was
    /// added to the board.
    pub fn on_submit_result(
        &mut self,
        token: SubmitToken,
        body: MessageBody,
        result: Result<String, ForumError>,
    ) -> bool {
        if !self.in_flight.remove(&token) {
            debug!(token = token.0, "discarding stale submission result");
            return false;
        }

        match result {
            Ok(id) => {
                info!(token = token.0, id = %id, "message sent");
                self.messages.insert(0, Message::from_body(id, body));
                self.form.content.clear();
                true
            }
            Err(err) => {
                warn!(token = token.0, error = %err, "failed to send message");
                self.fail(SyncFailure::Submit);
                false
            }
        }
    }

    fn fail(&mut self, failure: SyncFailure) {
        self.error = Some(failure.user_message().to_string());
    }
}
