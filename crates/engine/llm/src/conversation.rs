//! Conversation history and single-request chat sessions

use crate::client::{ClientConfig, GenerationBackend};
use crate::error::{Error, Result};
use crate::streamer::{spawn_generation, Reply, ResponseStream, Termination};
use crate::types::{GenerationParams, GenerationRequest, Message};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One completed round: what the user said and what the assistant replied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Build the role-tagged message list for a new user message
///
/// Every past exchange contributes a user message followed by an assistant
/// message; the new message comes last.
pub fn build_messages(history: &[Exchange], message: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 1);
    for exchange in history {
        messages.push(Message::user(exchange.user.as_str()));
        messages.push(Message::assistant(exchange.assistant.as_str()));
    }
    messages.push(Message::user(message));
    messages
}

/// Append-only history with at most one message awaiting a reply
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    system_prompt: Option<String>,
    exchanges: Vec<Exchange>,
    pending: Option<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a system message to every request
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Mark `message` as pending and return the messages to send
    pub fn begin(&mut self, message: impl Into<String>) -> Result<Vec<Message>> {
        if self.pending.is_some() {
            return Err(Error::RequestInFlight);
        }
        let message = message.into();

        let mut messages = Vec::new();
        if let Some(prompt) = &self.system_prompt {
            messages.push(Message::system(prompt.as_str()));
        }
        messages.extend(build_messages(&self.exchanges, &message));

        self.pending = Some(message);
        Ok(messages)
    }

    /// Pair the pending message with its reply
    ///
    /// Does nothing when no message is pending.
    pub fn complete(&mut self, reply: impl Into<String>) {
        if let Some(user) = self.pending.take() {
            self.exchanges.push(Exchange::new(user, reply));
        }
    }

    /// Drop the pending message without recording a reply
    pub fn abandon(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty() && self.pending.is_none()
    }

    /// Forget all exchanges and any pending message
    pub fn clear(&mut self) {
        self.exchanges.clear();
        self.pending = None;
    }
}

/// A conversation bound to a backend
///
/// Only one request may be outstanding at a time.
pub struct ChatSession {
    backend: Arc<dyn GenerationBackend>,
    config: ClientConfig,
    conversation: Conversation,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            conversation: Conversation::new(),
        }
    }

    /// Replace the conversation (e.g. to set a system prompt)
    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn backend(&self) -> &dyn GenerationBackend {
        self.backend.as_ref()
    }

    /// Submit a message and start streaming the reply
    ///
    /// The caller must hand the final text to [`Self::record_reply`] (or
    /// call [`Self::abandon`]) before sending the next message.
    pub fn send(
        &mut self,
        message: impl Into<String>,
        params: GenerationParams,
    ) -> Result<ResponseStream> {
        let params = params.validated()?;
        let messages = self.conversation.begin(message)?;
        let request = GenerationRequest::new(messages).with_params(params);
        Ok(spawn_generation(
            self.backend.clone(),
            request,
            &self.config,
        ))
    }

    /// Record the reply to the pending message
    pub fn record_reply(&mut self, reply: impl Into<String>) {
        self.conversation.complete(reply);
    }

    /// Give up on the pending message
    pub fn abandon(&mut self) -> Option<String> {
        self.conversation.abandon()
    }

    /// Send a message, report each growing reply text and record the result
    ///
    /// Truncated replies are recorded as received. A reply that failed
    /// before producing any text is not recorded and leaves no pending
    /// message behind.
    pub async fn respond<F>(
        &mut self,
        message: impl Into<String>,
        params: GenerationParams,
        mut on_update: F,
    ) -> Result<Reply>
    where
        F: FnMut(&str),
    {
        let mut stream = self.send(message, params)?;
        while let Some(text) = stream.next_text().await {
            on_update(&text);
        }
        let reply = stream.collect().await;

        match &reply.termination {
            Termination::Failed(_) | Termination::Disconnected if reply.text.is_empty() => {
                self.conversation.abandon();
            }
            _ => self.conversation.complete(reply.text.as_str()),
        }
        Ok(reply)
    }

    /// Start over with an empty history
    pub fn clear(&mut self) {
        self.conversation.clear();
    }
}
