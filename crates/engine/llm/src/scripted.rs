//! Deterministic backend that replays a fixed list of fragments

use crate::client::{ChunkStream, GenerationBackend};
use crate::error::{Error, Result};
use crate::types::{FinishReason, GenerationRequest, StreamChunk};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Backend that emits pre-recorded fragments
///
/// Useful for tests and offline runs. Every request it receives is kept so
/// callers can inspect the message list that was sent.
#[derive(Debug, Clone)]
pub struct ScriptedBackend {
    fragments: Arc<[String]>,
    delay: Duration,
    stall_after: Option<usize>,
    error_after: Option<usize>,
    finish_reason: Option<FinishReason>,
    refuse: Option<String>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedBackend {
    /// Replay the given fragments, then close the stream
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            delay: Duration::ZERO,
            stall_after: None,
            error_after: None,
            finish_reason: None,
            refuse: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend whose every request fails before streaming starts
    pub fn failing(message: impl Into<String>) -> Self {
        let mut backend = Self::new(Vec::<String>::new());
        backend.refuse = Some(message.into());
        backend
    }

    /// Sleep before each fragment
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Hang forever after emitting `n` fragments
    pub fn with_stall_after(mut self, n: usize) -> Self {
        self.stall_after = Some(n);
        self
    }

    /// Emit an error after `n` fragments
    pub fn with_error_after(mut self, n: usize) -> Self {
        self.error_after = Some(n);
        self
    }

    /// Send a final empty chunk carrying this reason
    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted"
    }

    async fn complete_stream(&self, request: GenerationRequest) -> Result<ChunkStream> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        if let Some(message) = &self.refuse {
            return Err(Error::Backend(message.clone()));
        }

        let script = self.clone();
        let stream = futures::stream::unfold(0usize, move |i| {
            let script = script.clone();
            async move {
                if script.stall_after == Some(i) {
                    futures::future::pending::<()>().await;
                }
                if script.error_after == Some(i) {
                    let err = Error::Backend(format!("scripted failure after {} fragments", i));
                    return Some((Err(err), usize::MAX));
                }
                if !script.delay.is_zero() {
                    tokio::time::sleep(script.delay).await;
                }

                let len = script.fragments.len();
                if i < len {
                    Some((Ok(StreamChunk::text(script.fragments[i].clone())), i + 1))
                } else if i == len {
                    script
                        .finish_reason
                        .map(|reason| (Ok(StreamChunk::finish("", reason)), i + 1))
                } else {
                    None
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
