//! Background generation with a bounded-wait consumer
//!
//! [`spawn_generation`] runs the backend on a worker and forwards fragments
//! through a channel. [`ResponseStream`] reads that channel one fragment at
//! a time, waiting at most the configured timeout for each, and hands back
//! the full reply text accumulated so far.

use crate::client::{ClientConfig, GenerationBackend, StreamAccumulator};
use crate::error::{Error, Result};
use crate::task::{spawn_worker, WorkerContext, WorkerHandle};
use crate::types::{FinishReason, GenerationRequest, StreamChunk};
use futures::{Stream, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Why a response stream stopped producing text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The backend finished normally
    Finished(FinishReason),
    /// No fragment arrived within the timeout; the text is truncated
    TimedOut(Duration),
    /// The backend reported an error; the text is truncated
    Failed(String),
    /// The worker went away without a final chunk
    Disconnected,
}

impl Termination {
    /// Whether the reply ended on the backend's own terms
    pub fn is_complete(&self) -> bool {
        matches!(self, Termination::Finished(_))
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Finished(FinishReason::Stop) => write!(f, "finished"),
            Termination::Finished(FinishReason::Length) => write!(f, "token limit reached"),
            Termination::Finished(FinishReason::Other) => write!(f, "finished (other)"),
            Termination::TimedOut(timeout) => write!(f, "timed out after {:?}", timeout),
            Termination::Failed(msg) => write!(f, "failed: {}", msg),
            Termination::Disconnected => write!(f, "worker disconnected"),
        }
    }
}

/// Final text of a reply together with how it ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub termination: Termination,
}

impl Reply {
    /// Whether the reply ended on the backend's own terms
    pub fn is_complete(&self) -> bool {
        self.termination.is_complete()
    }
}

/// Holds back text that could be the start of a stop sequence
///
/// Stop sequences may be split across fragments, so the tail of the
/// received text is only released once it can no longer begin a match.
#[derive(Debug, Default)]
pub struct StopMatcher {
    stops: Vec<String>,
    held: String,
}

impl StopMatcher {
    pub fn new(stops: &[String]) -> Self {
        Self {
            stops: stops.iter().filter(|s| !s.is_empty()).cloned().collect(),
            held: String::new(),
        }
    }

    /// Feed a fragment; returns the text safe to emit and whether a stop
    /// sequence was reached
    pub fn push(&mut self, delta: &str) -> (String, bool) {
        self.held.push_str(delta);

        let hit = self
            .stops
            .iter()
            .filter_map(|stop| self.held.find(stop.as_str()))
            .min();
        if let Some(pos) = hit {
            let out = self.held[..pos].to_string();
            self.held.clear();
            return (out, true);
        }

        let split = self.held.len() - self.partial_suffix_len();
        let out: String = self.held.drain(..split).collect();
        (out, false)
    }

    /// Release whatever is still held back
    pub fn flush(&mut self) -> String {
        std::mem::take(&mut self.held)
    }

    fn held_len(&self) -> usize {
        self.held.len()
    }

    fn partial_suffix_len(&self) -> usize {
        let mut best = 0;
        for stop in &self.stops {
            for k in (best + 1..stop.len()).rev() {
                if stop.is_char_boundary(k) && self.held.ends_with(&stop[..k]) {
                    best = k;
                    break;
                }
            }
        }
        best
    }
}

/// Consumer side of a generation running on a background worker
///
/// The worker forwards raw fragments and stop sequences are cut here, so
/// text held back while a stop sequence might be starting still reaches the
/// reply when the stream ends early.
pub struct ResponseStream {
    rx: mpsc::Receiver<StreamChunk>,
    matcher: StopMatcher,
    accumulator: StreamAccumulator,
    fragment_timeout: Duration,
    termination: Option<Termination>,
    worker: WorkerHandle<FinishReason>,
}

impl ResponseStream {
    /// Wait for the next fragment and return the full text so far
    ///
    /// Returns `None` once the stream has terminated. A missed deadline,
    /// a backend error or a vanished worker all end the stream; the text
    /// received up to that point stays available through [`Self::text`].
    ///
    /// A fragment that ends in a possible stop-sequence prefix is only
    /// partly visible until the following fragment (or the end of the
    /// stream) settles it.
    pub async fn next_text(&mut self) -> Option<String> {
        loop {
            if self.termination.is_some() {
                return None;
            }

            let grew = match tokio::time::timeout(self.fragment_timeout, self.rx.recv()).await {
                Ok(Some(chunk)) => {
                    let (text, hit_stop) = self.matcher.push(&chunk.delta);
                    let grew = self.append(text);
                    let finish = if hit_stop {
                        Some(FinishReason::Stop)
                    } else {
                        chunk.finish_reason
                    };
                    match finish {
                        Some(reason) => self.end(Termination::Finished(reason)) || grew,
                        None => grew,
                    }
                }
                Ok(None) => {
                    let termination = self.worker_outcome().await;
                    self.end(termination)
                }
                Err(_) => {
                    tracing::warn!(
                        "{}: no fragment within {:?}, truncating reply at {} bytes",
                        self.worker.id,
                        self.fragment_timeout,
                        self.accumulator.content().len() + self.matcher.held_len()
                    );
                    self.end(Termination::TimedOut(self.fragment_timeout))
                }
            };

            if grew {
                return Some(self.accumulator.content().to_string());
            }
        }
    }

    /// Drain the stream and return the final reply
    pub async fn collect(mut self) -> Reply {
        while self.next_text().await.is_some() {}
        let termination = self
            .termination
            .take()
            .unwrap_or(Termination::Disconnected);
        Reply {
            text: std::mem::take(&mut self.accumulator).finish(),
            termination,
        }
    }

    /// Turn into a lazy sequence of growing reply texts
    pub fn into_stream(self) -> impl Stream<Item = String> + Send {
        futures::stream::unfold(self, |mut stream| async move {
            stream.next_text().await.map(|text| (text, stream))
        })
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        self.accumulator.content()
    }

    /// Why the stream ended, or `None` while it is still live
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    fn append(&mut self, text: String) -> bool {
        if text.is_empty() {
            return false;
        }
        self.accumulator.process(StreamChunk::text(text));
        true
    }

    /// Release held-back text, stop the worker and record why the stream
    /// ended. Returns whether the reply grew.
    fn end(&mut self, termination: Termination) -> bool {
        let tail = self.matcher.flush();
        let grew = self.append(tail);
        self.worker.cancel();
        self.termination = Some(termination);
        grew
    }

    /// How the worker finished once its channel closed
    async fn worker_outcome(&mut self) -> Termination {
        match tokio::time::timeout(self.fragment_timeout, self.worker.join()).await {
            Ok(Ok(reason)) => Termination::Finished(reason),
            Ok(Err(Error::Cancelled(_) | Error::Channel(_))) | Err(_) => Termination::Disconnected,
            Ok(Err(e)) => {
                tracing::warn!("{}: backend failed: {}", self.worker.id, e);
                Termination::Failed(e.to_string())
            }
        }
    }
}

impl Drop for ResponseStream {
    fn drop(&mut self) {
        if self.termination.is_none() {
            self.worker.cancel();
        }
    }
}

/// Start a generation on a background worker
///
/// Must be called from within a tokio runtime. The worker ends the reply
/// when the backend sends a final chunk or closes its stream, or once
/// `max_new_tokens` fragments have arrived (every fragment carries at
/// least one token). Stop sequences are applied by the returned stream.
pub fn spawn_generation(
    backend: Arc<dyn GenerationBackend>,
    request: GenerationRequest,
    config: &ClientConfig,
) -> ResponseStream {
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    let matcher = StopMatcher::new(&request.params.stop);

    tracing::debug!(
        "spawning generation on {} ({} messages, max_new_tokens={}, do_sample={})",
        backend.name(),
        request.messages.len(),
        request.params.max_new_tokens,
        request.params.do_sample()
    );

    let worker = spawn_worker(move |ctx| async move { pump(backend, request, &ctx, tx).await });

    ResponseStream {
        rx,
        matcher,
        accumulator: StreamAccumulator::new(),
        fragment_timeout: config.fragment_timeout,
        termination: None,
        worker,
    }
}

/// Forward backend fragments until a finish reason, the end of the
/// backend stream or the token budget. Errors end the worker and close
/// the channel; the consumer reads them from the worker outcome.
async fn pump(
    backend: Arc<dyn GenerationBackend>,
    request: GenerationRequest,
    ctx: &WorkerContext,
    tx: mpsc::Sender<StreamChunk>,
) -> Result<FinishReason> {
    let budget = request.params.max_new_tokens as usize;
    let mut stream = backend.complete_stream(request).await?;
    let mut fragments = 0usize;

    while let Some(item) = stream.next().await {
        ctx.check_cancelled()?;
        let chunk = item?;

        if let Some(reason) = chunk.finish_reason {
            forward(&tx, chunk).await?;
            return Ok(reason);
        }
        if chunk.delta.is_empty() {
            continue;
        }

        fragments += 1;
        if fragments >= budget {
            tracing::warn!("{}: token budget of {} reached", ctx.id(), budget);
            forward(&tx, StreamChunk::finish(chunk.delta, FinishReason::Length)).await?;
            return Ok(FinishReason::Length);
        }
        forward(&tx, chunk).await?;
    }

    forward(&tx, StreamChunk::finish("", FinishReason::Stop)).await?;
    Ok(FinishReason::Stop)
}

async fn forward(tx: &mpsc::Sender<StreamChunk>, chunk: StreamChunk) -> Result<()> {
    tx.send(chunk)
        .await
        .map_err(|_| Error::Cancelled("consumer dropped the response stream".to_string()))
}
