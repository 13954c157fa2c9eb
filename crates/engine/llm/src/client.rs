//! Generation backend abstraction and streaming accumulator

use crate::error::Result;
use crate::types::{GenerationRequest, StreamChunk};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;

/// Default wait for a single fragment before the reply is cut short
pub const DEFAULT_FRAGMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// A boxed stream of stream chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// Trait for text generation backends
///
/// A backend turns a message list plus sampling parameters into a finite
/// stream of text fragments. Implementations that do blocking inference
/// should move that work off the async runtime themselves.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Get the model this backend talks to
    fn default_model(&self) -> &str;

    /// Start a generation and return its fragment stream
    async fn complete_stream(&self, request: GenerationRequest) -> Result<ChunkStream>;
}

/// Configuration for a backend connection and the consuming side
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API endpoint URL
    pub endpoint: Option<String>,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Model to use
    pub model: String,
    /// Longest wait for any single fragment
    pub fragment_timeout: Duration,
    /// Capacity of the worker-to-consumer channel
    pub channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: String::new(),
            fragment_timeout: DEFAULT_FRAGMENT_TIMEOUT,
            channel_capacity: 64,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with the specified model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-fragment timeout
    pub fn with_fragment_timeout(mut self, timeout: Duration) -> Self {
        self.fragment_timeout = timeout;
        self
    }
}

/// Helper to accumulate streaming chunks into the reply text
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    content: String,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the chunk's text
    pub fn process(&mut self, chunk: StreamChunk) {
        self.content.push_str(&chunk.delta);
    }

    /// Get the current accumulated content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Finalize and take the complete text
    pub fn finish(self) -> String {
        self.content
    }
}
