//! Streaming text generation for meshchat
//!
//! This crate drives a text-generation backend on a background worker and
//! hands the reply to the caller as it grows:
//!
//! - **Backend abstraction**: [`GenerationBackend`] turns messages plus
//!   sampling parameters into a stream of text fragments
//! - **Background workers**: generation never blocks the caller
//! - **Bounded waits**: each fragment is awaited for at most the configured
//!   timeout; a stalled backend yields a truncated reply instead of an error
//! - **Conversations**: history of (user, assistant) exchanges with one
//!   pending message at a time
//!
//! # Example
//!
//! ```rust,ignore
//! use meshchat_llm::{ChatSession, ClientConfig, GenerationParams, OllamaBackend};
//! use std::sync::Arc;
//!
//! let config = ClientConfig::new("llama-mesh");
//! let backend = Arc::new(OllamaBackend::new(&config));
//! let mut session = ChatSession::new(backend, config);
//!
//! let reply = session
//!     .respond("Create a 3D model of a table", GenerationParams::default(), |text| {
//!         println!("{text}");
//!     })
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`client`]: backend trait, configuration and accumulator
//! - [`conversation`]: history and chat sessions
//! - [`error`]: error types
//! - [`streamer`]: worker/consumer pair and stop-sequence handling
//! - [`task`]: background workers with cooperative cancellation
//! - [`types`]: messages, parameters and chunks

pub mod client;
pub mod conversation;
pub mod error;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod scripted;
pub mod streamer;
pub mod task;
pub mod types;

// Re-export commonly used types
pub use client::{
    ChunkStream, ClientConfig, GenerationBackend, StreamAccumulator, DEFAULT_FRAGMENT_TIMEOUT,
};
pub use conversation::{build_messages, ChatSession, Conversation, Exchange};
pub use error::{Error, Result};
#[cfg(feature = "ollama")]
pub use ollama::{OllamaBackend, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use scripted::ScriptedBackend;
pub use streamer::{spawn_generation, Reply, ResponseStream, StopMatcher, Termination};
pub use task::{spawn_worker, WorkerContext, WorkerHandle, WorkerId};
pub use types::{
    FinishReason, GenerationParams, GenerationRequest, Message, Role, StreamChunk,
    DEFAULT_TEMPERATURE, END_OF_TURN, MAX_NEW_TOKENS_LIMIT,
};
