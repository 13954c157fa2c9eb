//! Core types for generation requests and streamed replies

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Sampling temperature used when the caller does not pick one
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Largest reply the hosted model is allowed to produce
pub const MAX_NEW_TOKENS_LIMIT: u32 = 4096;

/// End-of-turn marker emitted by Llama 3 family models
pub const END_OF_TURN: &str = "<|eot_id|>";

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message providing context/instructions
    System,
    /// User input
    User,
    /// Assistant response
    Assistant,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of who sent this message
    pub role: Role,
    /// Text content of the message
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for a single generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Temperature in `[0, 1]`; zero selects greedy decoding
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,
    /// Sequences that end the reply; never part of the emitted text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_new_tokens: MAX_NEW_TOKENS_LIMIT,
            stop: vec![END_OF_TURN.to_string()],
        }
    }
}

impl GenerationParams {
    /// Create validated parameters with the default stop sequences
    pub fn new(temperature: f32, max_new_tokens: u32) -> Result<Self> {
        Self {
            temperature,
            max_new_tokens,
            ..Default::default()
        }
        .validated()
    }

    /// Replace the stop sequences
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    /// Whether sampling is enabled (false means greedy decoding)
    pub fn do_sample(&self) -> bool {
        self.temperature > 0.0
    }

    /// Check ranges, clamping an oversized token budget to the model limit
    pub fn validated(mut self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(Error::InvalidConfig(format!(
                "temperature must be within [0, 1], got {}",
                self.temperature
            )));
        }
        if self.max_new_tokens == 0 {
            return Err(Error::InvalidConfig(
                "max_new_tokens must be positive".to_string(),
            ));
        }
        if self.max_new_tokens > MAX_NEW_TOKENS_LIMIT {
            tracing::warn!(
                "max_new_tokens {} exceeds limit, clamping to {}",
                self.max_new_tokens,
                MAX_NEW_TOKENS_LIMIT
            );
            self.max_new_tokens = MAX_NEW_TOKENS_LIMIT;
        }
        self.stop.retain(|s| !s.is_empty());
        Ok(self)
    }
}

/// A request to generate a reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Messages in the conversation, oldest first
    pub messages: Vec<Message>,
    /// Sampling parameters
    pub params: GenerationParams,
}

impl GenerationRequest {
    /// Create a new request with default parameters
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            params: GenerationParams::default(),
        }
    }

    /// Set the sampling parameters
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

/// Reason why generation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Reached an end token or stop sequence
    Stop,
    /// Reached the max token limit
    Length,
    /// Other/unknown reason
    Other,
}

/// A streaming chunk from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Text being added
    pub delta: String,
    /// Finish reason if this is the final chunk
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// A chunk carrying text only
    pub fn text(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
            finish_reason: None,
        }
    }

    /// A final chunk
    pub fn finish(delta: impl Into<String>, reason: FinishReason) -> Self {
        Self {
            delta: delta.into(),
            finish_reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_construction() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");

        let json = serde_json::to_value(Message::assistant("Hi")).unwrap();
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn test_default_params_match_demo() {
        let params = GenerationParams::default();
        assert_eq!(params.temperature, 0.9);
        assert_eq!(params.max_new_tokens, 4096);
        assert_eq!(params.stop, vec![END_OF_TURN.to_string()]);
        assert!(params.do_sample());
    }

    #[test]
    fn test_zero_temperature_is_greedy() {
        let params = GenerationParams::new(0.0, 128).unwrap();
        assert!(!params.do_sample());
    }

    #[test]
    fn test_params_validation() {
        assert!(matches!(
            GenerationParams::new(1.5, 128),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            GenerationParams::new(f32::NAN, 128),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            GenerationParams::new(0.5, 0),
            Err(Error::InvalidConfig(_))
        ));

        let clamped = GenerationParams::new(0.5, 10_000).unwrap();
        assert_eq!(clamped.max_new_tokens, MAX_NEW_TOKENS_LIMIT);
    }

    #[test]
    fn test_empty_stop_sequences_dropped() {
        let params = GenerationParams::default()
            .with_stop(vec![String::new(), "END".to_string()])
            .validated()
            .unwrap();
        assert_eq!(params.stop, vec!["END".to_string()]);
    }
}
