//! Streaming backend for Ollama-compatible `/api/chat` endpoints

use crate::client::{ChunkStream, ClientConfig, GenerationBackend};
use crate::error::{Error, Result};
use crate::types::{FinishReason, GenerationRequest, Message, StreamChunk};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Default server address of a local Ollama install
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Model name used when none is configured
pub const DEFAULT_MODEL: &str = "llama-mesh";

/// HTTP backend that streams newline-delimited JSON replies
#[derive(Clone)]
pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

#[derive(Deserialize)]
struct ChatLine {
    #[serde(default)]
    message: Option<LineMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct LineMessage {
    #[serde(default)]
    content: String,
}

impl OllamaBackend {
    /// Create a backend from a client configuration
    pub fn new(config: &ClientConfig) -> Self {
        let endpoint = config
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        let model = if config.model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.clone()
        };

        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key: config.api_key.clone(),
        }
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn chat_body<'a>(&'a self, request: &'a GenerationRequest) -> ChatRequest<'a> {
        let params = &request.params;
        ChatRequest {
            model: &self.model,
            messages: &request.messages,
            stream: true,
            options: ChatOptions {
                temperature: params.temperature,
                num_predict: params.max_new_tokens,
                stop: params.stop.clone(),
                top_k: (!params.do_sample()).then_some(1),
            },
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete_stream(&self, request: GenerationRequest) -> Result<ChunkStream> {
        let url = format!("{}/api/chat", self.endpoint);
        let mut builder = self.client.post(&url).json(&self.chat_body(&request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let res = builder
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Failed to contact {}: {}", url, e)))?;

        if !res.status().is_success() {
            return Err(Error::Backend(format!("API error: {}", res.status())));
        }

        let bytes = Box::pin(res.bytes_stream());
        let stream = futures::stream::unfold(
            (bytes, Vec::<u8>::new(), false),
            |(mut bytes, mut buf, done)| async move {
                if done {
                    return None;
                }
                loop {
                    if let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                        let line: Vec<u8> = buf.drain(..=pos).collect();
                        match parse_chat_line(&String::from_utf8_lossy(&line)) {
                            Ok(None) => continue,
                            Ok(Some(chunk)) => {
                                let finished = chunk.finish_reason.is_some();
                                return Some((Ok(chunk), (bytes, buf, finished)));
                            }
                            Err(e) => return Some((Err(e), (bytes, buf, true))),
                        }
                    }

                    match bytes.next().await {
                        Some(Ok(data)) => buf.extend_from_slice(&data),
                        Some(Err(e)) => return Some((Err(e.into()), (bytes, buf, true))),
                        None => {
                            let rest = std::mem::take(&mut buf);
                            return match parse_chat_line(&String::from_utf8_lossy(&rest)) {
                                Ok(Some(chunk)) => Some((Ok(chunk), (bytes, buf, true))),
                                Ok(None) => None,
                                Err(e) => Some((Err(e), (bytes, buf, true))),
                            };
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}

/// Parse one line of an NDJSON chat reply
///
/// Blank lines yield `None`. A line carrying an `error` field becomes a
/// backend error.
pub fn parse_chat_line(line: &str) -> Result<Option<StreamChunk>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parsed: ChatLine = serde_json::from_str(line)?;
    if let Some(err) = parsed.error {
        return Err(Error::Backend(err));
    }

    let delta = parsed.message.map(|m| m.content).unwrap_or_default();
    let finish_reason = parsed.done.then(|| match parsed.done_reason.as_deref() {
        None | Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some(_) => FinishReason::Other,
    });

    Ok(Some(StreamChunk {
        delta,
        finish_reason,
    }))
}
