use meshchat_llm::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_FRAGMENT_TIMEOUT, DEFAULT_MODEL};
use std::{env, time::Duration};

/// Configuration for the `chat` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL of the generation backend (e.g. `http://localhost:11434`).
    pub endpoint: String,
    /// Model requested from the backend.
    pub model: String,
    /// Longest wait for any single fragment before the reply is truncated.
    pub fragment_timeout: Duration,
    /// Bearer token sent with every request, if any.
    pub api_key: Option<String>,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ChatOverrides {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<f64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            fragment_timeout: DEFAULT_FRAGMENT_TIMEOUT,
            api_key: None,
        }
    }
}

impl ChatConfig {
    /// Builds a configuration from command-line overrides and environment
    /// variables, falling back to a local Ollama server.
    pub fn from_env(overrides: ChatOverrides) -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), overrides)
    }

    /// Same as [`Self::from_env`] with an explicit variable source.
    ///
    /// An environment value is only read (and validated) when no override
    /// replaces it.
    pub fn from_lookup<F>(lookup: F, overrides: ChatOverrides) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = overrides
            .endpoint
            .or_else(|| lookup("MESHCHAT_ENDPOINT"))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.into());
        let model = overrides
            .model
            .or_else(|| lookup("MESHCHAT_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.into());
        let api_key = lookup("MESHCHAT_API_KEY")
            .or_else(|| lookup("HF_TOKEN"))
            .filter(|key| !key.trim().is_empty());

        let fragment_timeout = match overrides.timeout_secs {
            Some(secs) => timeout_from_secs(secs)?,
            None => match lookup("MESHCHAT_FRAGMENT_TIMEOUT_SECS") {
                Some(value) => {
                    let secs: f64 = value.trim().parse().map_err(|_| {
                        anyhow::anyhow!("MESHCHAT_FRAGMENT_TIMEOUT_SECS is not a number: {value}")
                    })?;
                    timeout_from_secs(secs)?
                }
                None => DEFAULT_FRAGMENT_TIMEOUT,
            },
        };

        anyhow::ensure!(!endpoint.trim().is_empty(), "endpoint must not be empty");
        anyhow::ensure!(!model.trim().is_empty(), "model must not be empty");

        Ok(Self {
            endpoint,
            model,
            fragment_timeout,
            api_key,
        })
    }

    /// Client settings for the generation backend.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.model.clone())
            .with_endpoint(self.endpoint.clone())
            .with_fragment_timeout(self.fragment_timeout);
        match &self.api_key {
            Some(key) => config.with_api_key(key.clone()),
            None => config,
        }
    }
}

/// Convert a positive number of seconds into a fragment timeout.
pub fn timeout_from_secs(secs: f64) -> anyhow::Result<Duration> {
    anyhow::ensure!(
        secs.is_finite() && secs > 0.0,
        "fragment timeout must be a positive number of seconds, got {secs}"
    );
    Duration::try_from_secs_f64(secs)
        .map_err(|e| anyhow::anyhow!("fragment timeout of {secs} seconds is out of range: {e}"))
}
