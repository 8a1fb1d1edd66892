use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Default base URL: Ollama's OpenAI-compatible endpoint
pub const DEFAULT_LLM_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model name
pub const DEFAULT_LLM_MODEL: &str = "llama3.2";

/// Completion service configuration
///
/// Any server speaking the OpenAI chat completions protocol works here
/// (Ollama, `OpenAI`, vLLM, LM Studio).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer token, omitted from requests when unset or empty
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Request timeout (e.g. "30s", "2m")
    #[serde(default)]
    pub timeout: Option<String>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate per reply
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Instruction appended after tool results, replacing the built-in one
    #[serde(default)]
    pub summary_instruction: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout: None,
            temperature: None,
            max_tokens: None,
            summary_instruction: None,
        }
    }
}

impl LlmConfig {
    /// Parse the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout string is not a valid duration
    pub fn timeout_duration(&self) -> anyhow::Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|raw| duration_str::parse(raw).map_err(|e| anyhow::anyhow!("invalid llm.timeout '{raw}': {e}")))
            .transpose()
    }

    /// API key, treating an empty string as absent
    pub fn effective_api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.expose_secret().is_empty())
    }
}

#[allow(clippy::missing_panics_doc)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_LLM_BASE_URL).expect("valid default URL")
}

fn default_model() -> String {
    DEFAULT_LLM_MODEL.to_owned()
}
