//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use toolchat_config::{Config, CorsConfig, HealthConfig, LlmConfig, ServerConfig, ToolsConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                llm: LlmConfig::default(),
                tools: ToolsConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Point the completion client at a mock backend
    pub fn with_llm(mut self, base_url: &str) -> Self {
        self.config.llm.base_url = base_url.parse().expect("valid URL");
        self.config.llm.model = "mock-model-1".to_owned();
        self.config.llm.api_key = Some(SecretString::from("test-key"));
        self
    }

    /// Register only the named built-in tools
    pub fn with_enabled_tools(mut self, names: &[&str]) -> Self {
        self.config.tools.enabled = Some(names.iter().map(|&n| n.to_owned()).collect());
        self
    }

    /// Replace the post-tool summary instruction
    pub fn with_summary_instruction(mut self, instruction: &str) -> Self {
        self.config.llm.summary_instruction = Some(instruction.to_owned());
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
