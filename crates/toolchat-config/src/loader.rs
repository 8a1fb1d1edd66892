use std::path::Path;

use crate::{AnyOrArray, BUILTIN_TOOL_NAMES, Config};

/// Unit systems accepted by the weather API
const WEATHER_UNITS: &[&str] = &["standard", "metric", "imperial"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error on a relative health path, CORS credentials combined
    /// with a wildcard, an empty model name, an unparseable timeout, unknown
    /// tool names or invalid telemetry settings
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server_config()?;
        self.validate_llm_config()?;
        self.validate_tools_config()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/', got '{}'", health.path);
        }

        if let Some(ref cors) = self.server.cors
            && cors.credentials
        {
            let wildcards = [
                ("origins", &cors.origins),
                ("methods", &cors.methods),
                ("headers", &cors.headers),
            ];

            for (field, value) in wildcards {
                if *value == AnyOrArray::Any {
                    anyhow::bail!(
                        "server.cors.credentials cannot be combined with a wildcard; list explicit server.cors.{field}"
                    );
                }
            }
        }

        Ok(())
    }

    fn validate_llm_config(&self) -> anyhow::Result<()> {
        if self.llm.model.trim().is_empty() {
            anyhow::bail!("llm.model must not be empty");
        }

        self.llm.timeout_duration()?;

        if let Some(temperature) = self.llm.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            anyhow::bail!("llm.temperature must be between 0.0 and 2.0, got {temperature}");
        }

        Ok(())
    }

    fn validate_tools_config(&self) -> anyhow::Result<()> {
        if let Some(ref enabled) = self.tools.enabled {
            for name in enabled {
                if !BUILTIN_TOOL_NAMES.contains(&name.as_str()) {
                    anyhow::bail!(
                        "unknown tool '{name}' in tools.enabled (available: {})",
                        BUILTIN_TOOL_NAMES.join(", ")
                    );
                }
            }
        }

        let units = self.tools.weather.units.as_str();
        if !WEATHER_UNITS.contains(&units) {
            anyhow::bail!("tools.weather.units must be one of standard, metric, imperial, got '{units}'");
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&telemetry.sampling_rate) {
            anyhow::bail!("telemetry.sampling_rate must be between 0.0 and 1.0");
        }

        if telemetry.exporter.as_ref().is_some_and(|exporter| exporter.interval == 0) {
            anyhow::bail!("telemetry.exporter.interval must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, DEFAULT_LISTEN_ADDRESS, LogFormat};

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();

        assert!(config.server.listen_address.is_none());
        assert_eq!(DEFAULT_LISTEN_ADDRESS.port(), 8000);
        assert!(config.server.health.enabled);
        assert_eq!(config.llm.model, "llama3.2");
        assert!(config.tools.enabled.is_none());
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config = Config::from_toml(
            r#"
            [server]
            listen_address = "127.0.0.1:9000"

            [server.health]
            path = "/healthz"

            [llm]
            base_url = "http://llm.internal/v1"
            model = "qwen2.5"
            timeout = "45s"
            temperature = 0.2

            [tools]
            enabled = ["calculate", "get_time"]

            [tools.weather]
            units = "imperial"

            [telemetry]
            service_name = "toolchat-test"
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_address.unwrap().port(), 9000);
        assert_eq!(config.server.health.path, "/healthz");
        assert_eq!(config.llm.model, "qwen2.5");
        assert!(config.llm.temperature.is_some_and(|t| (t - 0.2).abs() < f64::EPSILON));
        assert!(config.tools.is_enabled("get_time"));
        assert!(!config.tools.is_enabled("convert_currency"));

        let telemetry = config.telemetry.unwrap();
        assert_eq!(telemetry.service_name, "toolchat-test");
        assert_eq!(telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Config::from_toml("[llm]\nmodel_name = \"x\"").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn rejects_empty_model() {
        let err = Config::from_toml("[llm]\nmodel = \"  \"").unwrap_err();
        assert!(err.to_string().contains("llm.model"));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_toml("[llm]\ntimeout = \"eventually\"").unwrap_err();
        assert!(err.to_string().contains("llm.timeout"));
    }

    #[test]
    fn rejects_relative_health_path() {
        let err = Config::from_toml("[server.health]\npath = \"health\"").unwrap_err();
        assert!(err.to_string().contains("server.health.path"));
    }

    #[test]
    fn rejects_credentials_with_wildcard_cors() {
        let err = Config::from_toml("[server.cors]\ncredentials = true").unwrap_err();
        assert!(err.to_string().contains("server.cors.origins"));

        let raw = r#"
            [server.cors]
            credentials = true
            origins = ["https://app.example.com"]
            methods = ["GET", "POST"]
        "#;
        let err = Config::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("server.cors.headers"));
    }

    #[test]
    fn accepts_credentials_with_explicit_cors_lists() {
        let raw = r#"
            [server.cors]
            credentials = true
            origins = ["https://app.example.com"]
            methods = ["GET", "POST"]
            headers = ["content-type"]
        "#;
        let config = Config::from_toml(raw).unwrap();
        assert!(config.server.cors.unwrap().credentials);
    }

    #[test]
    fn rejects_unknown_tool() {
        let err = Config::from_toml("[tools]\nenabled = [\"launch_rockets\"]").unwrap_err();
        assert!(err.to_string().contains("launch_rockets"));
    }

    #[test]
    fn rejects_unknown_units() {
        let err = Config::from_toml("[tools.weather]\nunits = \"kelvin\"").unwrap_err();
        assert!(err.to_string().contains("tools.weather.units"));
    }

    #[test]
    fn rejects_out_of_range_sampling() {
        let err = Config::from_toml("[telemetry]\nsampling_rate = 1.5").unwrap_err();
        assert!(err.to_string().contains("sampling_rate"));
    }

    #[test]
    fn load_expands_environment() {
        let path = std::env::temp_dir().join(format!("toolchat-loader-{}.toml", std::process::id()));
        std::fs::write(&path, "[llm]\nmodel = \"{{ env.TOOLCHAT_LOADER_MODEL }}\"\n").unwrap();

        temp_env::with_var("TOOLCHAT_LOADER_MODEL", Some("mistral"), || {
            let config = Config::load(&path).unwrap();
            assert_eq!(config.llm.model, "mistral");
        });

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(std::path::Path::new("/nonexistent/toolchat.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn bundled_sample_config_is_valid() {
        let vars = ["TOOLCHAT_LLM_BASE_URL", "TOOLCHAT_LLM_MODEL", "OPENWEATHER_API_KEY"];
        temp_env::with_vars_unset(vars, || {
            let config = Config::from_toml(include_str!("../../../toolchat.toml")).unwrap();
            assert_eq!(config.llm.model, "llama3.2");
            assert!(config.tools.weather.effective_api_key().is_none());
            assert!(config.server.cors.is_some());
        });
    }
}
