//! Tools shipped with toolchat

mod calculator;
mod clock;
mod currency;
mod weather;

use std::sync::Arc;

use reqwest::Client;
use toolchat_config::ToolsConfig;

pub use calculator::{Calculator, evaluate, format_general};
pub use clock::Clock;
pub use currency::CurrencyConverter;
pub use weather::{GeoLocation, OpenWeatherClient, Weather};

use crate::registry::ToolRegistry;
use crate::tool::Tool;

/// Register every built-in tool enabled in `config`
///
/// All network-backed tools share one HTTP client.
pub fn register_builtin_tools(registry: &mut ToolRegistry, config: &ToolsConfig) {
    let client = Client::new();
    let weather_api = Arc::new(OpenWeatherClient::new(client.clone(), &config.weather));

    let builtins: [Arc<dyn Tool>; 5] = [
        Arc::new(Weather::new(weather_api.clone())),
        Arc::new(GeoLocation::new(weather_api)),
        Arc::new(Clock),
        Arc::new(Calculator),
        Arc::new(CurrencyConverter::new(client, config.currency.base_url.clone())),
    ];

    for tool in builtins {
        if config.is_enabled(tool.name()) {
            registry.register(tool);
        } else {
            tracing::debug!(tool = %tool.name(), "built-in tool disabled");
        }
    }

    if config.weather.effective_api_key().is_none()
        && (registry.contains("get_weather") || registry.contains("get_geo_location"))
    {
        tracing::warn!("no weather API key configured, weather tools will fail until tools.weather.api_key is set");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use toolchat_config::{BUILTIN_TOOL_NAMES, CurrencyConfig};
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{ToolError, ToolExecutor};

    #[test]
    fn registers_all_builtins_by_default() {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, &ToolsConfig::default());

        assert_eq!(registry.names().collect::<Vec<_>>(), BUILTIN_TOOL_NAMES);
    }

    #[test]
    fn respects_enabled_list() {
        let config = ToolsConfig {
            enabled: Some(vec!["calculate".to_owned(), "get_time".to_owned()]),
            ..ToolsConfig::default()
        };

        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, &config);

        assert_eq!(registry.names().collect::<Vec<_>>(), ["get_time", "calculate"]);
    }

    #[test]
    fn every_schema_is_an_object() {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, &ToolsConfig::default());

        for tool in registry.list() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(!tool.description.is_empty());
        }
    }

    #[tokio::test]
    async fn failed_currency_fetch_is_execution_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let config = ToolsConfig {
            currency: CurrencyConfig {
                base_url: Url::parse(&server.uri()).unwrap(),
            },
            ..ToolsConfig::default()
        };

        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, &config);
        let executor = ToolExecutor::new(Arc::new(registry));

        let Value::Object(args) = json!({"amount": 10, "from_currency": "USD", "to_currency": "EUR"}) else {
            unreachable!()
        };
        let err = executor.execute("convert_currency", args).await.unwrap_err();

        match err {
            ToolError::Execution { tool, cause } => {
                assert_eq!(tool, "convert_currency");
                assert!(cause.contains("error fetching exchange rates"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
