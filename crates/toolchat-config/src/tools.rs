use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Names of every built-in tool, in registration order
pub const BUILTIN_TOOL_NAMES: &[&str] = &[
    "get_weather",
    "get_geo_location",
    "get_time",
    "calculate",
    "convert_currency",
];

/// Built-in tool configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Tools to register at startup (all built-ins when unset)
    #[serde(default)]
    pub enabled: Option<Vec<String>>,
    /// Weather and geocoding tools
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Currency conversion tool
    #[serde(default)]
    pub currency: CurrencyConfig,
}

impl ToolsConfig {
    /// Whether the named built-in should be registered
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled
            .as_ref()
            .is_none_or(|enabled| enabled.iter().any(|n| n == name))
    }
}

/// `OpenWeatherMap` settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherConfig {
    /// API key (`appid` query parameter)
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// API base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: Url,
    /// Unit system: `standard`, `metric` or `imperial`
    #[serde(default = "default_units")]
    pub units: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            units: default_units(),
        }
    }
}

impl WeatherConfig {
    /// API key, treating an empty string as absent
    pub fn effective_api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.expose_secret().is_empty())
    }
}

/// Exchange rate API settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrencyConfig {
    /// API base URL; `/latest/{CODE}` is appended
    #[serde(default = "default_currency_base_url")]
    pub base_url: Url,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_url: default_currency_base_url(),
        }
    }
}

fn default_weather_base_url() -> Url {
    Url::parse("https://api.openweathermap.org").expect("valid default URL")
}

fn default_currency_base_url() -> Url {
    Url::parse("https://open.er-api.com/v6").expect("valid default URL")
}

fn default_units() -> String {
    "metric".to_owned()
}
