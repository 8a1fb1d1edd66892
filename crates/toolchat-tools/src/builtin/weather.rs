//! `get_geo_location` and `get_weather`, backed by `OpenWeatherMap`

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use toolchat_config::WeatherConfig;
use url::Url;

use crate::tool::{Tool, parse_arguments};

/// HTTP access to the geocoding and current-weather endpoints
///
/// Shared by both weather tools.
pub struct OpenWeatherClient {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    units: String,
}

/// A geocoding match
#[derive(Debug, Clone, Deserialize)]
struct Place {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    name: String,
    sys: WeatherSys,
    main: WeatherMain,
    weather: Vec<WeatherCondition>,
    wind: WeatherWind,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct WeatherSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherWind {
    speed: f64,
}

impl OpenWeatherClient {
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.effective_api_key().cloned(),
            units: config.units.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{path}")
    }

    fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .ok_or_else(|| anyhow::anyhow!("weather API key is not configured"))
    }

    /// Errors are stripped of the request URL, which carries the API key
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> anyhow::Result<T> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .query(&[("appid", self.api_key()?)])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("error fetching {what}: {}", e.without_url()))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("error fetching {what}: {}", e.without_url()))?;

        response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("error parsing {what}: {}", e.without_url()))
    }

    async fn geocode(&self, query: &str) -> anyhow::Result<Place> {
        let places: Vec<Place> = self
            .get_json("/geo/1.0/direct", &[("q", query), ("limit", "1")], "geolocation data")
            .await?;

        places
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("location not found: {query}"))
    }

    async fn current(&self, place: &Place) -> anyhow::Result<CurrentWeather> {
        let lat = place.lat.to_string();
        let lon = place.lon.to_string();

        self.get_json(
            "/data/2.5/weather",
            &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", self.units.as_str())],
            "weather data",
        )
        .await
    }

    fn temperature_unit(&self) -> &'static str {
        match self.units.as_str() {
            "imperial" => "°F",
            "standard" => "K",
            _ => "°C",
        }
    }

    fn speed_unit(&self) -> &'static str {
        if self.units == "imperial" { "mph" } else { "m/s" }
    }
}

#[derive(Debug, Deserialize)]
struct GeoArgs {
    city: String,
}

/// `get_geo_location`
pub struct GeoLocation {
    api: Arc<OpenWeatherClient>,
}

impl GeoLocation {
    pub const fn new(api: Arc<OpenWeatherClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GeoLocation {
    fn name(&self) -> &str {
        "get_geo_location"
    }

    fn description(&self) -> &str {
        "Get geolocation data for a city"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name, e.g., 'New York'"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, arguments: Map<String, Value>) -> anyhow::Result<Value> {
        let args: GeoArgs = parse_arguments(arguments)?;
        let place = self.api.geocode(&args.city).await?;

        Ok(json!({
            "name": place.name,
            "lat": place.lat,
            "lon": place.lon,
            "country": place.country,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    city: String,
    #[serde(default)]
    country: Option<String>,
}

/// `get_weather`
pub struct Weather {
    api: Arc<OpenWeatherClient>,
}

impl Weather {
    pub const fn new(api: Arc<OpenWeatherClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for Weather {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get current weather information for a city"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name, e.g., 'New York'"
                },
                "country": {
                    "type": "string",
                    "description": "Country code (optional), e.g., 'US'"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, arguments: Map<String, Value>) -> anyhow::Result<Value> {
        let args: WeatherArgs = parse_arguments(arguments)?;

        let query = match args.country.as_deref().map(str::trim) {
            Some(country) if !country.is_empty() => format!("{},{country}", args.city),
            _ => args.city,
        };

        let place = self.api.geocode(&query).await?;
        let current = self.api.current(&place).await?;

        let description = current
            .weather
            .first()
            .map(|condition| condition.description.clone())
            .ok_or_else(|| anyhow::anyhow!("error parsing weather data: no conditions reported"))?;

        let location = match current.sys.country {
            Some(country) => format!("{}, {country}", current.name),
            None => current.name,
        };

        let degrees = self.api.temperature_unit();

        Ok(json!({
            "location": location,
            "temperature": format!("{}{degrees}", current.main.temp),
            "feels_like": format!("{}{degrees}", current.main.feels_like),
            "description": description,
            "humidity": format!("{}%", current.main.humidity),
            "wind_speed": format!("{} {}", current.wind.speed, self.api.speed_unit()),
            "timestamp": current.dt,
        }))
    }
}
