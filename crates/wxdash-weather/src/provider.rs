//! OpenWeatherMap current-conditions client.

use std::time::Duration;

use chrono::Local;
use serde::Deserialize;

use crate::types::{Sample, UnitSystem, WeatherError};
use wxdash_core::config::WeatherConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Timestamp format shared with persisted history records.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    main: ApiMain,
    wind: ApiWind,
    weather: Vec<ApiCondition>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    main: String,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    units: UnitSystem,
}

impl WeatherProvider {
    /// Build a provider from the weather section of the config.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units,
        })
    }

    /// Unit system fetched samples are requested and tagged in.
    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Fetch current conditions for one city.
    pub async fn fetch(&self, city: &str) -> Result<Sample, WeatherError> {
        let url = format!("{}/weather", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.api_value()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse = response.json().await?;
        let condition = body
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("response has no weather conditions".into()))?;

        Ok(Sample {
            city: city.to_string(),
            temperature: body.main.temp,
            humidity: body.main.humidity,
            pressure: body.main.pressure,
            wind_speed: body.wind.speed,
            weather_condition: condition.main,
            unit_system: self.units,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        })
    }

    /// Fetch a batch of cities. A failed city is logged and skipped; the
    /// remaining samples are still returned.
    pub async fn fetch_all(&self, cities: &[String]) -> Vec<Sample> {
        let mut samples = Vec::with_capacity(cities.len());
        for city in cities {
            match self.fetch(city).await {
                Ok(sample) => samples.push(sample),
                Err(e) => tracing::warn!("Error fetching weather for {}: {}", city, e),
            }
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base: &str, units: UnitSystem) -> WeatherConfig {
        WeatherConfig {
            api_key: "test-key".to_string(),
            api_base: base.to_string(),
            units,
            ..WeatherConfig::default()
        }
    }

    fn weather_body(temp: f64) -> serde_json::Value {
        serde_json::json!({
            "main": { "temp": temp, "humidity": 48, "pressure": 1012.0 },
            "wind": { "speed": 3.4 },
            "weather": [ { "main": "Clouds", "description": "scattered clouds" } ]
        })
    }

    #[tokio::test]
    async fn test_fetch_parses_openweather_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Dallas"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(21.5)))
            .mount(&server)
            .await;

        let provider =
            WeatherProvider::new(&test_config(&server.uri(), UnitSystem::Metric)).unwrap();
        let sample = provider.fetch("Dallas").await.unwrap();

        assert_eq!(sample.city, "Dallas");
        assert_eq!(sample.temperature, 21.5);
        assert_eq!(sample.humidity, 48.0);
        assert_eq!(sample.pressure, 1012.0);
        assert_eq!(sample.wind_speed, 3.4);
        assert_eq!(sample.weather_condition, "Clouds");
        assert_eq!(sample.unit_system, UnitSystem::Metric);
        assert!(!sample.timestamp.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_requests_and_tags_imperial() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(70.7)))
            .mount(&server)
            .await;

        let provider =
            WeatherProvider::new(&test_config(&server.uri(), UnitSystem::Imperial)).unwrap();
        let sample = provider.fetch("Dallas").await.unwrap();

        assert_eq!(sample.unit_system, UnitSystem::Imperial);
        assert_eq!(sample.temperature, 70.7);
    }

    #[tokio::test]
    async fn test_fetch_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider =
            WeatherProvider::new(&test_config(&server.uri(), UnitSystem::Metric)).unwrap();
        let result = provider.fetch("Nowheresville").await;
        assert!(matches!(result, Err(WeatherError::Network(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_conditions() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "main": { "temp": 20.0, "humidity": 48, "pressure": 1012.0 },
            "wind": { "speed": 3.4 },
            "weather": []
        });
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider =
            WeatherProvider::new(&test_config(&server.uri(), UnitSystem::Metric)).unwrap();
        let result = provider.fetch("Dallas").await;
        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_skips_failed_cities() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Dallas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(21.0)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Atlantis"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Plano"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(22.0)))
            .mount(&server)
            .await;

        let provider =
            WeatherProvider::new(&test_config(&server.uri(), UnitSystem::Metric)).unwrap();
        let cities = vec![
            "Dallas".to_string(),
            "Atlantis".to_string(),
            "Plano".to_string(),
        ];
        let samples = provider.fetch_all(&cities).await;

        let fetched: Vec<&str> = samples.iter().map(|s| s.city.as_str()).collect();
        assert_eq!(fetched, ["Dallas", "Plano"]);
    }
}
