use serde::{Deserialize, Serialize};

pub use wxdash_core::config::UnitSystem;

/// One fetched weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub city: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub weather_condition: String,
    /// Unit system the numeric fields are expressed in. Records persisted
    /// before unit tagging lack this field and load as metric.
    #[serde(default)]
    pub unit_system: UnitSystem,
    pub timestamp: String,
}

/// Numeric metrics a sample carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Pressure,
        Metric::WindSpeed,
    ];

    /// Column key used in persisted records.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Pressure => "pressure",
            Metric::WindSpeed => "wind_speed",
        }
    }

    /// Display label, including the unit for the given system.
    pub fn label(self, units: UnitSystem) -> &'static str {
        match (self, units) {
            (Metric::Temperature, UnitSystem::Metric) => "Temperature (°C)",
            (Metric::Temperature, UnitSystem::Imperial) => "Temperature (°F)",
            (Metric::Humidity, _) => "Humidity (%)",
            (Metric::Pressure, UnitSystem::Metric) => "Pressure (hPa)",
            (Metric::Pressure, UnitSystem::Imperial) => "Pressure (inHg)",
            (Metric::WindSpeed, UnitSystem::Metric) => "Wind Speed (m/s)",
            (Metric::WindSpeed, UnitSystem::Imperial) => "Wind Speed (mph)",
        }
    }

    /// Read this metric's value from a sample.
    pub fn value(self, sample: &Sample) -> f64 {
        match self {
            Metric::Temperature => sample.temperature,
            Metric::Humidity => sample.humidity,
            Metric::Pressure => sample.pressure,
            Metric::WindSpeed => sample.wind_speed,
        }
    }
}

/// Weather domain errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
