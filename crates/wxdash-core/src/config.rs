use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Default base URL for the OpenWeatherMap current-weather API.
pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Placeholder value written into a freshly created config file.
const API_KEY_PLACEHOLDER: &str = "YOUR_OPENWEATHERMAP_API_KEY";

/// One week of hourly samples.
const DEFAULT_MAX_SAMPLES: usize = 168;

/// Unit system a sample's numeric fields are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter the weather API expects.
    pub fn api_value(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// The opposite unit system.
    pub fn other(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_value())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather fetch settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// History persistence settings
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: String,

    /// City fetched when no cities are given on the command line
    pub default_city: String,

    /// Optional list of cities for batch refreshes
    pub cities: Vec<String>,

    /// Unit system fetched samples are requested and tagged in
    pub units: UnitSystem,

    /// Base URL for the weather API (overridable for testing)
    pub api_base: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            default_city: "Dallas".to_string(),
            cities: Vec::new(),
            units: UnitSystem::default(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History file name, relative to the config directory unless absolute
    pub file: String,

    /// Maximum number of samples retained; oldest are evicted first
    pub max_samples: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: "weather_history.json".to_string(),
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wxdash")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("wxdash");
        Ok(dir.join("config.toml"))
    }

    /// Load configuration from the platform config directory, creating a
    /// default file if it doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path, creating a default file if
    /// it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Validation(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Save configuration to the platform config directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.weather.api_key.is_empty() || self.weather.api_key == API_KEY_PLACEHOLDER {
            result.add_warning(
                "weather.api_key",
                "No API key configured; fetches will fail and only cached history is shown",
            );
        }

        if Url::parse(&self.weather.api_base).is_err() {
            result.add_error("weather.api_base", "Not a valid URL");
        }

        if self.weather.default_city.is_empty() && self.weather.cities.is_empty() {
            result.add_error("weather.default_city", "No city configured");
        }

        if self.history.max_samples == 0 {
            result.add_error("history.max_samples", "History capacity must be greater than 0");
        } else if self.history.max_samples > 100_000 {
            result.add_warning(
                "history.max_samples",
                "History capacity is unusually large (>100000)",
            );
        }

        if self.history.file.is_empty() {
            result.add_error("history.file", "History file name must not be empty");
        }

        result
    }

    /// Absolute path of the history file.
    pub fn history_path(&self) -> PathBuf {
        let file = PathBuf::from(&self.history.file);
        if file.is_absolute() {
            file
        } else {
            self.config_dir.join(file)
        }
    }

    /// Cities to fetch on a refresh: the configured list, or the default city.
    pub fn city_list(&self) -> Vec<String> {
        if self.weather.cities.is_empty() {
            vec![self.weather.default_city.clone()]
        } else {
            self.weather.cities.clone()
        }
    }
}
