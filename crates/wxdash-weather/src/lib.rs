//! Weather history backend for wxdash
//!
//! Fetches current conditions from the OpenWeatherMap API, keeps a bounded
//! file-persisted history of samples, and replays the history with each
//! sample converted to a requested unit system.

pub mod history;
pub mod provider;
pub mod types;
pub mod units;

pub use history::HistoryStore;
pub use provider::WeatherProvider;
pub use types::{Metric, Sample, UnitSystem, WeatherError};
