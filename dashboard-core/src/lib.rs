//! Core library for the weather & currency dashboard.
//!
//! This crate defines:
//! - Clients for the weather and exchange-rate providers
//! - Typed records for their responses, plus derived forecast views
//! - Configuration, favorites and settings persistence
//! - In-memory conversion history and weather alerts
//!
//! It is used by `dashboard-cli`, but any other front end can drive it.

pub mod alerts;
pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod history;
mod http;
pub mod model;
pub mod provider;
pub mod settings;

pub use alerts::{AlertLevel, WeatherAlert, alerts_for};
pub use config::{Config, ProviderConfig};
pub use error::ClientError;
pub use favorites::FavoritesStore;
pub use history::ConversionHistory;
pub use http::HTTP_TIMEOUT;
pub use model::{ConversionResult, CurrentWeather, DailySummary, ForecastSample, ForecastSeries};
pub use provider::{
    CurrencyClient, ProviderId, RateProvider, WeatherClient, WeatherProvider,
    exchangerate::SUPPORTED_CURRENCIES, openweather::DEFAULT_FORECAST_DAYS,
};
pub use settings::{Settings, SettingsStore, TemperatureUnit, Theme};
