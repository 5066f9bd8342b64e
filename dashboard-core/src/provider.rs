use crate::{
    error::ClientError,
    model::{ConversionResult, CurrentWeather, ForecastSeries},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};
use tracing::warn;

pub mod exchangerate;
pub mod openweather;

pub use exchangerate::CurrencyClient;
pub use openweather::WeatherClient;

/// The two hard-wired upstream services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    ExchangeRate,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::ExchangeRate => "exchangerate",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::ExchangeRate]
    }

    /// Environment variable that overrides the configured API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::ExchangeRate => "EXCHANGERATE_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "exchangerate" => Ok(ProviderId::ExchangeRate),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, exchangerate."
            )),
        }
    }
}

/// Source of current conditions and forecasts.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current_weather(&self, city: &str) -> Result<CurrentWeather, ClientError>;

    async fn fetch_forecast(&self, city: &str, days: u32) -> Result<ForecastSeries, ClientError>;
}

/// Source of pairwise exchange rates.
#[async_trait]
pub trait RateProvider: Send + Sync + Debug {
    async fn fetch_exchange_rate(&self, from: &str, to: &str) -> Result<f64, ClientError>;

    /// Fetch a fresh rate and apply it to `amount`. Nothing is computed without a rate.
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Option<ConversionResult> {
        match self.fetch_exchange_rate(from, to).await {
            Ok(rate) => Some(ConversionResult::new(amount, from, to, rate)),
            Err(e) => {
                warn!(from, to, error = %e, "currency conversion unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_parsing_ignores_case() {
        assert_eq!(ProviderId::try_from("OpenWeather").expect("parse"), ProviderId::OpenWeather);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[derive(Debug)]
    struct FixedRate {
        rate: Option<f64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateProvider for FixedRate {
        async fn fetch_exchange_rate(&self, _from: &str, _to: &str) -> Result<f64, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rate.ok_or_else(|| ClientError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn convert_applies_rate() {
        let provider = FixedRate { rate: Some(0.9234), calls: AtomicUsize::new(0) };

        let result = provider.convert(100.0, "USD", "EUR").await.expect("rate available");
        assert_eq!(result.converted, 92.34);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn convert_without_rate_is_absent() {
        let provider = FixedRate { rate: None, calls: AtomicUsize::new(0) };

        assert!(provider.convert(100.0, "USD", "EUR").await.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
