use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::Config,
    error::ClientError,
    http,
    model::{CurrentWeather, ForecastSample, ForecastSeries},
    provider::{ProviderId, WeatherProvider},
};

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";

/// Day count requested when the caller has no preference.
pub const DEFAULT_FORECAST_DAYS: u32 = 5;

/// OpenWeatherMap client for current conditions and the 5-day/3-hour forecast.
///
/// Every call is a single request. Failures are logged and reported as `None`
/// by the `get_*` methods; the `fetch_*` methods return the underlying error.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Build from config; a missing key is passed through and left for the provider to reject.
    pub fn from_config(config: &Config) -> Self {
        let id = ProviderId::OpenWeather;
        let api_key = config.provider_api_key(id).unwrap_or_default().to_string();
        if api_key.is_empty() {
            debug!(provider = %id, "no API key configured");
        }

        match config.provider_base_url(id) {
            Some(base) => Self::with_base_url(api_key, base.to_string()),
            None => Self::new(api_key),
        }
    }

    /// Current conditions for `city`, or `None` if they could not be fetched.
    pub async fn get_current_weather(&self, city: &str) -> Option<CurrentWeather> {
        match self.fetch_current_weather(city).await {
            Ok(weather) => Some(weather),
            Err(e) => {
                warn!(city, error = %e, "error fetching weather");
                None
            }
        }
    }

    /// Forecast series for `city`, or `None` if it could not be fetched.
    ///
    /// `days` does not shape the request; the provider always answers with its
    /// full 5-day, 3-hour series.
    pub async fn get_forecast(&self, city: &str, days: u32) -> Option<ForecastSeries> {
        match self.fetch_forecast(city, days).await {
            Ok(series) => Some(series),
            Err(e) => {
                warn!(city, error = %e, "error fetching forecast");
                None
            }
        }
    }

    async fn request<T>(&self, endpoint: &str, city: &str) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.base_url);
        let req = self.http.get(url).query(&[
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ]);

        http::get_json(req).await.map_err(|e| e.scrubbed(&self.api_key))
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    #[instrument(skip(self))]
    async fn fetch_current_weather(&self, city: &str) -> Result<CurrentWeather, ClientError> {
        let parsed: OwCurrentResponse = self.request("weather", city).await?;
        Ok(parsed.into())
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, city: &str, days: u32) -> Result<ForecastSeries, ClientError> {
        debug!(days, "forecast length is fixed by the provider");
        let parsed: OwForecastResponse = self.request("forecast", city).await?;
        parsed.try_into()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwPrecip {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    coord: OwCoord,
    rain: Option<OwPrecip>,
    snow: Option<OwPrecip>,
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(r: OwCurrentResponse) -> Self {
        let (condition, description) = r
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        let precipitation_mm = r
            .rain
            .and_then(|p| p.one_hour)
            .or_else(|| r.snow.and_then(|p| p.one_hour));

        CurrentWeather {
            city: r.name,
            temperature_c: r.main.temp,
            condition,
            description,
            humidity_pct: r.main.humidity,
            wind_speed_mps: r.wind.speed,
            feels_like_c: r.main.feels_like.unwrap_or(r.main.temp),
            pressure_hpa: r.main.pressure,
            latitude: r.coord.lat,
            longitude: r.coord.lon,
            precipitation_mm,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwCity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwForecastResponse> for ForecastSeries {
    type Error = ClientError;

    fn try_from(r: OwForecastResponse) -> Result<Self, Self::Error> {
        let samples = r
            .list
            .into_iter()
            .map(|e| -> Result<ForecastSample, ClientError> {
                let timestamp = unix_to_utc(e.dt)
                    .ok_or_else(|| ClientError::Parse(format!("invalid forecast timestamp {}", e.dt)))?;
                let condition = e
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| w.main)
                    .unwrap_or_else(|| "Unknown".to_string());

                Ok(ForecastSample { timestamp, temperature_c: e.main.temp, condition })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastSeries { city: r.city.name, utc_offset_secs: r.city.timezone, samples })
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
