use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions for one city, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub temperature_c: f64,
    /// Condition category, e.g. "Clear", "Rain", "Thunderstorm".
    pub condition: String,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub feels_like_c: f64,
    pub pressure_hpa: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Precipitation over the last hour, when the provider reports any.
    pub precipitation_mm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub condition: String,
}

/// 3-hourly forecast samples in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub city: String,
    /// Offset of the city's local time from UTC; calendar days are cut here.
    pub utc_offset_secs: i32,
    pub samples: Vec<ForecastSample>,
}

/// One day of the rolled-up forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    /// Units of `to_currency` per one unit of `from_currency`.
    pub rate: f64,
    /// `amount * rate`, rounded to two decimals.
    pub converted: f64,
}

impl ConversionResult {
    pub fn new(amount: f64, from_currency: &str, to_currency: &str, rate: f64) -> Self {
        Self {
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
            amount,
            rate,
            converted: round2(amount * rate),
        }
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
