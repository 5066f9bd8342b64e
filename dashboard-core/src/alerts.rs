use serde::Serialize;

use crate::model::CurrentWeather;

pub const HEAT_THRESHOLD_C: f64 = 35.0;
pub const COLD_THRESHOLD_C: f64 = -10.0;
pub const WIND_THRESHOLD_MPS: f64 = 15.0;
pub const HEAVY_PRECIP_MM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherAlert {
    pub level: AlertLevel,
    pub message: String,
}

impl WeatherAlert {
    fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }
}

/// Alerts worth showing for `weather`; a single all-clear entry when nothing applies.
pub fn alerts_for(weather: &CurrentWeather) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();
    let city = &weather.city;

    match weather.condition.as_str() {
        "Thunderstorm" => alerts.push(WeatherAlert::new(
            AlertLevel::Warning,
            format!("Thunderstorm in {city}. Stay indoors if you can."),
        )),
        "Snow" => alerts.push(WeatherAlert::new(
            AlertLevel::Info,
            format!("Snow in {city}. Roads may be slippery."),
        )),
        _ => {}
    }

    if weather.temperature_c >= HEAT_THRESHOLD_C {
        alerts.push(WeatherAlert::new(
            AlertLevel::Warning,
            format!("Extreme heat in {city}: {:.1}°C.", weather.temperature_c),
        ));
    } else if weather.temperature_c <= COLD_THRESHOLD_C {
        alerts.push(WeatherAlert::new(
            AlertLevel::Warning,
            format!("Extreme cold in {city}: {:.1}°C.", weather.temperature_c),
        ));
    }

    if weather.wind_speed_mps >= WIND_THRESHOLD_MPS {
        alerts.push(WeatherAlert::new(
            AlertLevel::Warning,
            format!("Strong wind in {city}: {:.1} m/s.", weather.wind_speed_mps),
        ));
    }

    if weather.precipitation_mm.is_some_and(|mm| mm >= HEAVY_PRECIP_MM) {
        alerts.push(WeatherAlert::new(
            AlertLevel::Warning,
            format!("Heavy precipitation in {city}."),
        ));
    }

    if alerts.is_empty() {
        alerts.push(WeatherAlert::new(AlertLevel::Success, format!("No active alerts for {city}.")));
    }

    alerts
}
