use chrono::FixedOffset;
use dashboard_core::{
    AlertLevel, ConversionResult, CurrentWeather, DailySummary, ForecastSample, TemperatureUnit,
    WeatherAlert,
};

fn temp(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.1}{}", unit.convert(celsius), unit.symbol())
}

pub fn current_weather(w: &CurrentWeather, unit: TemperatureUnit) -> String {
    let mut lines = vec![
        format!("{} ({:.2}, {:.2})", w.city, w.latitude, w.longitude),
        format!("  {} - {}", w.condition, w.description),
        format!("  Temperature: {} (feels like {})", temp(w.temperature_c, unit), temp(w.feels_like_c, unit)),
        format!("  Humidity:    {}%", w.humidity_pct),
        format!("  Wind:        {:.1} m/s", w.wind_speed_mps),
        format!("  Pressure:    {:.0} hPa", w.pressure_hpa),
    ];
    if let Some(mm) = w.precipitation_mm {
        lines.push(format!("  Precip:      {mm:.1} mm/h"));
    }
    lines.join("\n")
}

pub fn alert(a: &WeatherAlert) -> String {
    let tag = match a.level {
        AlertLevel::Warning => "[!]",
        AlertLevel::Info => "[i]",
        AlertLevel::Success => "[ok]",
    };
    format!("{tag} {}", a.message)
}

pub fn sample(s: &ForecastSample, offset: FixedOffset, unit: TemperatureUnit) -> String {
    let local = s.timestamp.with_timezone(&offset);
    format!("  {}  {:>8}  {}", local.format("%H:%M"), temp(s.temperature_c, unit), s.condition)
}

pub fn daily(d: &DailySummary, unit: TemperatureUnit) -> String {
    format!(
        "  {}  {:>8} / {:<8}  {}",
        d.date.format("%a %d %b"),
        temp(d.max_temp_c, unit),
        temp(d.min_temp_c, unit),
        d.condition
    )
}

pub fn conversion(c: &ConversionResult) -> String {
    format!(
        "{:.2} {} = {:.2} {}  (rate: 1 {} = {:.4} {})",
        c.amount, c.from_currency, c.converted, c.to_currency, c.from_currency, c.rate, c.to_currency
    )
}
