use anyhow::{Context, bail};
use chrono::FixedOffset;
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, ConversionHistory, CurrencyClient, DEFAULT_FORECAST_DAYS, FavoritesStore, ProviderId,
    SUPPORTED_CURRENCIES, Settings, SettingsStore, TemperatureUnit, Theme, WeatherClient,
    alerts_for,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Weather and currency dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name: "openweather" or "exchangerate".
        provider: String,
    },

    /// Show current weather, alerts and forecast for a city.
    Weather {
        /// City name; defaults to the city in settings.
        city: Option<String>,

        /// Forecast length. The provider always returns five days.
        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: u32,
    },

    /// Convert an amount into one or more currencies.
    Convert {
        amount: f64,

        /// Source currency code, e.g. USD.
        from: String,

        /// Target currency codes.
        #[arg(required = true)]
        to: Vec<String>,
    },

    /// List supported currency codes.
    Currencies,

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Show or change preferences.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    Add { city: String },
    Remove { city: String },
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Show,
    /// "celsius" or "fahrenheit".
    Unit { unit: String },
    /// "light", "dark" or "toggle".
    Theme { theme: String },
    /// City shown by `weather` when none is given.
    City { name: String },
    /// Restore defaults and clear favorites.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Weather { city, days } => weather(city, days).await,
            Command::Convert { amount, from, to } => convert(amount, &from, &to).await,
            Command::Currencies => {
                println!("{}", SUPPORTED_CURRENCIES.join(", "));
                Ok(())
            }
            Command::Favorites { action } => favorites(action),
            Command::Settings { action } => settings(action.unwrap_or(SettingsAction::Show)),
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    Ok(Config::load()?.with_env_overrides())
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut cfg = Config::load()?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    cfg.upsert_provider_api_key(id, api_key.trim().to_string());
    cfg.save()?;

    println!("Saved API key for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn weather(city: Option<String>, days: u32) -> anyhow::Result<()> {
    let settings = SettingsStore::open_default()?.load();
    let favorites = FavoritesStore::open_default()?;
    let unit = settings.temperature_unit;
    let city = city.unwrap_or(settings.default_city);

    let client = WeatherClient::from_config(&load_config()?);

    match client.get_current_weather(&city).await {
        Some(current) => {
            let star = if favorites.contains(&city) { " *" } else { "" };
            println!("{}{star}", output::current_weather(&current, unit));
            println!();
            for alert in alerts_for(&current) {
                println!("{}", output::alert(&alert));
            }
        }
        None => println!("Current weather unavailable for {city}."),
    }

    println!();
    let Some(series) = client.get_forecast(&city, days).await else {
        println!("Forecast unavailable for {city}.");
        return Ok(());
    };

    let offset = FixedOffset::east_opt(series.utc_offset_secs)
        .or_else(|| FixedOffset::east_opt(0))
        .context("invalid UTC offset")?;

    println!("Today");
    for sample in series.today_local() {
        println!("{}", output::sample(sample, offset, unit));
    }

    println!();
    println!("5-day forecast");
    for day in series.daily_rollup() {
        println!("{}", output::daily(&day, unit));
    }

    Ok(())
}

fn check_currency(code: &str) -> anyhow::Result<String> {
    let code = code.to_uppercase();
    if !SUPPORTED_CURRENCIES.contains(&code.as_str()) {
        bail!("Unsupported currency '{code}'. Run `dashboard currencies` to list supported codes.");
    }
    Ok(code)
}

async fn convert(amount: f64, from: &str, to: &[String]) -> anyhow::Result<()> {
    if !amount.is_finite() {
        bail!("Invalid amount");
    }
    let from = check_currency(from)?;
    let targets = to.iter().map(|c| check_currency(c)).collect::<anyhow::Result<Vec<_>>>()?;

    let client = CurrencyClient::from_config(&load_config()?);
    let mut history = ConversionHistory::new();

    for target in &targets {
        match client.convert_currency(amount, &from, target).await {
            Some(result) => {
                println!("{}", output::conversion(&result));
                history.push(result);
            }
            None => println!("Conversion {from} -> {target} unavailable."),
        }
    }

    if history.len() > 1 {
        println!();
        println!("Recent conversions");
        for entry in history.entries() {
            println!("  {} {} -> {:.2} {}", entry.amount, entry.from_currency, entry.converted, entry.to_currency);
        }
    }

    Ok(())
}

fn confirm(message: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    inquire::Confirm::new(message)
        .with_default(false)
        .prompt()
        .context("Failed to read confirmation")
}

fn favorites(action: FavoritesAction) -> anyhow::Result<()> {
    let store = FavoritesStore::open_default()?;

    match action {
        FavoritesAction::List => {
            let favorites = store.load();
            if favorites.is_empty() {
                println!("No favorite cities yet.");
            } else {
                println!("You have {} favorite cities saved", favorites.len());
                for city in favorites {
                    println!("  {city}");
                }
            }
        }
        FavoritesAction::Add { city } => {
            if store.add(&city)? {
                println!("Added {city} to favorites.");
            } else {
                println!("{city} is already a favorite.");
            }
        }
        FavoritesAction::Remove { city } => {
            if store.remove(&city)? {
                println!("Removed {city} from favorites.");
            } else {
                println!("{city} is not a favorite.");
            }
        }
        FavoritesAction::Clear { yes } => {
            if confirm("Remove all favorite cities?", yes)? {
                store.clear()?;
                println!("All favorites have been cleared.");
            }
        }
    }

    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("Temperature unit: {}", settings.temperature_unit);
    println!("Theme:            {}", settings.theme);
    println!("Default city:     {}", settings.default_city);
}

fn settings(action: SettingsAction) -> anyhow::Result<()> {
    let store = SettingsStore::open_default()?;
    let mut settings = store.load();

    match action {
        SettingsAction::Show => {
            print_settings(&settings);
            return Ok(());
        }
        SettingsAction::Unit { unit } => settings.temperature_unit = unit.parse::<TemperatureUnit>()?,
        SettingsAction::Theme { theme } => {
            settings.theme = if theme.eq_ignore_ascii_case("toggle") {
                settings.theme.toggle()
            } else {
                theme.parse::<Theme>()?
            };
        }
        SettingsAction::City { name } => settings.default_city = name,
        SettingsAction::Reset { yes } => {
            if confirm("This will clear all favorites and settings. Continue?", yes)? {
                let favorites = FavoritesStore::open_default()?;
                let settings = store.reset(Some(&favorites))?;
                println!("App has been reset to defaults.");
                print_settings(&settings);
            }
            return Ok(());
        }
    }

    store.save(&settings)?;
    print_settings(&settings);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_codes_are_normalized_and_checked() {
        assert_eq!(check_currency("usd").expect("supported"), "USD");
        assert!(check_currency("XYZ").is_err());
    }

    #[test]
    fn weather_days_default_to_five() {
        let cli = Cli::try_parse_from(["dashboard", "weather", "London"]).expect("parse");
        match cli.command {
            Command::Weather { city, days } => {
                assert_eq!(city.as_deref(), Some("London"));
                assert_eq!(days, 5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn convert_requires_a_target() {
        assert!(Cli::try_parse_from(["dashboard", "convert", "100", "USD"]).is_err());

        let cli = Cli::try_parse_from(["dashboard", "convert", "100", "USD", "EUR", "GBP"]).expect("parse");
        match cli.command {
            Command::Convert { amount, from, to } => {
                assert_eq!(amount, 100.0);
                assert_eq!(from, "USD");
                assert_eq!(to, vec!["EUR".to_string(), "GBP".to_string()]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
