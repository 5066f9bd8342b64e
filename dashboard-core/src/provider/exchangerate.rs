use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::Config,
    error::ClientError,
    http,
    model::ConversionResult,
    provider::{ProviderId, RateProvider},
};

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Currency codes offered to users. Fixed; never fetched from the provider.
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY",
    "SEK", "NZD", "MXN", "SGD", "HKD", "NOK", "KRW", "TRY",
    "INR", "RUB", "BRL", "ZAR", "DKK", "PLN", "THB", "IDR",
    "HUF", "CZK", "ILS", "CLP", "PHP", "AED", "SAR", "MYR",
    "NGN", "ARS", "TWD", "VND", "UAH", "BDT", "PKR", "EGP",
];

/// ExchangeRate-API client for pair rates.
///
/// Codes are passed through untouched; checking them against
/// [`SUPPORTED_CURRENCIES`] is up to the caller.
#[derive(Debug, Clone)]
pub struct CurrencyClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl CurrencyClient {
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

    pub fn from_config(config: &Config) -> Self {
        let id = ProviderId::ExchangeRate;
        let api_key = config.provider_api_key(id).unwrap_or_default().to_string();
        if api_key.is_empty() {
            debug!(provider = %id, "no API key configured");
        }

        match config.provider_base_url(id) {
            Some(base) => Self::with_base_url(api_key, base.to_string()),
            None => Self::new(api_key),
        }
    }

    /// Units of `to_currency` per one `from_currency`, or `None` on any failure.
    pub async fn get_exchange_rate(&self, from_currency: &str, to_currency: &str) -> Option<f64> {
        match self.fetch_exchange_rate(from_currency, to_currency).await {
            Ok(rate) => Some(rate),
            Err(e) if e.is_remote() => {
                warn!(from = from_currency, to = to_currency, error = %e, "API error");
                None
            }
            Err(e) => {
                warn!(from = from_currency, to = to_currency, error = %e, "error fetching exchange rate");
                None
            }
        }
    }

    /// Convert `amount` at a freshly fetched rate. `None` if no rate was obtained.
    pub async fn convert_currency(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
    ) -> Option<ConversionResult> {
        self.convert(amount, from_currency, to_currency).await
    }

    pub fn get_supported_currencies(&self) -> &'static [&'static str] {
        SUPPORTED_CURRENCIES
    }

    /// `{base}/{key}/pair/{from}/{to}`, each code escaped into a single path segment.
    fn pair_url(&self, from: &str, to: &str) -> Result<Url, ClientError> {
        let invalid = || ClientError::Transport(format!("invalid base URL '{}'", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend([self.api_key.as_str(), "pair", from, to]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: String,
    conversion_rate: Option<f64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

impl PairResponse {
    fn into_rate(self) -> Result<f64, ClientError> {
        if self.result != "success" {
            return Err(ClientError::Remote {
                kind: self.error_type.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        match self.conversion_rate {
            Some(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
            Some(rate) => Err(ClientError::Parse(format!("unusable conversion_rate {rate}"))),
            None => Err(ClientError::Parse("success response without conversion_rate".into())),
        }
    }
}

#[async_trait]
impl RateProvider for CurrencyClient {
    #[instrument(skip(self))]
    async fn fetch_exchange_rate(&self, from: &str, to: &str) -> Result<f64, ClientError> {
        let url = self.pair_url(from, to).map_err(|e| e.scrubbed(&self.api_key))?;
        let req = self.http.get(url);

        let parsed: PairResponse = http::get_json(req)
            .await
            .map_err(|e| e.scrubbed(&self.api_key))?;

        parsed.into_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn supported_currencies_are_forty_unique_codes() {
        let client = CurrencyClient::new("KEY".into());
        let codes = client.get_supported_currencies();

        assert_eq!(codes.len(), 40);
        assert_eq!(codes.iter().collect::<HashSet<_>>().len(), codes.len());
        assert!(codes.iter().all(|c| c.len() == 3 && c.chars().all(|ch| ch.is_ascii_uppercase())));
        assert_eq!(codes[0], "USD");
        assert_eq!(codes, client.get_supported_currencies());
    }

    #[test]
    fn pair_url_embeds_key_and_codes() {
        let client = CurrencyClient::with_base_url("K".into(), "http://localhost:1/v6/".into());
        let url = client.pair_url("USD", "EUR").expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:1/v6/K/pair/USD/EUR");
    }

    #[test]
    fn pair_url_keeps_each_code_in_one_segment() {
        let client = CurrencyClient::with_base_url("K".into(), "http://localhost:1/v6".into());

        let url = client.pair_url("EUR?x", "USD").expect("valid url");
        assert_eq!(url.path(), "/v6/K/pair/EUR%3Fx/USD");
        assert_eq!(url.query(), None);

        let url = client.pair_url("EUR/..", "USD").expect("valid url");
        assert_eq!(url.path(), "/v6/K/pair/EUR%2F../USD");
        assert_eq!(url.path_segments().map(|s| s.count()), Some(5));
    }

    #[test]
    fn unparseable_base_url_is_an_error() {
        let client = CurrencyClient::with_base_url("K".into(), "not a url".into());
        assert!(matches!(client.pair_url("USD", "EUR"), Err(ClientError::Transport(_))));
    }

    #[test]
    fn success_response_yields_rate() {
        let parsed: PairResponse =
            serde_json::from_str(r#"{"result": "success", "conversion_rate": 0.9234}"#).expect("valid body");
        assert_eq!(parsed.into_rate().expect("rate"), 0.9234);
    }

    #[test]
    fn zero_or_negative_rate_is_rejected() {
        for body in [
            r#"{"result": "success", "conversion_rate": 0}"#,
            r#"{"result": "success", "conversion_rate": -1.5}"#,
        ] {
            let parsed: PairResponse = serde_json::from_str(body).expect("valid body");
            assert!(matches!(parsed.into_rate(), Err(ClientError::Parse(_))));
        }
    }

    #[test]
    fn error_response_carries_error_type() {
        let parsed: PairResponse =
            serde_json::from_str(r#"{"result": "error", "error-type": "unsupported-code"}"#).expect("valid body");
        let err = parsed.into_rate().unwrap_err();

        assert!(err.is_remote());
        assert!(err.to_string().contains("unsupported-code"));
    }

    #[test]
    fn error_response_without_type_is_unknown() {
        let parsed: PairResponse = serde_json::from_str(r#"{"result": "error"}"#).expect("valid body");
        assert!(parsed.into_rate().unwrap_err().to_string().contains("Unknown error"));
    }
}
