use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::core::currency::{CurrencyCode, CurrencyRate, CurrencyRateSource};

const RATES_ENDPOINT: &str = "/p24api/pubinfo?exchange&json&coursid=11";

// PrivatBankRateSource implementation for CurrencyRateSource
pub struct PrivatBankRateSource {
    base_url: String,
}

impl PrivatBankRateSource {
    pub fn new(base_url: &str) -> Self {
        PrivatBankRateSource {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PrivatBankRate {
    ccy: String,
    base_ccy: String,
    buy: String,
    sale: String,
}

impl From<PrivatBankRate> for CurrencyRate {
    fn from(rate: PrivatBankRate) -> Self {
        CurrencyRate {
            ccy: CurrencyCode::new(&rate.ccy),
            base_ccy: CurrencyCode::new(&rate.base_ccy),
            buy: rate.buy,
            sale: rate.sale,
        }
    }
}

#[async_trait]
impl CurrencyRateSource for PrivatBankRateSource {
    #[instrument(name = "PrivatBankRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<Vec<CurrencyRate>> {
        let url = format!("{}{}", self.base_url, RATES_ENDPOINT);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("bankbook/1.0")
            .build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for exchange rates", response.status()));
        }

        let text = response.text().await?;

        let rates: Vec<PrivatBankRate> = match serde_json::from_str(&text) {
            Ok(rates) => rates,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse exchange rate response"
                );
                return Err(anyhow!("Failed to parse exchange rate response: {}", e));
            }
        };

        debug!("Received {} exchange rates", rates.len());
        Ok(rates.into_iter().map(CurrencyRate::from).collect())
    }
}
