//! Currency codes, exchange rates and the rate source abstraction

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// An upper-cased currency code such as `UAH` or `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Self {
        CurrencyCode(code.trim().to_uppercase())
    }

    /// The home currency every rate in the table is quoted against.
    pub fn uah() -> Self {
        CurrencyCode("UAH".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        CurrencyCode::new(&code)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        CurrencyCode::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = CurrencyCode::new(s);
        if code.0.is_empty() || !code.0.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(anyhow::anyhow!("Invalid currency code: '{}'", s));
        }
        Ok(code)
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RateError {
    #[error("No exchange rate for {0}")]
    MissingRate(CurrencyCode),

    #[error("Exchange rate for {currency} is not a number: '{value}'")]
    InvalidRate { currency: CurrencyCode, value: String },

    #[error("Exchange rate for {0} is zero")]
    ZeroRate(CurrencyCode),

    #[error("Exchange rates are not available yet")]
    RatesUnavailable,
}

/// One row of the exchange rate table. Rates stay strings, the way the
/// rate source publishes them, and are parsed when used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub ccy: CurrencyCode,
    #[serde(rename = "base_ccy", alias = "baseCcy")]
    pub base_ccy: CurrencyCode,
    pub buy: String,
    pub sale: String,
}

impl CurrencyRate {
    /// The synthetic `UAH -> UAH` row that keeps the home currency
    /// convertible without a fetched rate.
    pub fn identity() -> Self {
        CurrencyRate {
            ccy: CurrencyCode::uah(),
            base_ccy: CurrencyCode::uah(),
            buy: "1.00".to_string(),
            sale: "1.00".to_string(),
        }
    }

    /// The sale rate as a number. Anything that is not a finite,
    /// non-negative number is `InvalidRate`; zero is left to the caller.
    pub fn sale_value(&self) -> Result<f64, RateError> {
        match self.sale.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(RateError::InvalidRate {
                currency: self.ccy.clone(),
                value: self.sale.clone(),
            }),
        }
    }
}

/// Snapshot of the rates, in the order the source returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: Vec<CurrencyRate>,
}

impl RateTable {
    pub fn new(rates: Vec<CurrencyRate>) -> Self {
        RateTable { rates }
    }

    pub fn with_identity_entry(mut self) -> Self {
        self.rates.push(CurrencyRate::identity());
        self
    }

    pub fn rates(&self) -> &[CurrencyRate] {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Row for `ccy`. When the table lists a currency twice the later row wins.
    pub fn find(&self, ccy: &CurrencyCode) -> Option<&CurrencyRate> {
        self.rates.iter().rev().find(|rate| &rate.ccy == ccy)
    }

    pub fn sale_rate(&self, ccy: &CurrencyCode) -> Result<f64, RateError> {
        self.find(ccy)
            .ok_or_else(|| RateError::MissingRate(ccy.clone()))?
            .sale_value()
    }
}

/// External source of exchange rates against UAH.
#[async_trait]
pub trait CurrencyRateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<Vec<CurrencyRate>>;
}
