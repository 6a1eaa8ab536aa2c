//! Aggregate money calculations over the whole client book.
//!
//! Every calculation has the same two stages: group amounts into one
//! bucket per currency, then convert each bucket to UAH with the table's
//! sale rate and divide the total by the target currency's sale rate.
//! All of it is plain `f64` arithmetic with no rounding.
use crate::core::client::Client;
use crate::core::currency::{CurrencyCode, RateError, RateTable};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::{debug, warn};

/// Per-currency running sums.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoneyBuckets {
    buckets: BTreeMap<CurrencyCode, f64>,
}

impl MoneyBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure a bucket for `currency` exists, starting at zero.
    pub fn touch(&mut self, currency: &CurrencyCode) -> &mut f64 {
        self.buckets.entry(currency.clone()).or_insert(0.0)
    }

    pub fn add(&mut self, currency: &CurrencyCode, amount: f64) {
        *self.touch(currency) += amount;
    }

    pub fn merge(&mut self, other: &MoneyBuckets) {
        for (currency, amount) in other.iter() {
            self.add(currency, amount);
        }
    }

    pub fn get(&self, currency: &CurrencyCode) -> Option<f64> {
        self.buckets.get(currency).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, f64)> {
        self.buckets.iter().map(|(currency, amount)| (currency, *amount))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// The calculations an operator can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// All money held in the bank, debit and credit balances alike.
    TotalFunds,
    /// Money the bank has lent out across every credit account.
    CreditExposure,
    /// Money lent out to active (or to inactive) clients only.
    CreditExposureByActivity { is_active_client: bool },
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::TotalFunds => write!(f, "Total funds"),
            Operation::CreditExposure => write!(f, "Total credit exposure"),
            Operation::CreditExposureByActivity {
                is_active_client: true,
            } => write!(f, "Credit exposure of active clients"),
            Operation::CreditExposureByActivity {
                is_active_client: false,
            } => write!(f, "Credit exposure of passive clients"),
        }
    }
}

/// Groups every debit and credit balance by currency. Both kinds of
/// account share one bucket per currency.
pub fn group_funds(clients: &[Client]) -> MoneyBuckets {
    let mut buckets = MoneyBuckets::new();
    for client in clients {
        for account in &client.debit_accounts {
            buckets.add(&account.currency_type, account.balance);
        }
        for account in &client.credit_accounts {
            buckets.add(&account.currency_type, account.balance);
        }
    }
    buckets
}

/// Groups the bank's money on credit accounts by currency. With
/// `activity` set, only accounts of clients whose activity flag matches
/// contribute; the others still open their currency's bucket at zero.
pub fn group_credit_exposure(clients: &[Client], activity: Option<bool>) -> MoneyBuckets {
    let mut buckets = MoneyBuckets::new();
    for client in clients {
        let counts = activity.is_none_or(|wanted| client.is_active_client == wanted);
        for account in &client.credit_accounts {
            let bucket = buckets.touch(&account.currency_type);
            if counts {
                *bucket += account.exposure();
            }
        }
    }
    buckets
}

/// Converts grouped money into `target`.
///
/// Buckets whose currency is absent from the table are left out of the
/// total. The target itself must have a usable, non-zero sale rate.
pub fn convert(
    buckets: &MoneyBuckets,
    rates: &RateTable,
    target: &CurrencyCode,
) -> Result<f64, RateError> {
    let target_rate = rates.sale_rate(target)?;
    if target_rate == 0.0 {
        return Err(RateError::ZeroRate(target.clone()));
    }

    let mut total_uah = 0.0;
    for (currency, amount) in buckets.iter() {
        match rates.find(currency) {
            Some(rate) => {
                let sale = rate.sale_value()?;
                debug!("Converting {amount} {currency} to UAH at {sale}");
                total_uah += amount * sale;
            }
            None => {
                warn!(
                    %currency,
                    amount,
                    "No exchange rate, leaving bucket out of the total"
                );
            }
        }
    }

    Ok(total_uah / target_rate)
}

pub fn total_funds(
    clients: &[Client],
    rates: &RateTable,
    target: &CurrencyCode,
) -> Result<f64, RateError> {
    convert(&group_funds(clients), rates, target)
}

pub fn total_credit_exposure(
    clients: &[Client],
    rates: &RateTable,
    target: &CurrencyCode,
) -> Result<f64, RateError> {
    convert(&group_credit_exposure(clients, None), rates, target)
}

pub fn total_credit_exposure_by_activity(
    clients: &[Client],
    rates: &RateTable,
    target: &CurrencyCode,
    is_active_client: bool,
) -> Result<f64, RateError> {
    convert(
        &group_credit_exposure(clients, Some(is_active_client)),
        rates,
        target,
    )
}

pub fn evaluate(
    operation: Operation,
    clients: &[Client],
    rates: &RateTable,
    target: &CurrencyCode,
) -> Result<f64, RateError> {
    debug!("Evaluating '{operation}' in {target} over {} clients", clients.len());
    match operation {
        Operation::TotalFunds => total_funds(clients, rates, target),
        Operation::CreditExposure => total_credit_exposure(clients, rates, target),
        Operation::CreditExposureByActivity { is_active_client } => {
            total_credit_exposure_by_activity(clients, rates, target, is_active_client)
        }
    }
}
