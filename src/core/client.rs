//! Clients and the accounts they own.
use crate::core::currency::CurrencyCode;
use crate::core::error::LedgerError;
use crate::core::lenient;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Cards are issued for five years from the account's activation.
const CARD_VALIDITY: Months = Months::new(60);

// JSON has no encoding for NaN or infinity, so such amounts cannot be stored.
fn check_finite(field: &'static str, value: f64) -> Result<(), LedgerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount { field, value })
    }
}

fn card_expiration(activation_date: NaiveDate) -> NaiveDate {
    activation_date
        .checked_add_months(CARD_VALIDITY)
        .unwrap_or(activation_date)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitAccount {
    #[serde(deserialize_with = "lenient::amount")]
    pub balance: f64,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
    pub currency_type: CurrencyCode,
    #[serde(with = "lenient::date")]
    pub activation_date: NaiveDate,
    #[serde(with = "lenient::date")]
    pub card_expiration_date: NaiveDate,
}

impl DebitAccount {
    pub fn open(
        balance: f64,
        is_active: bool,
        currency_type: CurrencyCode,
        activation_date: NaiveDate,
    ) -> Self {
        DebitAccount {
            balance,
            is_active,
            currency_type,
            activation_date,
            card_expiration_date: card_expiration(activation_date),
        }
    }

    pub fn check_amounts(&self) -> Result<(), LedgerError> {
        check_finite("balance", self.balance)
    }
}

/// A credit line. `balance` is fixed at `personal_funds + limit` when the
/// account is opened and is not re-derived afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditAccount {
    #[serde(deserialize_with = "lenient::amount")]
    pub balance: f64,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
    pub currency_type: CurrencyCode,
    #[serde(with = "lenient::date")]
    pub activation_date: NaiveDate,
    #[serde(with = "lenient::date")]
    pub card_expiration_date: NaiveDate,
    #[serde(deserialize_with = "lenient::amount")]
    pub personal_funds: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub limit: f64,
}

impl CreditAccount {
    pub fn open(
        personal_funds: f64,
        limit: f64,
        is_active: bool,
        currency_type: CurrencyCode,
        activation_date: NaiveDate,
    ) -> Self {
        CreditAccount {
            balance: personal_funds + limit,
            is_active,
            currency_type,
            activation_date,
            card_expiration_date: card_expiration(activation_date),
            personal_funds,
            limit,
        }
    }

    /// Bank money on this account: the balance minus the client's own funds.
    pub fn exposure(&self) -> f64 {
        self.balance - self.personal_funds
    }

    pub fn check_amounts(&self) -> Result<(), LedgerError> {
        check_finite("personal funds", self.personal_funds)?;
        check_finite("limit", self.limit)?;
        check_finite("balance", self.balance)
    }
}

/// Identity fields captured when a client is registered.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDetails {
    pub last_name: String,
    pub first_name: String,
    pub patronymic: String,
    pub identification_number: u64,
    pub is_active_client: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub last_name: String,
    pub first_name: String,
    pub patronymic: String,
    #[serde(deserialize_with = "lenient::identification_number")]
    pub identification_number: u64,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active_client: bool,
    #[serde(default)]
    pub credit_accounts: Vec<CreditAccount>,
    #[serde(default)]
    pub debit_accounts: Vec<DebitAccount>,
    #[serde(with = "lenient::date")]
    pub registration_date: NaiveDate,
}

impl Client {
    pub fn register(details: ClientDetails, registration_date: NaiveDate) -> Self {
        Client {
            last_name: details.last_name,
            first_name: details.first_name,
            patronymic: details.patronymic,
            identification_number: details.identification_number,
            is_active_client: details.is_active_client,
            credit_accounts: Vec::new(),
            debit_accounts: Vec::new(),
            registration_date,
        }
    }

    /// Fails on the first account amount that could not be stored.
    pub fn check_amounts(&self) -> Result<(), LedgerError> {
        self.debit_accounts
            .iter()
            .try_for_each(DebitAccount::check_amounts)?;
        self.credit_accounts
            .iter()
            .try_for_each(CreditAccount::check_amounts)
    }

    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.patronymic]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Edit of an existing client. Fields left as `None` keep their value;
/// accounts and the registration date are never touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientUpdate {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub patronymic: Option<String>,
    pub identification_number: Option<u64>,
    pub is_active_client: Option<bool>,
}

impl ClientUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ClientUpdate::default()
    }

    pub fn apply_to(&self, client: &Client) -> Client {
        let mut updated = client.clone();
        if let Some(last_name) = &self.last_name {
            updated.last_name = last_name.clone();
        }
        if let Some(first_name) = &self.first_name {
            updated.first_name = first_name.clone();
        }
        if let Some(patronymic) = &self.patronymic {
            updated.patronymic = patronymic.clone();
        }
        if let Some(identification_number) = self.identification_number {
            updated.identification_number = identification_number;
        }
        if let Some(is_active_client) = self.is_active_client {
            updated.is_active_client = is_active_client;
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn details() -> ClientDetails {
        ClientDetails {
            last_name: "Shevchenko".to_string(),
            first_name: "Taras".to_string(),
            patronymic: "Hryhorovych".to_string(),
            identification_number: 1234567890,
            is_active_client: true,
        }
    }

    #[test]
    fn test_register_starts_without_accounts() {
        let client = Client::register(details(), date(2024, 5, 1));
        assert!(client.debit_accounts.is_empty());
        assert!(client.credit_accounts.is_empty());
        assert_eq!(client.registration_date, date(2024, 5, 1));
        assert_eq!(client.full_name(), "Shevchenko Taras Hryhorovych");
    }

    #[test]
    fn test_non_finite_amounts_are_caught() {
        let overflow = CreditAccount::open(1e308, 1e308, true, "USD".into(), date(2024, 5, 1));
        assert!(matches!(
            overflow.check_amounts(),
            Err(LedgerError::InvalidAmount { field: "balance", .. })
        ));

        let nan = DebitAccount::open(f64::NAN, true, "UAH".into(), date(2024, 5, 1));
        let mut client = Client::register(details(), date(2024, 5, 1));
        assert!(client.check_amounts().is_ok());
        client.debit_accounts.push(nan);
        assert!(matches!(
            client.check_amounts(),
            Err(LedgerError::InvalidAmount { field: "balance", .. })
        ));

        let limit = CreditAccount::open(0.0, f64::INFINITY, true, "UAH".into(), date(2024, 5, 1));
        assert!(matches!(
            limit.check_amounts(),
            Err(LedgerError::InvalidAmount { field: "limit", .. })
        ));
    }

    #[test]
    fn test_credit_balance_is_funds_plus_limit() {
        let account = CreditAccount::open(50.0, 200.0, true, "USD".into(), date(2024, 5, 1));
        assert_eq!(account.balance, 250.0);
        assert_eq!(account.exposure(), 200.0);
        assert_eq!(account.card_expiration_date, date(2029, 5, 1));
    }

    #[test]
    fn test_card_expiration_on_leap_day() {
        let account = DebitAccount::open(10.0, true, "UAH".into(), date(2024, 2, 29));
        assert_eq!(account.card_expiration_date, date(2029, 2, 28));
    }

    #[test]
    fn test_client_update_keeps_unset_fields() {
        let mut client = Client::register(details(), date(2024, 5, 1));
        client
            .debit_accounts
            .push(DebitAccount::open(1.0, true, "UAH".into(), date(2024, 5, 2)));

        let update = ClientUpdate {
            first_name: Some("Lesya".to_string()),
            is_active_client: Some(false),
            ..Default::default()
        };
        let updated = update.apply_to(&client);

        assert_eq!(updated.first_name, "Lesya");
        assert!(!updated.is_active_client);
        assert_eq!(updated.last_name, client.last_name);
        assert_eq!(updated.identification_number, client.identification_number);
        assert_eq!(updated.debit_accounts, client.debit_accounts);
        assert!(ClientUpdate::default().is_empty());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_reads_form_written_client() {
        // Shape written by the browser front-end: form values as strings,
        // locale dates, credit balance as a number.
        let json = r#"{
            "registrationDate": "14.02.2023",
            "creditAccounts": [{
                "balance": 250,
                "activationDate": "14.02.2023",
                "cardExpirationDate": "14.02.2028",
                "personalFunds": "50",
                "limit": "200",
                "isActive": "true",
                "currencyType": "USD"
            }],
            "debitAccounts": [{
                "activationDate": "14.02.2023",
                "cardExpirationDate": "14.02.2028",
                "balance": "100",
                "isActive": "false",
                "currencyType": "UAH"
            }],
            "lastName": "Kos",
            "firstName": "Olena",
            "patronymic": "Petrivna",
            "identificationNumber": "3012345678",
            "isActiveClient": "false"
        }"#;

        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.identification_number, 3012345678);
        assert!(!client.is_active_client);
        assert_eq!(client.registration_date, date(2023, 2, 14));
        assert_eq!(client.debit_accounts[0].balance, 100.0);
        assert!(!client.debit_accounts[0].is_active);
        assert_eq!(client.credit_accounts[0].personal_funds, 50.0);
        assert_eq!(client.credit_accounts[0].limit, 200.0);
        assert_eq!(client.credit_accounts[0].exposure(), 200.0);

        // Written back, every value is typed again.
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(value["identificationNumber"], 3012345678u64);
        assert_eq!(value["isActiveClient"], false);
        assert_eq!(value["debitAccounts"][0]["balance"], 100.0);
        assert_eq!(value["registrationDate"], "2023-02-14");
    }

    #[test]
    fn test_json_round_trip() {
        let mut client = Client::register(details(), date(2024, 5, 1));
        client
            .debit_accounts
            .push(DebitAccount::open(100.5, true, "EUR".into(), date(2024, 5, 2)));
        client.credit_accounts.push(CreditAccount::open(
            10.0,
            90.0,
            false,
            "USD".into(),
            date(2024, 5, 3),
        ));

        let json = serde_json::to_string(&client).unwrap();
        let restored: Client = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, client);
    }
}
