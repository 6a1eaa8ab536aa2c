pub mod cli;
pub mod core;
pub mod providers;
pub mod session;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{ClientDetails, ClientUpdate, CurrencyCode, Operation};
use crate::providers::PrivatBankRateSource;
use crate::session::Session;
use crate::store::DiskStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    List,
    AddClient(ClientDetails),
    Find {
        identification_number: u64,
    },
    Edit(ClientUpdate),
    Delete,
    OpenDebit {
        balance: f64,
        is_active: bool,
        currency: CurrencyCode,
    },
    OpenCredit {
        personal_funds: f64,
        limit: f64,
        is_active: bool,
        currency: CurrencyCode,
    },
    Rates,
    Calc {
        operation: Operation,
        currency: Option<CurrencyCode>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("bankbook starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = DiskStore::open(&config.data_path()?)?;
    let source = PrivatBankRateSource::new(config.rates_base_url());
    let mut session = Session::start(Arc::new(store), Arc::new(source)).await?;

    let result = match command {
        AppCommand::List => cli::clients::list(&session),
        AppCommand::AddClient(details) => cli::clients::add(&mut session, details).await,
        AppCommand::Find {
            identification_number,
        } => cli::clients::find(&mut session, identification_number).await,
        AppCommand::Edit(update) => cli::clients::edit(&mut session, update).await,
        AppCommand::Delete => cli::clients::delete(&mut session).await,
        AppCommand::OpenDebit {
            balance,
            is_active,
            currency,
        } => cli::clients::open_debit(&mut session, balance, is_active, currency).await,
        AppCommand::OpenCredit {
            personal_funds,
            limit,
            is_active,
            currency,
        } => {
            cli::clients::open_credit(&mut session, personal_funds, limit, is_active, currency)
                .await
        }
        AppCommand::Rates => cli::rates::run(&mut session).await,
        AppCommand::Calc {
            operation,
            currency,
        } => {
            let currency = currency.unwrap_or_else(|| config.currency.clone());
            cli::calc::run(&mut session, operation, &currency).await
        }
    };

    session.finish().await;
    result
}
