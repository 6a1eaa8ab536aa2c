use super::ui;
use crate::core::{CurrencyCode, Operation, analytics};
use crate::session::Session;
use anyhow::Result;
use tracing::debug;

pub fn format_result(operation: Operation, currency: &CurrencyCode, value: f64) -> String {
    format!(
        "{} ({}): {}",
        operation,
        ui::style_text(currency.as_str(), ui::StyleType::TotalLabel),
        ui::style_text(&format!("{value:.2}"), ui::StyleType::TotalValue)
    )
}

pub async fn run(session: &mut Session, operation: Operation, currency: &CurrencyCode) -> Result<()> {
    let pb = ui::new_spinner("Loading exchange rates...");
    let rates = session.rates().await;
    pb.finish_and_clear();
    let rates = rates?;

    debug!("Using {} exchange rates", rates.len());
    match analytics::evaluate(operation, session.repository.clients(), &rates, currency) {
        Ok(value) => {
            println!("{}", format_result(operation, currency, value));
            Ok(())
        }
        Err(e) => {
            println!(
                "{}",
                ui::style_text(&format!("{operation} failed: {e}"), ui::StyleType::Error)
            );
            Err(e.into())
        }
    }
}
