use super::ui;
use crate::core::{
    Client, ClientDetails, ClientUpdate, CreditAccount, CurrencyCode, DebitAccount,
};
use crate::session::Session;
use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use comfy_table::Cell;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// One row per client, in registration order.
pub fn clients_table(clients: &[Client]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Name"),
        ui::header_cell("ID number"),
        ui::header_cell("Status"),
        ui::header_cell("Registered"),
        ui::header_cell("Debit"),
        ui::header_cell("Credit"),
    ]);

    for (index, client) in clients.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(client.full_name()),
            Cell::new(client.identification_number),
            ui::flag_cell(client.is_active_client, "active", "passive"),
            Cell::new(client.registration_date),
            Cell::new(client.debit_accounts.len()),
            Cell::new(client.credit_accounts.len()),
        ]);
    }

    table.to_string()
}

/// Identity fields followed by every account the client holds.
pub fn client_details(client: &Client) -> String {
    let mut output = format!(
        "Client: {}\n",
        ui::style_text(&client.full_name(), ui::StyleType::Title)
    );
    output.push_str(&format!(
        "ID number: {}  Status: {}  Registered: {}\n",
        client.identification_number,
        if client.is_active_client {
            "active"
        } else {
            "passive"
        },
        client.registration_date
    ));

    if client.debit_accounts.is_empty() && client.credit_accounts.is_empty() {
        output.push_str(&ui::style_text("\nNo accounts", ui::StyleType::Subtle));
        return output;
    }

    if !client.debit_accounts.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Balance"),
            ui::header_cell("State"),
            ui::header_cell("Activated"),
            ui::header_cell("Card expires"),
        ]);
        for account in &client.debit_accounts {
            table.add_row(vec![
                Cell::new(&account.currency_type),
                ui::amount_cell(account.balance),
                ui::flag_cell(account.is_active, "active", "passive"),
                Cell::new(account.activation_date),
                Cell::new(account.card_expiration_date),
            ]);
        }
        output.push_str(&format!("\nDebit accounts\n{table}\n"));
    }

    if !client.credit_accounts.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Balance"),
            ui::header_cell("Own funds"),
            ui::header_cell("Limit"),
            ui::header_cell("State"),
            ui::header_cell("Activated"),
            ui::header_cell("Card expires"),
        ]);
        for account in &client.credit_accounts {
            table.add_row(vec![
                Cell::new(&account.currency_type),
                ui::amount_cell(account.balance),
                ui::amount_cell(account.personal_funds),
                ui::amount_cell(account.limit),
                ui::flag_cell(account.is_active, "active", "passive"),
                Cell::new(account.activation_date),
                Cell::new(account.card_expiration_date),
            ]);
        }
        output.push_str(&format!("\nCredit accounts\n{table}\n"));
    }

    output
}

pub fn list(session: &Session) -> Result<()> {
    if session.repository.is_empty() {
        println!("No clients yet.");
        return Ok(());
    }
    println!("{}", clients_table(session.repository.clients()));
    Ok(())
}

pub async fn add(session: &mut Session, details: ClientDetails) -> Result<()> {
    let client = Client::register(details, today());
    let name = client.full_name();
    session.repository.add(client).await?;
    println!("Client {name} registered.");
    Ok(())
}

pub async fn find(session: &mut Session, identification_number: u64) -> Result<()> {
    let selected = session
        .selection
        .select(&session.repository, identification_number)
        .await?;
    println!("{}", client_details(&selected.client));
    Ok(())
}

pub async fn edit(session: &mut Session, update: ClientUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to change, pass at least one field to edit");
    }

    let index = session.selection.resolve(&session.repository).await?;
    let current = session.repository.clients()[index].clone();
    let updated = update.apply_to(&current);
    let identification_number = updated.identification_number;
    session.repository.replace_at(index, updated).await?;

    // Keep the slot pointing at the edited client.
    let selected = session
        .selection
        .select(&session.repository, identification_number)
        .await?;
    println!("{}", client_details(&selected.client));
    Ok(())
}

pub async fn delete(session: &mut Session) -> Result<()> {
    let index = session.selection.resolve(&session.repository).await?;
    let removed = session.repository.remove_at(index).await?;
    session.selection.clear().await?;
    println!("Client {} was deleted.", removed.full_name());
    Ok(())
}

pub async fn open_debit(
    session: &mut Session,
    balance: f64,
    is_active: bool,
    currency: CurrencyCode,
) -> Result<()> {
    let index = session.selection.resolve(&session.repository).await?;
    let account = DebitAccount::open(balance, is_active, currency, today());
    session.repository.open_debit_account(index, account).await?;
    print_account_opened(session, index, "Debit");
    Ok(())
}

pub async fn open_credit(
    session: &mut Session,
    personal_funds: f64,
    limit: f64,
    is_active: bool,
    currency: CurrencyCode,
) -> Result<()> {
    let index = session.selection.resolve(&session.repository).await?;
    let account = CreditAccount::open(personal_funds, limit, is_active, currency, today());
    session.repository.open_credit_account(index, account).await?;
    print_account_opened(session, index, "Credit");
    Ok(())
}

fn print_account_opened(session: &Session, index: usize, kind: &str) {
    if let Some(client) = session.repository.get(index) {
        println!("{kind} account opened for {}.", client.full_name());
    }
}
