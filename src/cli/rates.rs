use super::ui;
use crate::core::RateTable;
use crate::session::Session;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub fn rates_table(table: &RateTable) -> String {
    let mut output = ui::new_styled_table();
    output.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Base"),
        ui::header_cell("Buy"),
        ui::header_cell("Sale"),
    ]);

    for rate in table.rates() {
        output.add_row(vec![
            Cell::new(&rate.ccy),
            Cell::new(&rate.base_ccy),
            Cell::new(&rate.buy).set_alignment(CellAlignment::Right),
            Cell::new(&rate.sale).set_alignment(CellAlignment::Right),
        ]);
    }

    output.to_string()
}

pub async fn run(session: &mut Session) -> Result<()> {
    let pb = ui::new_spinner("Loading exchange rates...");
    let table = session.rates().await;
    pb.finish_and_clear();

    println!("{}", rates_table(&table?));
    Ok(())
}
