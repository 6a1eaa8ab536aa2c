//! Terminal front-end: one function per subcommand, rendering with comfy-table.

pub mod calc;
pub mod clients;
pub mod rates;
pub mod setup;
pub mod ui;
