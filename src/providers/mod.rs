pub mod privatbank;

pub use privatbank::PrivatBankRateSource;
