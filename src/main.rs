use anyhow::Result;
use bankbook::core::log::init_logging;
use bankbook::core::{ClientDetails, ClientUpdate, CurrencyCode, Operation};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Activity {
    Active,
    Passive,
}

impl From<Activity> for bool {
    fn from(activity: Activity) -> bool {
        matches!(activity, Activity::Active)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CalcKind {
    /// Every debit and credit balance
    TotalFunds,
    /// Money lent out on credit accounts
    CreditExposure,
    /// Money lent out to clients of one activity status
    CreditByActivity,
}

#[derive(Args)]
struct AddClientArgs {
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    first_name: String,
    #[arg(long, default_value = "")]
    patronymic: String,
    #[arg(long)]
    id: u64,
    #[arg(long, value_enum, default_value = "active")]
    status: Activity,
}

#[derive(Args)]
struct EditArgs {
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    patronymic: Option<String>,
    #[arg(long)]
    id: Option<u64>,
    #[arg(long, value_enum)]
    status: Option<Activity>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List every client
    List,
    /// Register a new client
    AddClient(AddClientArgs),
    /// Look a client up by identification number and select it
    Find {
        /// Identification number
        id: u64,
    },
    /// Edit the selected client
    Edit(EditArgs),
    /// Delete the selected client
    Delete,
    /// Open a debit account for the selected client
    OpenDebit {
        #[arg(long)]
        balance: f64,
        #[arg(long)]
        currency: CurrencyCode,
        #[arg(long, value_enum, default_value = "active")]
        status: Activity,
    },
    /// Open a credit account for the selected client
    OpenCredit {
        /// Client's own money on the account
        #[arg(long)]
        personal_funds: f64,
        /// Credit limit granted by the bank
        #[arg(long)]
        limit: f64,
        #[arg(long)]
        currency: CurrencyCode,
        #[arg(long, value_enum, default_value = "active")]
        status: Activity,
    },
    /// Show the cached exchange rates
    Rates,
    /// Run a calculation over the whole client book
    Calc {
        #[arg(value_enum)]
        kind: CalcKind,
        /// Currency for the result; defaults to the configured one
        #[arg(long)]
        currency: Option<CurrencyCode>,
        /// Client status, used by credit-by-activity
        #[arg(long, value_enum, default_value = "active")]
        status: Activity,
    },
}

impl From<Commands> for bankbook::AppCommand {
    fn from(cmd: Commands) -> bankbook::AppCommand {
        match cmd {
            Commands::List => bankbook::AppCommand::List,
            Commands::AddClient(args) => bankbook::AppCommand::AddClient(ClientDetails {
                last_name: args.last_name,
                first_name: args.first_name,
                patronymic: args.patronymic,
                identification_number: args.id,
                is_active_client: args.status.into(),
            }),
            Commands::Find { id } => bankbook::AppCommand::Find {
                identification_number: id,
            },
            Commands::Edit(args) => bankbook::AppCommand::Edit(ClientUpdate {
                last_name: args.last_name,
                first_name: args.first_name,
                patronymic: args.patronymic,
                identification_number: args.id,
                is_active_client: args.status.map(Into::into),
            }),
            Commands::Delete => bankbook::AppCommand::Delete,
            Commands::OpenDebit {
                balance,
                currency,
                status,
            } => bankbook::AppCommand::OpenDebit {
                balance,
                is_active: status.into(),
                currency,
            },
            Commands::OpenCredit {
                personal_funds,
                limit,
                currency,
                status,
            } => bankbook::AppCommand::OpenCredit {
                personal_funds,
                limit,
                is_active: status.into(),
                currency,
            },
            Commands::Rates => bankbook::AppCommand::Rates,
            Commands::Calc {
                kind,
                currency,
                status,
            } => bankbook::AppCommand::Calc {
                operation: match kind {
                    CalcKind::TotalFunds => Operation::TotalFunds,
                    CalcKind::CreditExposure => Operation::CreditExposure,
                    CalcKind::CreditByActivity => Operation::CreditExposureByActivity {
                        is_active_client: status.into(),
                    },
                },
                currency,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => bankbook::cli::setup::setup(),
        Some(cmd) => bankbook::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
