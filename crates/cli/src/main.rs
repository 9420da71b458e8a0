use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use order_tracker_core::models::currency::Currency;
use order_tracker_core::models::order::StatusFilter;
use order_tracker_core::OrderTracker;
use tracing_subscriber::EnvFilter;

mod calculator;
mod config;
mod error;
mod views;

use error::{AppError, Result};
use views::orders::NewOrderInput;
use views::settings::SettingsPatch;

#[derive(Parser, Debug)]
#[command(name = "order-tracker", version)]
#[command(about = "Учёт заказов: создание, список, статистика и доход")]
struct Cli {
    /// Config file path (TOML).
    #[arg(long, global = true, env = "ORDER_TRACKER_CONFIG")]
    config: Option<String>,

    /// Override the directory holding storage.json.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the log filter (e.g. `debug`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monthly figures, recent orders, income charts and calendar.
    Dashboard {
        /// Convert every order into the active currency before summing.
        #[arg(long)]
        convert: bool,
    },
    /// Create an order.
    New(NewArgs),
    /// List orders, newest first.
    List(ListArgs),
    /// Order details with the payment split.
    Show { id: String },
    /// Mark an order completed.
    Complete { id: String },
    /// Delete an order.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Company profile, service catalog, advance and currency.
    Settings(SettingsArgs),
    /// Evaluate an arithmetic expression.
    Calc {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        expr: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct NewArgs {
    #[arg(long)]
    client: String,
    #[arg(long)]
    phone: String,
    /// Catalog name or 1-based position from `settings show`.
    #[arg(long)]
    service: String,
    #[arg(long, allow_negative_numbers = true)]
    amount: f64,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum StatusArg {
    #[default]
    All,
    Pending,
    Completed,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Pending => StatusFilter::Pending,
            StatusArg::Completed => StatusFilter::Completed,
        }
    }
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    status: StatusArg,
    /// Match client name, service or phone.
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[command(subcommand)]
    command: Option<SettingsCommand>,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    Set(SetArgs),
    AddService { name: String },
    /// Remove by 1-based position.
    RemoveService { index: usize },
}

#[derive(Args, Debug)]
struct SetArgs {
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    company_phone: Option<String>,
    #[arg(long)]
    company_email: Option<String>,
    /// Advance payment percentage, 0 to 100.
    #[arg(long)]
    advance: Option<f64>,
    /// RUB, KZT or USD.
    #[arg(long, value_parser = parse_currency)]
    currency: Option<Currency>,
}

fn parse_currency(raw: &str) -> std::result::Result<Currency, String> {
    raw.parse::<Currency>().map_err(|e| e.to_string())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "order_tracker={level},order_tracker_core={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(config::Overrides {
        config: cli.config,
        data_dir: cli.data_dir,
        log_level: cli.log_level,
    })?;
    init_tracing(&settings.log_level);
    tracing::debug!(data_dir = %settings.data_dir.display(), "configuration loaded");

    let mut tracker = OrderTracker::open_file(settings.storage_path())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Command::Dashboard { convert: false }) {
        Command::Dashboard { convert } => {
            views::dashboard::render(&tracker, &Local::now(), convert, &mut out)?
        }
        Command::New(args) => views::orders::create(
            &mut tracker,
            NewOrderInput {
                client: args.client,
                phone: args.phone,
                service: args.service,
                amount: args.amount,
                notes: args.notes,
            },
            &mut out,
        )?,
        Command::List(args) => views::orders::list(
            &tracker,
            args.status.into(),
            args.search.as_deref().unwrap_or_default(),
            &mut out,
        )?,
        Command::Show { id } => views::orders::show(&tracker, &id, &mut out)?,
        Command::Complete { id } => views::orders::complete(&mut tracker, &id, &mut out)?,
        Command::Delete { id, yes } => {
            let stdin = io::stdin();
            views::orders::delete(&mut tracker, &id, yes, &mut stdin.lock(), &mut out)?;
        }
        Command::Settings(args) => match args.command.unwrap_or(SettingsCommand::Show) {
            SettingsCommand::Show => views::settings::show(&tracker, &mut out)?,
            SettingsCommand::Set(set) => views::settings::apply(
                &mut tracker,
                SettingsPatch {
                    company_name: set.company_name,
                    company_phone: set.company_phone,
                    company_email: set.company_email,
                    advance_payment: set.advance,
                    currency: set.currency,
                },
                &mut out,
            )?,
            SettingsCommand::AddService { name } => {
                views::settings::add_service(&mut tracker, &name, &mut out)?;
            }
            SettingsCommand::RemoveService { index } => {
                views::settings::remove_service(&mut tracker, index, &mut out)?;
            }
        },
        Command::Calc { expr } => {
            let value = calculator::evaluate(&expr.join(" "))?;
            writeln!(out, "{}", calculator::format_result(value))?;
        }
    }

    out.flush().map_err(AppError::from)
}
