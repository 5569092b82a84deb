//! rusty-ledger CLI - inspect transaction journals
//!
//! ## Example Usage
//!
//! ```bash
//! # Cash balance of a journal at a date
//! rusty-ledger balance trades.csv --date 2011-06-30
//!
//! # Net share positions
//! rusty-ledger positions trades.csv --date 2011-06-30
//!
//! # Profit of a closed holding
//! rusty-ledger profit --shares 5 --open 10 --close 20 --open-commission 2 --close-commission 3
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use rusty_ledger::config::LedgerConfig;
use rusty_ledger::finance::{
    CashLedger, HoldingFactory, Portfolio, ProfitCalculator, Transaction,
};
use rusty_ledger::journal::{parse_date, read_journal, read_journal_lenient};
use rusty_ledger::types::Timestamp;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

/// rusty-ledger: brokerage transaction ledger
#[derive(Parser)]
#[command(name = "rusty-ledger")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cash balances, positions and profit from transaction journals", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cash balance of a journal at a date
    Balance {
        /// Journal CSV file
        #[arg(value_name = "JOURNAL")]
        journal: PathBuf,

        /// Balance date (YYYY-MM-DD or RFC 3339); defaults to all transactions
        #[arg(short, long)]
        date: Option<String>,

        /// Skip invalid rows instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Net share positions of a journal at a date
    Positions {
        #[arg(value_name = "JOURNAL")]
        journal: PathBuf,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(long)]
        lenient: bool,
    },

    /// Gross and net profit of a closed holding
    Profit {
        #[arg(long)]
        shares: Decimal,

        #[arg(long)]
        open: Decimal,

        #[arg(long)]
        close: Decimal,

        #[arg(long, default_value = "0")]
        open_commission: Decimal,

        #[arg(long, default_value = "0")]
        close_commission: Decimal,
    },
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rusty-ledger").join("config.toml"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LedgerConfig> {
    match path {
        Some(p) => Ok(LedgerConfig::load(p)?),
        None => match default_config_path() {
            Some(p) => Ok(LedgerConfig::load(&p)?),
            None => Ok(LedgerConfig::default()),
        },
    }
}

fn resolve_date(date: Option<&str>) -> anyhow::Result<Timestamp> {
    match date {
        Some(d) => Ok(parse_date(d)?),
        None => Ok(Timestamp::MAX_UTC),
    }
}

fn load_transactions(
    config: &LedgerConfig,
    journal: &Path,
    lenient: bool,
) -> anyhow::Result<Vec<Transaction>> {
    let file = File::open(journal)
        .with_context(|| format!("Failed to open journal {}", journal.display()))?;
    let factory = config.factory();
    if lenient {
        Ok(read_journal_lenient(file, &factory))
    } else {
        Ok(read_journal(file, &factory)?)
    }
}

fn run_balance(
    config: &LedgerConfig,
    journal: &Path,
    date: Option<&str>,
    lenient: bool,
) -> anyhow::Result<()> {
    let date = resolve_date(date)?;
    let transactions = load_transactions(config, journal, lenient)?;

    if config.marginable {
        let mut portfolio = Portfolio::new(config.marginable_account()?);
        for t in transactions {
            portfolio.record(t);
        }
        print_balance(&portfolio, date);
        println!(
            "  {:<16} {}",
            "Maximum margin:",
            portfolio.cash_account().maximum_margin()
        );
    } else {
        let mut portfolio = Portfolio::new(config.cash_account());
        for t in transactions {
            portfolio.record(t);
        }
        print_balance(&portfolio, date);
    }
    Ok(())
}

fn print_balance<A: CashLedger>(portfolio: &Portfolio<A>, date: Timestamp) {
    println!("{}", "Cash".cyan().bold());
    println!(
        "  {:<16} {}",
        "Account balance:",
        portfolio.cash_account().cash_balance(date)
    );
    let net = portfolio.net_cash(date);
    let net = if net < Decimal::ZERO {
        net.to_string().red()
    } else {
        net.to_string().green()
    };
    println!("  {:<16} {}", "Net of trades:", net);
}

fn run_positions(
    config: &LedgerConfig,
    journal: &Path,
    date: Option<&str>,
    lenient: bool,
) -> anyhow::Result<()> {
    let date = resolve_date(date)?;
    let mut portfolio = Portfolio::new(config.cash_account());
    for t in load_transactions(config, journal, lenient)? {
        portfolio.record(t);
    }

    let positions = portfolio.positions(date);
    if positions.is_empty() {
        println!("{}", "No open positions".dimmed());
        return Ok(());
    }

    println!("{}", "Positions".cyan().bold());
    for (ticker, shares) in positions {
        println!("  {:<8} {:>12}", ticker.bold(), shares);
    }
    Ok(())
}

fn run_profit(
    shares: Decimal,
    open: Decimal,
    close: Decimal,
    open_commission: Decimal,
    close_commission: Decimal,
) -> anyhow::Result<()> {
    let holding =
        HoldingFactory::construct_holding(shares, open, close, open_commission, close_commission)?;

    println!("{}", "Profit".cyan().bold());
    println!("  {:<8} {}", "Gross:", ProfitCalculator::gross_profit(&holding));
    println!("  {:<8} {}", "Net:", ProfitCalculator::net_profit(&holding));
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    if cli.verbose {
        println!(
            "{} v{} (seed {})",
            "rusty-ledger".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            config.seed
        );
    }

    let result = match cli.command {
        Commands::Balance {
            journal,
            date,
            lenient,
        } => run_balance(&config, &journal, date.as_deref(), lenient),
        Commands::Positions {
            journal,
            date,
            lenient,
        } => run_positions(&config, &journal, date.as_deref(), lenient),
        Commands::Profit {
            shares,
            open,
            close,
            open_commission,
            close_commission,
        } => run_profit(shares, open, close, open_commission, close_commission),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
