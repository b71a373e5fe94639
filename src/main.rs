// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use general_ledger::{demo_transactions, display, FormKind, LedgerError, Period, Session};

#[derive(Debug, Parser)]
#[command(name = "general-ledger", version, about = "Double-entry general ledger and financial statements")]
struct Cli {
    /// Ledger CSV file (Date,Account,Debit,Credit,Description)
    #[arg(short, long, env = "LEDGER_FILE", default_value = "ledger.csv")]
    file: PathBuf,

    /// Log filter, e.g. `info` or `general_ledger=debug`
    #[arg(long, env = "LEDGER_LOG", default_value = "info")]
    log_level: String,

    /// Save even if rows skipped while loading would be dropped from the file
    #[arg(long, global = true)]
    force: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Append one entry and save the ledger
    Add {
        #[arg(long)]
        date: String,
        #[arg(long)]
        account: String,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        debit: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        credit: f64,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// General ledger listing
    Ledger,
    /// Net balance per account
    Balances,
    /// T-accounts, optionally a single one
    TAccounts {
        #[arg(long)]
        account: Option<String>,
    },
    /// Income Statement
    Income {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Balance Sheet
    BalanceSheet,
    /// Statement of Equity
    Equity {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Tax form projection (1120 or 1065)
    Tax { form: FormKind },
    /// Write the four statement sheets into one .xlsx workbook
    Export { file: PathBuf },
    /// Append the sample entries and save the ledger
    Demo,
    /// Interactive viewer
    #[cfg(feature = "tui")]
    Ui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .with_writer(std::io::stderr)
        .init();

    // Skipped rows are already logged by the loader
    let (mut session, _report) = Session::open(&cli.file)
        .with_context(|| format!("Failed to open ledger: {:?}", cli.file))?;

    match cli.command {
        Command::Add {
            date,
            account,
            debit,
            credit,
            description,
        } => {
            if let Err(e) = session.append(&date, &account, debit, credit, &description) {
                bail!("Invalid transaction: {}", e);
            }
            save(&mut session, &cli.file, cli.force)?;
            println!("✓ Added entry to {} ({} transactions)", account, session.all().len());
        }
        Command::Ledger => print!("{}", display::ledger_listing(session.all())),
        Command::Balances => print!("{}", display::balance_listing(&session.balances())),
        Command::TAccounts { account } => {
            let accounts = session.t_accounts();
            match account {
                Some(name) => match accounts.get(&name) {
                    Some(t) => print!("{}", display::t_account_block(&name, t)),
                    None => bail!("No entries for account {:?}", name),
                },
                None => print!("{}", display::t_accounts_listing(&accounts)),
            }
        }
        Command::Income { start, end } => {
            let stmt = session.income_statement(Period::new(start, end));
            print!("{}", display::income_statement(&stmt));
        }
        Command::BalanceSheet => print!("{}", display::balance_sheet(&session.balance_sheet())),
        Command::Equity { start, end } => {
            let stmt = session.statement_of_equity(Period::new(start, end));
            print!("{}", display::statement_of_equity(&stmt));
        }
        Command::Tax { form } => print!("{}", display::tax_form(&session.tax_form(form))),
        Command::Export { file } => {
            session
                .workbook()
                .write_xlsx(&file)
                .with_context(|| format!("Failed to export workbook to {:?}", file))?;
            println!("✓ {}", file.display());
        }
        Command::Demo => {
            let mut added = 0;
            for tx in demo_transactions() {
                session.append(tx.date(), tx.account(), tx.debit(), tx.credit(), tx.description())?;
                added += 1;
            }
            save(&mut session, &cli.file, cli.force)?;
            println!("✓ Added {} sample entries to {:?}", added, cli.file);
        }
        #[cfg(feature = "tui")]
        Command::Ui => {
            let mut app = ui::App::new(session);
            ui::run_ui(&mut app)?;
        }
    }

    Ok(())
}

fn save(session: &mut Session, file: &Path, force: bool) -> Result<()> {
    let saved = if force { session.force_save(file) } else { session.save(file) };
    match saved {
        Err(e @ LedgerError::LossyOverwrite { .. }) => {
            bail!("{}; fix those rows or pass --force to drop them", e)
        }
        other => other
            .map(|_| ())
            .with_context(|| format!("Failed to save ledger: {:?}", file)),
    }
}
