mod render;
mod shell;

pub use render::*;
pub use shell::Shell;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{Ledger, LoadStatus, RecordFilter};
use crate::domain::{DATE_FORMAT, Record, ValidationError, parse_cents};
use crate::storage::CSV_HEADER;

/// Pennywise - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "pennywise")]
#[command(about = "Track personal income and expenses in a flat CSV file")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, env = "PENNYWISE_FILE", default_value = "transactions.csv")]
    pub file: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to the interactive shell
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu
    Shell,

    /// Record a new income or expense entry
    Add {
        /// Amount (e.g., "15.50" or "15")
        amount: String,

        /// Category (e.g., "food", "wages")
        #[arg(short, long)]
        category: String,

        /// Description of the entry
        #[arg(short, long)]
        description: String,

        /// Date of the entry (DD/MM/YYYY, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Entry type: income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,
    },

    /// List entries, newest first
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Filter from date (DD/MM/YYYY, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (DD/MM/YYYY, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Filter by type: income or expense
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show ledger-wide totals
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show totals per category
    Categories {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    /// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
    pub fn init_logging(&self) {
        let level = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("pennywise={level}")));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    pub fn run(self) -> Result<()> {
        let mut ledger = Ledger::open(&self.file);

        match self.command.unwrap_or(Commands::Shell) {
            Commands::Shell => {
                let stdin = io::stdin();
                Shell::new(&mut ledger, stdin.lock(), io::stdout()).run()?;
            }

            Commands::Add {
                amount,
                category,
                description,
                date,
                transaction_type,
            } => {
                fail_on_unreadable_store(&ledger)?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '15.50' or '15'")?;
                if amount_cents <= 0 {
                    return Err(ValidationError::InvalidAmount(
                        "amount must be greater than 0".to_string(),
                    )
                    .into());
                }
                for (field, value) in [("Category", &category), ("Description", &description)] {
                    if value.trim().is_empty() {
                        return Err(ValidationError::Required(field.to_string()).into());
                    }
                }

                let date =
                    date.unwrap_or_else(|| Local::now().date_naive().format(DATE_FORMAT).to_string());
                let record = Record::create(
                    &date,
                    &category,
                    &description,
                    amount_cents,
                    &transaction_type,
                )?;
                let shown = record.to_string();
                ledger.add(record)?;
                println!("Recorded: {}", shown);
            }

            Commands::List {
                category,
                from,
                to,
                transaction_type,
                format,
            } => {
                let filter = RecordFilter {
                    category,
                    from_date: from,
                    to_date: to,
                    transaction_type,
                };
                run_list_command(&ledger, &filter, &format)?;
            }

            Commands::Summary { format } => {
                let summary = ledger.summary();
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                    "table" => write_summary(&mut io::stdout().lock(), &summary)?,
                    other => anyhow::bail!("Invalid format '{}'. Valid: table, json", other),
                }
            }

            Commands::Categories { format } => {
                let summaries = ledger.category_summary();
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&summaries)?),
                    "table" => write_category_summary(&mut io::stdout().lock(), &summaries)?,
                    other => anyhow::bail!("Invalid format '{}'. Valid: table, json", other),
                }
            }
        }

        Ok(())
    }
}

/// Writing over a file we could not read would throw its contents away.
fn fail_on_unreadable_store(ledger: &Ledger) -> Result<()> {
    if let LoadStatus::Failed(reason) = &ledger.load_report().status {
        anyhow::bail!("Refusing to write: {}", reason);
    }
    Ok(())
}

fn run_list_command(ledger: &Ledger, filter: &RecordFilter, format: &str) -> Result<()> {
    let records = ledger.list_filtered(filter)?;
    let sorted = sorted_newest_first(&records);

    match format {
        "json" => {
            let views: Vec<_> = sorted.iter().map(|r| r.to_view()).collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        "csv" => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(io::stdout().lock());
            writer.write_record(CSV_HEADER)?;
            for record in sorted {
                writer.serialize(record.to_row())?;
            }
            writer.flush()?;
        }
        "table" => {
            let mut out = io::stdout().lock();
            write_records(&mut out, "Transactions", &records)?;
            out.flush()?;
        }
        other => anyhow::bail!("Invalid format '{}'. Valid: table, json, csv", other),
    }

    Ok(())
}
