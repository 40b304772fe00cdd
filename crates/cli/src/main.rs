use std::{error::Error, path::PathBuf};

use api_types::transaction::{NewTransaction, TransactionFilters, TransactionKind};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use client::{
    ApiClient, ImportPolicy, Importer, Session, SheetSchema, TEMPLATE_FILE_NAME,
    TransactionStore, summarize,
};

mod config;

#[derive(Parser, Debug)]
#[command(name = "kopilka")]
#[command(about = "Spreadsheet import and sync front-end for the finance tracker")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Bearer token for the remote store.
    #[arg(long, env = "KOPILKA_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the example import workbook.
    Template {
        /// Output path; defaults to the canonical template file name.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Parse a spreadsheet and push every row to the store.
    Import {
        file: PathBuf,
        /// Use the all-or-nothing bulk endpoint instead of row-by-row
        /// submission.
        #[arg(long)]
        atomic: bool,
    },
    /// Load transactions matching the filters and print them.
    List {
        #[arg(long)]
        kind: Option<KindArg>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Income/expense totals over the full collection.
    Summary,
    /// Add a single transaction.
    Add {
        kind: KindArg,
        /// Amount in major units, e.g. 1250.50.
        amount: String,
        category: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete one or more transactions by id.
    Delete { ids: Vec<i64> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(token) = cli.token {
        settings.token = token;
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kopilka={level},client={level}",
            level = settings.level
        ))
        .init();

    let session = Session::new(settings.base_url).with_token(settings.token);
    let store = TransactionStore::new(ApiClient::new(&session));
    let schema = SheetSchema::default();

    match cli.command {
        Command::Template { out } => {
            let path = out.unwrap_or_else(|| PathBuf::from(TEMPLATE_FILE_NAME));
            std::fs::write(&path, schema.template_workbook()?)?;
            println!("wrote template: {}", path.display());
        }
        Command::Import { file, atomic } => {
            let policy = if atomic {
                ImportPolicy::Atomic
            } else {
                ImportPolicy::Sequential
            };
            let importer = Importer::new(&store, schema);
            let report = importer.import_file(&file, policy).await?;
            for warning in &report.warnings {
                tracing::warn!("normalized row: {warning:?}");
            }
            println!(
                "imported: {} succeeded, {} failed ({} rows normalized)",
                report.succeeded,
                report.failed,
                report.warnings.len()
            );
        }
        Command::List {
            kind,
            category,
            from,
            to,
        } => {
            let filters = TransactionFilters {
                kind: kind.map(TransactionKind::from),
                category,
                start_date: from.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|d| d.and_utc()),
                end_date: to.and_then(|d| d.and_hms_opt(23, 59, 59)).map(|d| d.and_utc()),
            };
            let transactions = store.load(&filters).await?;
            for tx in &transactions {
                println!(
                    "{:>6}  {}  {:<7}  {:>12}  {}{}",
                    tx.id,
                    tx.date.format("%Y-%m-%d"),
                    tx.kind.as_str(),
                    format_minor(tx.amount_minor),
                    tx.category,
                    tx.subcategory
                        .as_deref()
                        .map(|s| format!(" / {s}"))
                        .unwrap_or_default(),
                );
            }
            println!("{} transactions", transactions.len());
        }
        Command::Summary => {
            let transactions = store.load(&TransactionFilters::default()).await?;
            let summary = summarize(&transactions);
            println!("income:   {:>14}", format_minor(summary.total_income_minor));
            println!("expenses: {:>14}", format_minor(summary.total_expenses_minor));
            println!("balance:  {:>14}", format_minor(summary.balance_minor));
            println!("count:    {:>14}", summary.count);
        }
        Command::Add {
            kind,
            amount,
            category,
            date,
            subcategory,
            description,
        } => {
            let amount_minor = parse_major(&amount).ok_or("invalid amount")?;
            let date = date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc())
                .unwrap_or_else(Utc::now);
            let created = store
                .create(NewTransaction {
                    kind: kind.into(),
                    amount_minor,
                    date,
                    category,
                    subcategory,
                    description,
                })
                .await?;
            println!("created transaction {}", created.id);
        }
        Command::Delete { ids } => {
            match ids.as_slice() {
                [] => return Err("no ids given".into()),
                [id] => store.delete(*id).await?,
                many => store.delete_bulk(many).await?,
            }
            println!("deleted {} transaction(s)", ids.len());
        }
    }

    Ok(())
}

/// Formats minor units as a major-unit decimal string.
fn format_minor(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parses a major-unit decimal (`.` or `,` separator, at most 2 decimals)
/// into non-negative minor units.
fn parse_major(raw: &str) -> Option<i64> {
    let normalized = raw.trim().replace(',', ".");
    let (whole, frac) = match normalized.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (normalized.as_str(), ""),
    };
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    if whole < 0 {
        return None;
    }
    let frac: i64 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<2}").parse().ok()?
    };
    whole.checked_mul(100)?.checked_add(frac)
}
