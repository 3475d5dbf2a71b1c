//! Expense Tracker CLI - record, list and summarize expenses

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use expense_tracker::config::{default_config_path, load_config};
use expense_tracker::expense::{DateRange, NewExpense};
use expense_tracker::server::{self, mcp::McpService, AppState};
use expense_tracker::ui::{self, Icons};
use expense_tracker::{CategoriesResource, ExpenseService, ExpenseStore, TrackerConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "expense-tracker")]
#[command(version)]
#[command(about = "Expense tracker - SQLite-backed ledger with CLI, MCP and HTTP surfaces")]
#[command(long_about = r#"
Expense Tracker keeps a single table of expenses and offers:
  • Adding expenses with optional subcategory and note
  • Listing expenses in an inclusive date range (newest first)
  • Per-category totals over a date range
  • An advisory categories list (categories.json or built-in defaults)

Example usage:
  expense-tracker add 2024-01-05 12.5 food --note lunch
  expense-tracker list 2024-01-01 2024-01-31
  expense-tracker summarize 2024-01-01 2024-01-31 --category food
  expense-tracker serve --port 8000
  expense-tracker mcp
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON payloads instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (default: expense-tracker.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides config)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Path to the categories file (overrides config)
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database if needed and show its statistics
    Init {
        /// Also write the resolved settings to the config file
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Add an expense
    Add {
        /// Date, ideally zero-padded YYYY-MM-DD
        date: String,

        /// Amount (negative for refunds)
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Category name
        category: String,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// List expenses in an inclusive date range
    List {
        start_date: String,
        end_date: String,
    },

    /// Total expenses per category in an inclusive date range
    Summarize {
        start_date: String,
        end_date: String,

        /// Only summarize this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the known category names
    Categories,

    /// Serve the HTTP JSON API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Serve the MCP protocol over stdio
    Mcp,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output and the MCP transport
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(Some(&config_path))?
        .unwrap_or_default()
        .with_overrides(cli.database.as_deref(), cli.categories.as_deref());

    let categories = CategoriesResource::new(config.categories_path());

    match cli.command {
        Commands::Categories => {
            commands::run_categories(&categories, cli.json)?;
        }

        Commands::Init { write_config, force } => {
            let store = open_store(&config)?;
            commands::run_init(&store, &config, &config_path, write_config, force, cli.json)?;
        }

        Commands::Add { date, amount, category, subcategory, note } => {
            let service = ExpenseService::new(open_store(&config)?);
            let expense = NewExpense::new(date, amount, category)
                .with_subcategory(subcategory.unwrap_or_default())
                .with_note(note.unwrap_or_default());
            commands::run_add(&service, expense, cli.json)?;
        }

        Commands::List { start_date, end_date } => {
            let service = ExpenseService::new(open_store(&config)?);
            commands::run_list(&service, DateRange::new(start_date, end_date), cli.json)?;
        }

        Commands::Summarize { start_date, end_date, category } => {
            let service = ExpenseService::new(open_store(&config)?);
            commands::run_summarize(&service, DateRange::new(start_date, end_date), category, cli.json)?;
        }

        Commands::Serve { host, port } => {
            let service = ExpenseService::new(open_store(&config)?);
            println!("{} Server running at http://{}:{}", Icons::GLOBE, host, port);
            server::start_server(&host, port, AppState { service, categories }).await?;
        }

        Commands::Mcp => {
            let service = ExpenseService::new(open_store(&config)?);
            McpService::new(service, categories).run_stdio().await?;
        }
    }

    Ok(())
}

/// Initialize the store; any failure here is fatal for the process
fn open_store(config: &TrackerConfig) -> anyhow::Result<ExpenseStore> {
    let store = ExpenseStore::new(config.database_path());
    tracing::info!("Database path: {}", store.path().display());
    if let Err(e) = store.initialize() {
        tracing::error!("Database init failed: {}", e);
        ui::error(&format!("Could not initialize {}: {}", store.path().display(), e));
        return Err(e.into());
    }
    Ok(store)
}
