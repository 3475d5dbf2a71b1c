//! # Expense Tracker
//!
//! A small expense ledger backed by a single SQLite table.
//!
//! Expense Tracker provides:
//! - Idempotent store initialization in write-ahead-log mode
//! - Insert, date-range listing and per-category summaries
//! - An advisory categories resource with a built-in fallback list
//! - CLI, MCP (stdio) and HTTP surfaces over the same operations

pub mod config;
pub mod expense;
pub mod storage;
pub mod service;
pub mod categories;
pub mod server;
pub mod ui;

// Re-exports for convenient access
pub use config::TrackerConfig;
pub use expense::{Expense, NewExpense, CategorySummary, DateRange};
pub use storage::ExpenseStore;
pub use service::{ExpenseService, Payload};
pub use categories::CategoriesResource;

/// Result type alias for Expense Tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Expense Tracker operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),
}
