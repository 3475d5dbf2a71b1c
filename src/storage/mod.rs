//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - expenses(id, date, amount, category, subcategory, note)
//!
//! Every operation opens its own connection; WAL mode lets readers run
//! alongside the single active writer.

pub mod schema;
pub mod sqlite;

pub use sqlite::{ExpenseStore, StoreStats};
