//! SQLite storage implementation

use std::path::{Path, PathBuf};
use std::time::Duration;
use rusqlite::{Connection, params};
use crate::Result;
use crate::config::ensure_parent_dir;
use crate::expense::{CategorySummary, DateRange, Expense, NewExpense};
use super::schema;

/// How long a connection waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage for expense records
///
/// Holds only the database path. Each call opens a fresh connection and
/// drops it before returning, so the store is cheap to clone and share
/// across tasks.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    path: PathBuf,
}

impl ExpenseStore {
    /// Create a store handle for a database file (nothing is opened yet)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the schema if absent and switch to WAL mode.
    ///
    /// Safe to call any number of times, from any number of processes.
    pub fn initialize(&self) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let conn = self.connect()?;

        let mode: String = conn.query_row(schema::ENABLE_WAL, [], |row| row.get(0))?;
        if !mode.eq_ignore_ascii_case("wal") {
            tracing::warn!("Journal mode is {} (WAL unavailable for {})", mode, self.path.display());
        }

        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }

        tracing::info!("Database initialized at {}", self.path.display());
        Ok(())
    }

    /// Open a connection for a single operation
    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    // ========== Expense Operations ==========

    /// Insert an expense and return its newly assigned id
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO expenses (date, amount, category, subcategory, note)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                expense.date,
                expense.amount,
                expense.category,
                expense.subcategory,
                expense.note,
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, date = %expense.date, category = %expense.category, "expense inserted");
        Ok(id)
    }

    /// Expenses whose date lies in the inclusive range, newest first.
    /// Same-day rows are ordered by descending id.
    pub fn find_expenses_in_range(&self, range: &DateRange) -> Result<Vec<Expense>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, amount, category, subcategory, note
             FROM expenses
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date DESC, id DESC"
        )?;

        let expenses = stmt
            .query_map(params![range.start_date, range.end_date], Self::row_to_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(expenses)
    }

    /// Per-category totals over the range, largest total first
    pub fn summarize_by_category(&self, range: &DateRange, category: Option<&str>) -> Result<Vec<CategorySummary>> {
        let sql = if category.is_some() {
            "SELECT category, SUM(amount) AS total_amount, COUNT(*) AS count
             FROM expenses
             WHERE date BETWEEN ?1 AND ?2 AND category = ?3
             GROUP BY category
             ORDER BY total_amount DESC, category ASC"
        } else {
            "SELECT category, SUM(amount) AS total_amount, COUNT(*) AS count
             FROM expenses
             WHERE date BETWEEN ?1 AND ?2
             GROUP BY category
             ORDER BY total_amount DESC, category ASC"
        };

        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;

        let summaries = if let Some(c) = category {
            stmt.query_map(params![range.start_date, range.end_date, c], Self::row_to_summary)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            stmt.query_map(params![range.start_date, range.end_date], Self::row_to_summary)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok(summaries)
    }

    /// Row count and the lexical date span of the table
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.connect()?;
        let stats = conn.query_row(
            "SELECT COUNT(*), MIN(date), MAX(date) FROM expenses",
            [],
            |row| {
                let count: i64 = row.get(0)?;
                Ok(StoreStats {
                    expenses: count as usize,
                    earliest: row.get(1)?,
                    latest: row.get(2)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Helper to convert a row to an Expense
    fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        // Rows written by other tools may carry NULLs in the defaulted columns
        let subcategory: Option<String> = row.get(4)?;
        let note: Option<String> = row.get(5)?;

        Ok(Expense {
            id: row.get(0)?,
            date: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            subcategory: subcategory.unwrap_or_default(),
            note: note.unwrap_or_default(),
        })
    }

    /// Helper to convert a row to a CategorySummary
    fn row_to_summary(row: &rusqlite::Row) -> rusqlite::Result<CategorySummary> {
        Ok(CategorySummary {
            category: row.get(0)?,
            total_amount: row.get(1)?,
            count: row.get(2)?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StoreStats {
    pub expenses: usize,
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Expenses: {}", self.expenses)?;
        writeln!(f, "  Earliest: {}", self.earliest.as_deref().unwrap_or("-"))?;
        write!(f, "  Latest: {}", self.latest.as_deref().unwrap_or("-"))
    }
}
