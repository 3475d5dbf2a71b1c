//! Database schema definitions

/// SQL to switch the database into write-ahead-log mode.
/// Returns the resulting journal mode as a single row.
pub const ENABLE_WAL: &str = "PRAGMA journal_mode=WAL";

/// SQL to create the expenses table
pub const CREATE_EXPENSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT NOT NULL,
    subcategory TEXT DEFAULT '',
    note TEXT DEFAULT ''
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_EXPENSES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
