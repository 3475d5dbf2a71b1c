//! Expense operations and their wire payloads
//!
//! The three operations (add, list, summarize) return plain `Result`s.
//! Surfaces turn those results into a [`Payload`], which serializes either
//! to the success body or to `{"status": "error", "message": ...}`.

use serde::{Deserialize, Serialize};
use crate::Result;
use crate::expense::{CategorySummary, DateRange, Expense, NewExpense};
use crate::storage::ExpenseStore;

/// Status marker carried by add/error payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Body returned after a successful insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedExpense {
    pub status: Status,
    pub id: i64,
    pub message: String,
}

impl AddedExpense {
    fn new(id: i64) -> Self {
        Self {
            status: Status::Success,
            id,
            message: "Expense added successfully".to_string(),
        }
    }
}

/// Body returned in place of a result when an operation fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub status: Status,
    pub message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }
}

/// Outcome of an operation as seen by a caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Success(T),
    Error(ErrorPayload),
}

impl<T> Payload<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, Payload::Error(_))
    }
}

impl<T: Serialize> Payload<T> {
    pub fn into_value(self) -> serde_json::Value {
        serde_json::to_value(&self).unwrap_or_else(|e| {
            serde_json::json!({ "status": "error", "message": e.to_string() })
        })
    }
}

impl<T> From<Result<T>> for Payload<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Payload::Success(value),
            Err(e) => Payload::Error(ErrorPayload::new(e.to_string())),
        }
    }
}

/// Arguments for `summarize`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl SummarizeRequest {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date.clone(), self.end_date.clone())
    }
}

/// Stateless request handlers over an [`ExpenseStore`]
#[derive(Debug, Clone)]
pub struct ExpenseService {
    store: ExpenseStore,
}

impl ExpenseService {
    pub fn new(store: ExpenseStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    /// Insert one expense; no validation beyond the input types
    pub fn add_expense(&self, expense: &NewExpense) -> Result<AddedExpense> {
        self.store
            .insert_expense(expense)
            .map(AddedExpense::new)
            .inspect_err(|e| tracing::error!("add_expense failed: {}", e))
    }

    /// Expenses in the inclusive range, newest date first
    pub fn list_expenses(&self, range: &DateRange) -> Result<Vec<Expense>> {
        self.store
            .find_expenses_in_range(range)
            .inspect_err(|e| tracing::error!("list_expenses failed: {}", e))
    }

    /// Category totals in the range; an empty `category` means no filter
    pub fn summarize(&self, range: &DateRange, category: Option<&str>) -> Result<Vec<CategorySummary>> {
        let category = category.filter(|c| !c.is_empty());
        self.store
            .summarize_by_category(range, category)
            .inspect_err(|e| tracing::error!("summarize failed: {}", e))
    }
}
