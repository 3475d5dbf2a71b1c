//! Expense records and query shapes

use serde::{de, Deserialize, Deserializer, Serialize};

/// A persisted expense row
///
/// `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    /// Compared lexically; zero-padded `YYYY-MM-DD` keeps ranges correct
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

/// Input for a new expense
///
/// Missing or null `subcategory` and `note` deserialize to empty strings so
/// the store never sees a null for either column. `amount` also accepts a
/// numeric string such as `"12.5"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: String,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub amount: f64,
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subcategory: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid amount: {:?} is not a number", s))),
    }
}

impl NewExpense {
    pub fn new(date: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount,
            category: category.into(),
            subcategory: String::new(),
            note: String::new(),
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Inclusive date range, compared as plain strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Same test the store applies with `BETWEEN`
    pub fn contains(&self, date: &str) -> bool {
        self.start_date.as_str() <= date && date <= self.end_date.as_str()
    }
}

/// Per-category aggregate over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total_amount: f64,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default_to_empty() {
        let parsed: NewExpense = serde_json::from_value(serde_json::json!({
            "date": "2024-01-05",
            "amount": 12.5,
            "category": "food"
        }))
        .unwrap();

        assert_eq!(parsed.subcategory, "");
        assert_eq!(parsed.note, "");
    }

    #[test]
    fn test_null_optional_fields_become_empty() {
        let parsed: NewExpense = serde_json::from_value(serde_json::json!({
            "date": "2024-01-05",
            "amount": 1.0,
            "category": "food",
            "subcategory": null,
            "note": null
        }))
        .unwrap();

        assert_eq!(parsed.subcategory, "");
        assert_eq!(parsed.note, "");
    }

    #[test]
    fn test_numeric_string_amount_is_coerced() {
        let parsed: NewExpense = serde_json::from_value(serde_json::json!({
            "date": "2024-01-05",
            "amount": " 12.5",
            "category": "food"
        }))
        .unwrap();
        assert_eq!(parsed.amount, 12.5);

        let err = serde_json::from_value::<NewExpense>(serde_json::json!({
            "date": "2024-01-05",
            "amount": "abc",
            "category": "food"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid amount"));
    }

    #[test]
    fn test_integer_amount_is_accepted() {
        let parsed: NewExpense = serde_json::from_value(serde_json::json!({
            "date": "2024-01-05",
            "amount": -10,
            "category": "refund"
        }))
        .unwrap();

        assert_eq!(parsed.amount, -10.0);
    }

    #[test]
    fn test_range_is_lexical() {
        let range = DateRange::new("2024-01-01", "2024-01-31");
        assert!(range.contains("2024-01-01"));
        assert!(range.contains("2024-01-31"));
        assert!(!range.contains("2024-02-01"));
        // Not zero-padded, so it sorts after "2024-01-31"
        assert!(!range.contains("2024-1-5"));
    }
}
