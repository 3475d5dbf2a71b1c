use tabled::{settings::Style, Table, Tabled};
use crate::expense::{CategorySummary, Expense};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Subcategory")]
    subcategory: String,
    #[tabled(rename = "Note")]
    note: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Count")]
    count: i64,
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Rounded table of expense rows, in the order given
pub fn expenses_table(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return String::new();
    }

    let rows: Vec<ExpenseRow> = expenses
        .iter()
        .map(|e| ExpenseRow {
            id: e.id,
            date: e.date.clone(),
            amount: format_amount(e.amount),
            category: e.category.clone(),
            subcategory: e.subcategory.clone(),
            note: e.note.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Rounded table of per-category totals
pub fn summary_table(summaries: &[CategorySummary]) -> String {
    if summaries.is_empty() {
        return String::new();
    }

    let rows: Vec<SummaryRow> = summaries
        .iter()
        .map(|s| SummaryRow {
            category: s.category.clone(),
            total: format_amount(s.total_amount),
            count: s.count,
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(expenses_table(&[]).is_empty());
        assert!(summary_table(&[]).is_empty());
    }

    #[test]
    fn test_expense_table_contents() {
        let table = expenses_table(&[Expense {
            id: 7,
            date: "2024-01-05".to_string(),
            amount: 12.5,
            category: "food".to_string(),
            subcategory: "groceries".to_string(),
            note: String::new(),
        }]);

        assert!(table.contains("Subcategory"));
        assert!(table.contains("2024-01-05"));
        assert!(table.contains("12.50"));
        assert!(table.contains("groceries"));
    }

    #[test]
    fn test_summary_table_contents() {
        let table = summary_table(&[CategorySummary {
            category: "travel".to_string(),
            total_amount: -3.0,
            count: 2,
        }]);

        assert!(table.contains("travel"));
        assert!(table.contains("-3.00"));
    }
}
