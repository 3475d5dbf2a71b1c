use std::path::Path;
use expense_tracker::config::{write_config, TrackerConfig};
use expense_tracker::expense::{DateRange, NewExpense};
use expense_tracker::service::Payload;
use expense_tracker::storage::ExpenseStore;
use expense_tracker::ui::{self, Icons};
use expense_tracker::{CategoriesResource, ExpenseService};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Print a payload as pretty JSON; fail the command if it is an error payload
fn emit_json<T: Serialize>(operation: &str, payload: Payload<T>) -> anyhow::Result<()> {
    let failed = payload.is_error();
    println!("{}", serde_json::to_string_pretty(&payload.into_value())?);
    if failed {
        anyhow::bail!("{} failed", operation);
    }
    Ok(())
}

pub fn run_init(
    store: &ExpenseStore,
    config: &TrackerConfig,
    config_path: &Path,
    write: bool,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    if write {
        write_config(config_path, config, force)?;
    }

    let stats = store.stats()?;
    if json {
        let data = serde_json::json!({
            "database": store.path().display().to_string(),
            "config": write.then(|| config_path.display().to_string()),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        ui::success("Database ready");
        ui::info("Database", &store.path().display().to_string());
        if write {
            ui::info("Config", &config_path.display().to_string());
        }
        ui::section("Statistics");
        ui::summary_row("Expenses:", &stats.expenses.to_string());
        ui::summary_row("Earliest:", stats.earliest.as_deref().unwrap_or("-"));
        ui::summary_row("Latest:", stats.latest.as_deref().unwrap_or("-"));
    }
    Ok(())
}

pub fn run_add(service: &ExpenseService, expense: NewExpense, json: bool) -> anyhow::Result<()> {
    let result = service.add_expense(&expense);
    if json {
        return emit_json("add_expense", Payload::from(result));
    }

    let added = result?;
    ui::success(&format!(
        "Added expense #{} ({} {:.2} on {})",
        added.id, expense.category, expense.amount, expense.date
    ));
    Ok(())
}

pub fn run_list(service: &ExpenseService, range: DateRange, json: bool) -> anyhow::Result<()> {
    let result = service.list_expenses(&range);
    if json {
        return emit_json("list_expenses", Payload::from(result));
    }

    let expenses = result?;
    ui::header(&format!("Expenses {} → {}", range.start_date, range.end_date));
    if expenses.is_empty() {
        println!("{} No expenses in range.", Icons::EMPTY);
        return Ok(());
    }

    println!("{}", ui::expenses_table(&expenses));
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    print_total(total, expenses.len());
    Ok(())
}

pub fn run_summarize(
    service: &ExpenseService,
    range: DateRange,
    category: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let result = service.summarize(&range, category.as_deref());
    if json {
        return emit_json("summarize", Payload::from(result));
    }

    let summaries = result?;
    let title = match category.as_deref().filter(|c| !c.is_empty()) {
        Some(c) => format!("Summary {} → {} ({})", range.start_date, range.end_date, c),
        None => format!("Summary {} → {}", range.start_date, range.end_date),
    };
    ui::header(&title);
    if summaries.is_empty() {
        println!("{} No expenses in range.", Icons::EMPTY);
        return Ok(());
    }

    println!("{}", ui::summary_table(&summaries));
    let total: f64 = summaries.iter().map(|s| s.total_amount).sum();
    let count: i64 = summaries.iter().map(|s| s.count).sum();
    print_total(total, count as usize);
    Ok(())
}

pub fn run_categories(resource: &CategoriesResource, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", resource.read());
        return Ok(());
    }

    let categories = resource.categories()?;
    ui::header("Categories");
    for category in categories {
        println!("  {} {}", Icons::TAG, category);
    }
    Ok(())
}

fn print_total(total: f64, count: usize) {
    let amount = format!("{:.2}", total);
    let styled = if total < 0.0 {
        amount.style(ui::theme().credit).to_string()
    } else {
        amount.bold().to_string()
    };
    println!("{} Total: {} across {} expense(s)", Icons::STATS, styled, count);
}
