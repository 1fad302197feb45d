//! Expense display formatting
//!
//! Register-style listing and a details view for single records.

use crate::models::{Expense, Money};

/// Format a single expense as a register row
pub fn format_expense_row(expense: &Expense, currency_symbol: &str) -> String {
    let id = expense.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
    let date = expense
        .date_text()
        .unwrap_or_else(|| "----------".to_string());
    let person = expense
        .person
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_default();

    format!(
        "{:22} {:10} {:14} {:>12} {:8} {:8} {}",
        id,
        date,
        truncate(&expense.category, 14),
        expense.amount.format_with_symbol(currency_symbol),
        truncate(&person, 8),
        truncate(expense.payment_mode.as_deref().unwrap_or(""), 8),
        expense.memo()
    )
}

/// Format a list of expenses as a register with a total line
pub fn format_expense_register(expenses: &[Expense], currency_symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:22} {:10} {:14} {:>12} {:8} {:8} {}\n",
        "ID", "Date", "Category", "Amount", "Person", "Mode", "Description"
    ));
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, currency_symbol));
        output.push('\n');
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(96));
    output.push('\n');
    output.push_str(&format!(
        "{} expense(s), total {}\n",
        expenses.len(),
        total.format_with_symbol(currency_symbol)
    ));

    output
}

/// Format one expense in full
pub fn format_expense_details(expense: &Expense, currency_symbol: &str) -> String {
    let mut output = String::new();

    if let Some(id) = &expense.id {
        output.push_str(&format!("Expense:      {}\n", id));
    }
    if let Some(date) = expense.date_text() {
        output.push_str(&format!("Date:         {}\n", date));
    }
    output.push_str(&format!(
        "Amount:       {}\n",
        expense.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Category:     {}\n", expense.category));

    if let Some(person) = &expense.person {
        output.push_str(&format!("Person:       {}\n", person));
    }
    if let Some(mode) = &expense.payment_mode {
        output.push_str(&format!("Payment Mode: {}\n", mode));
    }
    if !expense.memo().is_empty() {
        output.push_str(&format!("Description:  {}\n", expense.memo()));
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;
    use chrono::NaiveDate;

    fn sample() -> Expense {
        Expense::shared(
            Money::from_cents(4550),
            "Food",
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            Person::Both,
            "UPI",
            "Dinner",
        )
        .with_id("1700000000000-abcd1234")
    }

    #[test]
    fn test_format_row() {
        let row = format_expense_row(&sample(), "$");
        assert!(row.starts_with("1700000000000-abcd1234"));
        assert!(row.contains("2024-03-09"));
        assert!(row.contains("$45.50"));
        assert!(row.ends_with("Dinner"));
    }

    #[test]
    fn test_format_register() {
        assert_eq!(format_expense_register(&[], "$"), "No expenses found.\n");

        let register = format_expense_register(&[sample(), sample()], "$");
        assert!(register.contains("2 expense(s), total $91.00"));
    }

    #[test]
    fn test_format_details() {
        let details = format_expense_details(&sample(), "₹");
        assert!(details.contains("Amount:       ₹45.50"));
        assert!(details.contains("Person:       Both"));
        assert!(details.contains("Payment Mode: UPI"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Food", 8), "Food");
        assert_eq!(truncate("Entertainment", 8), "Enter...");
    }
}
