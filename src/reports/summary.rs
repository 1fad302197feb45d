//! Expense summary report
//!
//! Totals for a date range, broken down by category, person and payment
//! mode, with budget progress when a monthly budget is configured.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Expense, Money};

/// Inclusive date window; either bound may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Every record, dated or not
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month
            .and_then(|d| d.pred_opt())
            .unwrap_or(start);
        Self::between(start, end)
    }

    /// The last `days` days, ending on `today`
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self::between(today - Duration::days(span), today)
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn contains(&self, expense: &Expense) -> bool {
        expense.is_within(self.start, self.end)
    }

    /// Human-readable description
    pub fn describe(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "All time".to_string(),
            (Some(start), Some(end)) => format!("{} to {}", start, end),
            (Some(start), None) => format!("From {}", start),
            (None, Some(end)) => format!("Until {}", end),
        }
    }
}

/// One row of a breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub name: String,
    pub total: Money,
    pub count: usize,
    /// Share of the total spent
    pub percentage: f64,
}

/// Budget progress for the summarised range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetProgress {
    pub budget: Money,
    pub remaining: Money,
    pub spent_percentage: f64,
}

/// Aggregated view of the expenses in a date range
#[derive(Debug, Clone)]
pub struct ExpenseSummary {
    pub range: DateRange,
    pub total_spent: Money,
    pub count: usize,
    pub by_category: Vec<BreakdownRow>,
    pub by_person: Vec<BreakdownRow>,
    pub by_payment_mode: Vec<BreakdownRow>,
    pub budget: Option<BudgetProgress>,
}

impl ExpenseSummary {
    /// Summarise `records` falling inside `range`
    ///
    /// Undated records only count toward an unbounded range.
    pub fn generate(records: &[Expense], range: DateRange, budget: Option<Money>) -> Self {
        let selected: Vec<&Expense> = records.iter().filter(|e| range.contains(e)).collect();
        let total_spent: Money = selected.iter().map(|e| e.amount).sum();

        let by_category = breakdown(&selected, total_spent, |e| e.category.clone());
        let by_person = breakdown(&selected, total_spent, |e| {
            e.person
                .as_ref()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "Unassigned".to_string())
        });
        let by_payment_mode = breakdown(&selected, total_spent, |e| {
            e.payment_mode
                .clone()
                .unwrap_or_else(|| "Unspecified".to_string())
        });

        let budget = budget.map(|budget| BudgetProgress {
            budget,
            remaining: budget - total_spent,
            spent_percentage: percentage(total_spent, budget),
        });

        Self {
            range,
            total_spent,
            count: selected.len(),
            by_category,
            by_person,
            by_payment_mode,
            budget,
        }
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency_symbol);
        let mut output = String::new();

        output.push_str(&format!("Expense Summary: {}\n", self.range.describe()));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if let Some(budget) = &self.budget {
            output.push_str(&format!("Total Budget: {}\n", money(budget.budget)));
        }
        output.push_str(&format!("Total Spent:  {}\n", money(self.total_spent)));
        if let Some(budget) = &self.budget {
            output.push_str(&format!("Remaining:    {}\n", money(budget.remaining)));
            output.push_str(&format!("Spent %:      {:.1}%\n", budget.spent_percentage));
        }
        output.push_str(&format!("Expenses:     {}\n", self.count));

        for (title, rows) in [
            ("Category", &self.by_category),
            ("Person", &self.by_person),
            ("Payment Mode", &self.by_payment_mode),
        ] {
            if rows.is_empty() {
                continue;
            }
            output.push('\n');
            output.push_str(&format!(
                "{:<24} {:>14} {:>7} {:>7}\n",
                title, "Amount", "Count", "%"
            ));
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for row in rows {
                output.push_str(&format!(
                    "{:<24} {:>14} {:>7} {:>6.1}%\n",
                    row.name,
                    money(row.total),
                    row.count,
                    row.percentage
                ));
            }
        }

        output
    }
}

fn percentage(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        part.cents() as f64 / whole.cents() as f64 * 100.0
    }
}

fn breakdown<F>(records: &[&Expense], total: Money, key: F) -> Vec<BreakdownRow>
where
    F: Fn(&Expense) -> String,
{
    let mut groups: HashMap<String, (Money, usize)> = HashMap::new();
    for expense in records {
        let entry = groups.entry(key(*expense)).or_insert((Money::zero(), 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut rows: Vec<BreakdownRow> = groups
        .into_iter()
        .map(|(name, (sum, count))| BreakdownRow {
            percentage: percentage(sum, total),
            name,
            total: sum,
            count,
        })
        .collect();

    // Largest first; names keep ties stable
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(cents: i64, category: &str, day: NaiveDate, person: Person, mode: &str) -> Expense {
        Expense::shared(Money::from_cents(cents), category, day, person, mode, "")
    }

    fn sample_records() -> Vec<Expense> {
        vec![
            expense(5000, "Food", date(2024, 3, 1), Person::Person1, "Cash"),
            expense(2000, "Transport", date(2024, 3, 15), Person::Person2, "UPI"),
            expense(3000, "Food", date(2024, 3, 31), Person::Both, "Cash"),
            expense(9900, "Shopping", date(2024, 4, 1), Person::Person1, "Card"),
        ]
    }

    #[test]
    fn test_month_range() {
        let range = DateRange::month_of(date(2024, 2, 10));
        assert_eq!(range, DateRange::between(date(2024, 2, 1), date(2024, 2, 29)));

        let december = DateRange::month_of(date(2023, 12, 31));
        assert_eq!(december.end, Some(date(2023, 12, 31)));
    }

    #[test]
    fn test_last_days_range() {
        let range = DateRange::last_days(date(2024, 3, 10), 7);
        assert_eq!(range, DateRange::between(date(2024, 3, 4), date(2024, 3, 10)));
    }

    #[test]
    fn test_summary_respects_date_range() {
        let records = sample_records();
        let range = DateRange::month_of(date(2024, 3, 1));
        let summary = ExpenseSummary::generate(&records, range, None);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_spent, Money::from_cents(10000));
        assert_eq!(summary.by_category[0].name, "Food");
        assert_eq!(summary.by_category[0].total, Money::from_cents(8000));
        assert_eq!(summary.by_category[0].count, 2);
        assert!((summary.by_category[0].percentage - 80.0).abs() < 1e-9);
        assert!(summary.budget.is_none());
    }

    #[test]
    fn test_summary_with_budget() {
        let records = sample_records();
        let summary = ExpenseSummary::generate(
            &records,
            DateRange::all(),
            Some(Money::from_cents(40000)),
        );

        let budget = summary.budget.unwrap();
        assert_eq!(summary.total_spent, Money::from_cents(19900));
        assert_eq!(budget.remaining, Money::from_cents(20100));
        assert!((budget.spent_percentage - 49.75).abs() < 1e-9);
    }

    #[test]
    fn test_undated_records_only_in_unbounded_range() {
        let mut undated = Expense::new(Money::from_cents(100), "Other", date(2024, 3, 2));
        undated.date = None;
        let records = vec![undated];

        let march = DateRange::month_of(date(2024, 3, 1));
        let bounded = ExpenseSummary::generate(&records, march, None);
        assert_eq!(bounded.count, 0);

        let all = ExpenseSummary::generate(&records, DateRange::all(), None);
        assert_eq!(all.count, 1);
        assert_eq!(all.by_person[0].name, "Unassigned");
    }

    #[test]
    fn test_person_and_mode_breakdowns() {
        let summary = ExpenseSummary::generate(&sample_records(), DateRange::all(), None);

        assert_eq!(summary.by_person[0].name, "Person1");
        assert_eq!(summary.by_person[0].total, Money::from_cents(14900));
        assert_eq!(summary.by_payment_mode[0].name, "Card");
        assert_eq!(summary.by_payment_mode.len(), 3);
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_overflowing() {
        let huge = Money::from_cents(i64::MAX - 10);
        let records = vec![
            expense(huge.cents(), "Rent", date(2024, 3, 1), Person::Person1, "Card"),
            expense(huge.cents(), "Rent", date(2024, 3, 2), Person::Person1, "Card"),
        ];

        let budget = Some(Money::from_cents(100));
        let summary = ExpenseSummary::generate(&records, DateRange::all(), budget);
        assert_eq!(summary.total_spent.cents(), i64::MAX);
        assert_eq!(summary.by_category[0].total.cents(), i64::MAX);
        let budget = summary.budget.unwrap();
        assert_eq!(budget.remaining.cents(), 100 - i64::MAX);
    }

    #[test]
    fn test_format_terminal() {
        let summary = ExpenseSummary::generate(
            &sample_records(),
            DateRange::all(),
            Some(Money::from_cents(40000)),
        );
        let text = summary.format_terminal("$");

        assert!(text.contains("Expense Summary: All time"));
        assert!(text.contains("Total Budget: $400.00"));
        assert!(text.contains("Remaining:    $201.00"));
        assert!(text.contains("Shopping"));
    }
}
