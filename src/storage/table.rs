//! The expense table
//!
//! Persisted as `expenses.json`. Records keep their insertion order; an
//! update replaces a record in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Expense, ExpenseId};

/// Current schema version of `expenses.json`
pub const EXPENSE_TABLE_SCHEMA_VERSION: u32 = 2;

/// Expense records keyed by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseTable {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    #[serde(default)]
    expenses: Vec<Expense>,
}

fn default_schema_version() -> u32 {
    EXPENSE_TABLE_SCHEMA_VERSION
}

impl Default for ExpenseTable {
    fn default() -> Self {
        Self {
            schema_version: EXPENSE_TABLE_SCHEMA_VERSION,
            expenses: Vec::new(),
        }
    }
}

impl ExpenseTable {
    /// Build a table from records, assigning ids where missing
    ///
    /// A later record with the same id overwrites the earlier one in place.
    pub fn from_records(records: impl IntoIterator<Item = Expense>) -> Self {
        let mut expenses: Vec<Expense> = Vec::new();
        let mut positions: HashMap<ExpenseId, usize> = HashMap::new();

        for mut expense in records {
            let id = expense
                .id
                .get_or_insert_with(ExpenseId::generate)
                .clone();
            match positions.get(&id) {
                Some(&index) => expenses[index] = expense,
                None => {
                    positions.insert(id, expenses.len());
                    expenses.push(expense);
                }
            }
        }

        Self {
            schema_version: EXPENSE_TABLE_SCHEMA_VERSION,
            expenses,
        }
    }

    /// Insert or overwrite a record, returning its effective id
    pub fn upsert(&mut self, mut expense: Expense) -> ExpenseId {
        let id = expense
            .id
            .get_or_insert_with(ExpenseId::generate)
            .clone();

        match self.position(&id) {
            Some(index) => self.expenses[index] = expense,
            None => self.expenses.push(expense),
        }
        id
    }

    /// Remove a record, returning whether it existed
    pub fn remove(&mut self, id: &ExpenseId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.expenses.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove everything, returning how many records were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.expenses.len();
        self.expenses.clear();
        count
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.position(id).map(|index| &self.expenses[index])
    }

    pub fn records(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    fn position(&self, id: &ExpenseId) -> Option<usize> {
        self.expenses
            .iter()
            .position(|e| e.id.as_ref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn expense(cents: i64) -> Expense {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        Expense::new(Money::from_cents(cents), "Food", date)
    }

    #[test]
    fn test_upsert_assigns_missing_id() {
        let mut table = ExpenseTable::default();
        let id = table.upsert(expense(100));
        assert_eq!(table.get(&id).unwrap().amount.cents(), 100);
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let mut table = ExpenseTable::default();
        table.upsert(expense(100).with_id("a"));
        table.upsert(expense(200).with_id("b"));
        table.upsert(expense(300).with_id("a"));

        let amounts: Vec<i64> = table.records().iter().map(|e| e.amount.cents()).collect();
        assert_eq!(amounts, vec![300, 200]);
    }

    #[test]
    fn test_from_records_later_duplicates_win() {
        let table = ExpenseTable::from_records(vec![
            expense(1).with_id("x"),
            expense(2),
            expense(3).with_id("x"),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&ExpenseId::from("x")).unwrap().amount.cents(), 3);
    }

    #[test]
    fn test_from_records_large_import() {
        // Every id appears twice; the second copy replaces the first in place
        let records = (0..20_000).map(|i| expense(i).with_id(format!("id-{}", i % 10_000)));
        let table = ExpenseTable::from_records(records);

        assert_eq!(table.len(), 10_000);
        assert_eq!(table.records()[0].id, Some(ExpenseId::from("id-0")));
        assert_eq!(table.records()[0].amount.cents(), 10_000);
        assert_eq!(table.records()[9_999].amount.cents(), 19_999);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut table = ExpenseTable::default();
        let id = table.upsert(expense(100));
        table.upsert(expense(200));

        assert!(table.remove(&id));
        assert!(!table.remove(&id));
        assert_eq!(table.clear(), 1);
        assert!(table.is_empty());
    }
}
