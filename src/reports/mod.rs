//! Reports module for the expense tracker
//!
//! Aggregated views over the expense list.

pub mod summary;

pub use summary::{BreakdownRow, BudgetProgress, DateRange, ExpenseSummary};
