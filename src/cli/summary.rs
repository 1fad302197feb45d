//! Summary CLI command

use chrono::Local;
use clap::Args;

use super::RangeArgs;
use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::Money;
use crate::reports::ExpenseSummary;
use crate::storage::ExpenseStore;

/// Options for `expense summary`
#[derive(Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Budget to compare against (defaults to the configured monthly budget)
    #[arg(short, long)]
    pub budget: Option<String>,
}

/// Handle the summary command
pub fn handle_summary_command(
    store: &ExpenseStore,
    settings: &Settings,
    args: SummaryArgs,
) -> TrackerResult<()> {
    let range = args.range.to_range(Local::now().date_naive())?;
    let budget = match args.budget {
        Some(raw) => Some(Money::parse(&raw).map_err(|e| TrackerError::Parse(e.to_string()))?),
        None => settings.monthly_budget,
    };

    let records = store.get_all()?;
    let summary = ExpenseSummary::generate(&records, range, budget);
    print!("{}", summary.format_terminal(&settings.currency_symbol));

    Ok(())
}
