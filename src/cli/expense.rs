//! Expense CLI commands
//!
//! Add, edit, list, delete and clear expense records.

use chrono::Local;
use clap::Subcommand;

use super::{parse_cli_date, report_backup, RangeArgs};
use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_register};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    Expense, ExpenseId, Money, Person, DEFAULT_CATEGORY, DEFAULT_PAYMENT_MODE,
};
use crate::storage::ExpenseStore;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g. 12.50)
        amount: String,
        /// Category
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Who paid (Person1, Person2, Both or a name)
        #[arg(short, long)]
        person: Option<String>,
        /// Payment mode
        #[arg(short, long, default_value = DEFAULT_PAYMENT_MODE)]
        mode: String,
        /// Description
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Change fields of an existing expense
    Edit {
        /// Expense ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New payer
        #[arg(short, long)]
        person: Option<String>,
        /// New payment mode
        #[arg(short, long)]
        mode: Option<String>,
        /// New description
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List expenses
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        range: RangeArgs,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Show at most this many (most recent last)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID
        id: String,
    },

    /// Delete every expense
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    store: &ExpenseStore,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TrackerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            person,
            mode,
            note,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(raw) => parse_cli_date(&raw)?,
                None => Local::now().date_naive(),
            };
            let person = person
                .map(Person::from)
                .unwrap_or_else(|| settings.default_person.clone());

            let note = note.unwrap_or_default();
            let expense = Expense::shared(amount, category, date, person, mode, note);
            let committed = store.add_or_update(expense)?;
            report_backup(&committed);

            println!("Added expense: {}", committed.value);
            if let Some(saved) = store.get(&committed.value)? {
                print!("{}", format_expense_details(&saved, symbol));
            }
        }

        ExpenseCommands::Edit {
            id,
            amount,
            category,
            date,
            person,
            mode,
            note,
        } => {
            let id = ExpenseId::new(id.trim());
            let mut expense = store
                .get(&id)?
                .ok_or_else(|| TrackerError::expense_not_found(id.as_str()))?;

            if let Some(raw) = amount {
                expense.amount = parse_amount(&raw)?;
            }
            if let Some(category) = category {
                expense.category = category;
            }
            if let Some(raw) = date {
                expense.date = Some(parse_cli_date(&raw)?);
            }
            if let Some(person) = person {
                expense.person = Some(Person::from(person));
            }
            if let Some(mode) = mode {
                expense.payment_mode = Some(mode);
            }
            if let Some(note) = note {
                // Keep writing to whichever field the record already uses
                if expense.note.is_none() && expense.description.is_some() {
                    expense.description = Some(note);
                } else {
                    expense.note = Some(note);
                }
            }

            let committed = store.add_or_update(expense)?;
            report_backup(&committed);

            println!("Updated expense: {}", committed.value);
            if let Some(saved) = store.get(&committed.value)? {
                print!("{}", format_expense_details(&saved, symbol));
            }
        }

        ExpenseCommands::List {
            range,
            category,
            limit,
        } => {
            let range = range.to_range(Local::now().date_naive())?;
            let mut expenses: Vec<Expense> = store
                .get_all()?
                .into_iter()
                .filter(|e| range.contains(e))
                .filter(|e| {
                    category
                        .as_deref()
                        .map_or(true, |c| e.category.eq_ignore_ascii_case(c))
                })
                .collect();

            if let Some(limit) = limit {
                let skip = expenses.len().saturating_sub(limit);
                expenses.drain(..skip);
            }

            if range.is_bounded() {
                println!("Expenses: {}", range.describe());
                println!();
            }
            print!("{}", format_expense_register(&expenses, symbol));
        }

        ExpenseCommands::Delete { id } => {
            let id = ExpenseId::new(id.trim());
            let committed = store.delete(&id)?;
            report_backup(&committed);

            if committed.value {
                println!("Deleted expense: {}", id);
            } else {
                println!("No expense with ID {}; nothing deleted.", id);
            }
        }

        ExpenseCommands::Clear { force } => {
            let count = store.get_all()?.len();

            if !force {
                println!("WARNING: This will delete all {} expense(s)!", count);
                if settings.clear_backups_on_clear {
                    println!("The backup log will be wiped as well.");
                } else {
                    println!("A backup of the empty state is kept; existing backups stay.");
                }
                println!("To proceed, run again with --force flag:");
                println!("  expense clear --force");
                return Ok(());
            }

            let committed = store.clear()?;
            report_backup(&committed);
            println!("Cleared {} expense(s).", committed.value);
        }
    }

    Ok(())
}

fn parse_amount(raw: &str) -> TrackerResult<Money> {
    Money::parse(raw).map_err(|e| TrackerError::Parse(e.to_string()))
}
