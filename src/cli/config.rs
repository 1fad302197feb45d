//! Configuration and storage CLI commands

use clap::Args;

use crate::config::paths::TrackerPaths;
use crate::config::settings::Settings;
use crate::display::format_storage_usage;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Money, Person};
use crate::storage::ExpenseStore;

/// Options for `expense config`; without any, the configuration is shown
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Set the monthly budget ("none" to unset)
    #[arg(long)]
    pub budget: Option<String>,

    /// Set how many backups are kept
    #[arg(long)]
    pub retention: Option<usize>,

    /// Set the currency symbol used for display
    #[arg(long)]
    pub currency: Option<String>,

    /// Set the payer assumed by `add`
    #[arg(long)]
    pub default_person: Option<String>,

    /// Whether `clear` also wipes the backup log
    #[arg(long)]
    pub clear_backups_on_clear: Option<bool>,
}

impl ConfigArgs {
    fn is_empty(&self) -> bool {
        self.budget.is_none()
            && self.retention.is_none()
            && self.currency.is_none()
            && self.default_person.is_none()
            && self.clear_backups_on_clear.is_none()
    }

    /// Apply the requested changes to `settings`
    pub fn apply(&self, settings: &mut Settings) -> TrackerResult<()> {
        if let Some(raw) = &self.budget {
            settings.monthly_budget = if raw.trim().eq_ignore_ascii_case("none") {
                None
            } else {
                Some(Money::parse(raw).map_err(|e| TrackerError::Parse(e.to_string()))?)
            };
        }
        if let Some(limit) = self.retention {
            settings.backup_retention.limit = limit;
        }
        if let Some(symbol) = &self.currency {
            settings.currency_symbol = symbol.clone();
        }
        if let Some(person) = &self.default_person {
            settings.default_person = Person::from(person.clone());
        }
        if let Some(flag) = self.clear_backups_on_clear {
            settings.clear_backups_on_clear = flag;
        }
        settings.validate()
    }
}

/// Show or update the configuration
pub fn handle_config_command(
    paths: &TrackerPaths,
    settings: &mut Settings,
    args: ConfigArgs,
) -> TrackerResult<()> {
    if !args.is_empty() {
        args.apply(settings)?;
        settings.save(paths)?;
        println!("Settings saved.");
        println!();
    }

    println!("Expense Tracker Configuration");
    println!("=============================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Store directory:  {}", paths.store_dir().display());
    println!("Exports dir:      {}", paths.exports_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!("  Backup retention:       {}", settings.backup_retention.limit);
    println!("  Clear wipes backups:    {}", settings.clear_backups_on_clear);
    println!(
        "  Monthly budget:         {}",
        settings
            .monthly_budget
            .map(|b| b.format_with_symbol(&settings.currency_symbol))
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("  Currency symbol:        {}", settings.currency_symbol);
    println!("  Default person:         {}", settings.default_person);

    Ok(())
}

/// Show storage usage
pub fn handle_storage_command(store: &ExpenseStore) -> TrackerResult<()> {
    let expenses = store.get_all()?.len();
    let backups = store.list_backups()?.len();

    println!("Storage Usage");
    println!("=============");
    println!("Expenses: {}", expenses);
    println!(
        "Backups:  {} (limit {})",
        backups,
        store.options().retention.limit()
    );
    println!();
    print!("{}", format_storage_usage(&store.usage()));

    Ok(())
}
