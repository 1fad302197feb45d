use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::cli::{
    handle_backup_command, handle_config_command, handle_expense_command,
    handle_storage_command, handle_summary_command, handle_transfer_command, BackupCommands,
    ConfigArgs, ExpenseCommands, SummaryArgs, TransferCommands,
};
use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
use expense_tracker::init_tracing;
use expense_tracker::storage::{ExpenseStore, StoreOptions};

#[derive(Parser)]
#[command(
    name = "expense",
    author = "Kaylee Beyene",
    version,
    about = "Local-first expense tracker with rolling backups",
    long_about = "Records personal and shared expenses in a local store that \
                  backs itself up after every change. Keeps the most recent \
                  backups for point-in-time restore, and imports or exports \
                  JSON and CSV."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Show totals and breakdowns for a date range
    Summary(SummaryArgs),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    #[command(flatten)]
    Transfer(TransferCommands),

    /// Show or change configuration and paths
    Config(ConfigArgs),

    /// Show storage usage
    Storage,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TrackerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("Expense Tracker - local-first expense tracking");
        println!();
        println!("Run 'expense --help' for usage information.");
        println!("Run 'expense add 12.50 -c Food' to record an expense.");
        return Ok(());
    };

    // Configuration never touches the store, so it works while another
    // process holds the lock.
    let options = StoreOptions::from_settings(&settings);
    let open_store = || ExpenseStore::open(&paths, options);

    match command {
        Commands::Config(args) => handle_config_command(&paths, &mut settings, args)?,
        Commands::Expense(cmd) => handle_expense_command(&open_store()?, &settings, cmd)?,
        Commands::Summary(args) => handle_summary_command(&open_store()?, &settings, args)?,
        Commands::Backup(cmd) => handle_backup_command(&open_store()?, &paths, cmd)?,
        Commands::Transfer(cmd) => handle_transfer_command(&open_store()?, &paths, cmd)?,
        Commands::Storage => handle_storage_command(&open_store()?)?,
    }

    Ok(())
}
