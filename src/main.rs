use anyhow::Result;
use clap::{Parser, Subcommand};

use budget_grid::cli::{
    handle_actual_command, handle_budget_command, handle_category_command, handle_export_command,
    ActualCommands, BudgetCommands, CategoryCommands, ExportArgs,
};
use budget_grid::config::{paths::GridPaths, settings::Settings};
use budget_grid::logging;
use budget_grid::services::SessionContext;
use budget_grid::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "budget-grid",
    author = "Kaylee Beyene",
    version,
    about = "Twelve-month budget grid for a hierarchical category tree",
    long_about = "budget-grid keeps a month-by-month budget for Income and Expense \
                  categories. Parent categories and the Income-Expenses line are \
                  rolled up automatically, and transforms such as distribute, \
                  rollover and copy-to-end-of-year fill in months for you."
)]
struct Cli {
    /// Budget to work on (defaults to the budget_name setting)
    #[arg(short, long, global = true)]
    budget: Option<String>,

    /// Budget year (defaults to the current year)
    #[arg(short, long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with default settings and categories
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    #[command(flatten)]
    Budget(BudgetCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Actual transaction commands
    #[command(subcommand, alias = "txn")]
    Actual(ActualCommands),

    /// Export the budget grid
    Export(ExportArgs),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Change one setting
    Set {
        /// budget_name, currency_symbol, decimal_places or log_filter
        key: String,
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths, settings and logging
    let paths = GridPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    logging::init_tracing(&settings.log_filter);

    let storage = Storage::open(paths.clone())?;
    let context = SessionContext::from_settings(&settings, cli.budget.as_deref(), cli.year);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing budget-grid at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default categories have been created:");
            println!("  - Income: Salary, Interest");
            println!("  - Expenses: Housing (Rent, Utilities), Food (Groceries, Dining Out), Transportation");
            println!();
            println!("Run 'budget-grid show' to see the grid.");
        }
        Some(Commands::Config { action }) => match action {
            Some(ConfigCommands::Set { key, value }) => {
                settings.set(&key, &value)?;
                settings.save(&paths)?;
                println!("Set {} = {}", key, value);
            }
            None => {
                println!("budget-grid Configuration");
                println!("=========================");
                println!("Base directory: {}", paths.base_dir().display());
                println!("Data directory: {}", paths.data_dir().display());
                println!("Initialized:    {}", storage.is_initialized());
                println!();
                println!("Settings:");
                println!("  budget_name:     {}", settings.budget_name);
                println!("  currency_symbol: {}", settings.currency_symbol);
                println!("  decimal_places:  {}", settings.decimal_places);
                println!("  log_filter:      {}", settings.log_filter);
            }
        },
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, context, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Actual(cmd)) => {
            handle_actual_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(args)) => {
            handle_export_command(&storage, context, args)?;
        }
        None => {
            println!("budget-grid - twelve-month budget editor");
            println!();
            println!("Run 'budget-grid --help' for usage information.");
            println!("Run 'budget-grid show' to see the current budget.");
        }
    }

    Ok(())
}
