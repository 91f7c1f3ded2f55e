use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use expense_tracker::cli::{
    handle_audit_command, handle_expense_command, handle_report_command, ExpenseCommands,
    ReportCommands,
};
use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
use expense_tracker::storage::Storage;

#[derive(Parser)]
#[command(
    name = "expenses",
    author = "Kaylee Beyene",
    version,
    about = "Track personal expenses in a CSV file",
    long_about = "A small command-line expense tracker. Expenses are kept in a \
                  plain CSV file and can be listed, summarized per category \
                  for a month, and exported as CSV or text reports."
)]
struct Cli {
    /// Use this expense file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    #[command(flatten)]
    Report(ReportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    // Initialize paths and settings
    let mut paths = TrackerPaths::new()?;
    if let Some(data_file) = cli.data_file {
        paths = paths.with_expenses_file(data_file);
    }
    let settings = Settings::load_or_create(&paths)?;
    debug!(base_dir = %paths.base_dir().display(), "Resolved paths");

    // Initialize storage
    let mut storage = Storage::open(paths.clone(), settings.audit_enabled)?;

    match cli.command {
        Commands::Expense(cmd) => handle_expense_command(&mut storage, &settings, cmd)?,
        Commands::Report(cmd) => handle_report_command(&storage, &settings, cmd)?,
        Commands::Audit { count } => handle_audit_command(&storage, count)?,
        Commands::Config => {
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }

            let summary = storage.expenses.last_load();
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Expense file:     {}", paths.expenses_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Currency symbol:  {}", settings.currency_symbol);
            println!("Default category: {}", settings.default_category);
            println!("List limit:       {}", settings.default_list_limit);
            println!("Audit enabled:    {}", settings.audit_enabled);
            println!();
            println!(
                "Expenses loaded:  {} ({} rows skipped)",
                summary.loaded, summary.skipped
            );
        }
    }

    Ok(())
}

/// Install a stderr subscriber, honoring RUST_LOG when it is set
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "expense_tracker={},{}={}",
            level,
            env!("CARGO_CRATE_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
