//! CLI commands for expense management
//!
//! Implements the add, list and delete commands.

use std::io::{self, BufRead, Write};

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{TrackerError, TrackerResult};
use crate::models::NewExpense;
use crate::services::{ExpenseFilter, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount spent (e.g. 12.50)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category name (defaults to the configured default category)
        #[arg(short, long)]
        category: Option<String>,
        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List expenses, newest first
    #[command(alias = "ls")]
    List {
        /// Only expenses in this year
        #[arg(short, long)]
        year: Option<i32>,
        /// Only expenses in this month (1-12)
        #[arg(short = 'M', long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Only expenses in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,
        /// Maximum number of expenses to show (0 for all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Delete an expense by id or unique id prefix
    #[command(alias = "rm")]
    Delete {
        /// Expense id or prefix
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TrackerResult<()> {
    let symbol = settings.currency_symbol.as_str();
    let mut service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            description,
        } => {
            let category = category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| settings.default_category.clone());

            let mut input = NewExpense::new(amount, category);
            if let Some(date) = date {
                input = input.date(date);
            }
            if let Some(description) = description {
                input = input.description(description);
            }

            let expense = service.add(input)?;
            println!(
                "Added expense {}: {} {} on {}",
                expense.id.short(),
                expense.amount.format_with_symbol(symbol),
                expense.category,
                expense.date_string()
            );
        }

        ExpenseCommands::List {
            year,
            month,
            category,
            limit,
        } => {
            let mut filter =
                ExpenseFilter::new().limit(limit.unwrap_or(settings.default_list_limit));
            if let Some(year) = year {
                filter = filter.year(year);
            }
            if let Some(month) = month {
                filter = filter.month(month);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }

            let expenses = service.list(&filter);
            print!("{}", format_expense_list(&expenses, symbol));
        }

        ExpenseCommands::Delete { id, force } => {
            let id = service.resolve_prefix(&id)?;
            let expense = service
                .get(&id)
                .ok_or_else(|| TrackerError::expense_not_found(id.as_str()))?;

            if !force {
                println!("About to delete expense:");
                print!("{}", format_expense_details(&expense, symbol));
                println!();

                let stdin = io::stdin();
                let mut stdout = io::stdout();
                if !confirm(&mut stdin.lock(), &mut stdout, "Delete this expense? [y/N] ")? {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            if service.delete(&id)? {
                println!(
                    "Deleted expense: {} ({} {})",
                    id.short(),
                    expense.date_string(),
                    expense.category
                );
            } else {
                println!("Expense {} was already gone.", id.short());
            }
        }
    }

    Ok(())
}

/// Ask a yes/no question, defaulting to no on empty input or end of input
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> TrackerResult<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
