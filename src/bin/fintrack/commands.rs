//! The subcommands and what they do with the app state.

use std::{
    io::{self, Write},
    str::FromStr,
};

use clap::Subcommand;
use time::Date;

use fintrack::{
    AppState, ClientConfig, Error, FinanceApi,
    aggregation::{
        Timeframe, category_shares, compute_balance_series, compute_category_breakdown,
        compute_category_spending_series, compute_interval_series, top_categories,
    },
    filters::{SortDirection, SortField, TransactionFilter, recent_transactions, sort_transactions},
    gateway::wire::Credentials,
    models::{AccountId, CategoryId, TransactionId, TransactionKind, parse_iso_date},
    notice::Notice,
    validation::{
        AccountDraft, CategoryDraft, TransactionDraft, validate_email, validate_new_password,
    },
};

use crate::output::{Output, Overview};

/// How many transactions the dashboard lists.
const RECENT_TRANSACTION_COUNT: usize = 5;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and save the token for later commands.
    Login {
        /// The email address to log in with, prompted for if not given.
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the saved token.
    Logout,
    /// Ask for a password reset link to be emailed.
    ForgotPassword {
        /// The email address of the account.
        #[arg(long)]
        email: String,
    },
    /// Set a new password with the token from a reset link.
    ResetPassword {
        /// The token from the reset link.
        token: String,
    },
    /// Show the totals, accounts, recent transactions and expense breakdown.
    Dashboard,
    /// Show the running balance for each of the last N days.
    Balance {
        /// How many days before today to start from.
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Compare income and expenses per week, month or year.
    Compare {
        /// One of weekly, monthly or yearly.
        #[arg(long, default_value = "monthly", value_parser = parse_choice::<Timeframe>)]
        timeframe: Timeframe,
    },
    /// Show the totals per category.
    Breakdown {
        /// Either income or expense.
        #[arg(long, default_value = "expense", value_parser = parse_choice::<TransactionKind>)]
        kind: TransactionKind,
        /// Only show the largest N categories.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Show the monthly expenses of selected categories.
    CategorySpending {
        /// The ID of a category to include, may be repeated. Defaults to the
        /// categories with the most expenses.
        #[arg(long = "category")]
        categories: Vec<String>,
        /// How many months to cover, including the current one.
        #[arg(long, default_value_t = 6)]
        months: u32,
        /// How many categories to pick when none are given.
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// List, add, edit or delete transactions.
    #[command(subcommand)]
    Transactions(TransactionCommand),
    /// List, add, edit or delete accounts.
    #[command(subcommand)]
    Accounts(AccountCommand),
    /// List, add, edit or delete categories.
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    /// List transactions, latest first by default.
    List {
        /// Only transactions whose description contains this text.
        #[arg(long)]
        search: Option<String>,
        /// Only transactions in the category with this ID.
        #[arg(long)]
        category: Option<String>,
        /// Only income or only expenses.
        #[arg(long, value_parser = parse_choice::<TransactionKind>)]
        kind: Option<TransactionKind>,
        /// Only transactions on this day (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        /// One of date, amount or description.
        #[arg(long, default_value = "date", value_parser = parse_choice::<SortField>)]
        sort: SortField,
        /// Either asc or desc.
        #[arg(long, default_value = "desc", value_parser = parse_choice::<SortDirection>)]
        direction: SortDirection,
        /// List at most this many.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Record a transaction.
    Add {
        /// The amount, greater than zero.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Either income or expense.
        #[arg(long, value_parser = parse_choice::<TransactionKind>)]
        kind: TransactionKind,
        /// The ID of the category.
        #[arg(long)]
        category: Option<String>,
        /// The ID of the account.
        #[arg(long)]
        account: Option<String>,
        /// When it happened (YYYY-MM-DD), defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        /// What it was for.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change a transaction. Fields that are not given keep their value.
    Edit {
        /// The ID of the transaction.
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long, value_parser = parse_choice::<TransactionKind>)]
        kind: Option<TransactionKind>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction.
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// List accounts and their total balance.
    List,
    /// Add an account.
    Add {
        #[arg(long)]
        name: String,
        /// The starting balance, may be negative for debt.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// A hex color, e.g. "#3b82f6".
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Change an account. Fields that are not given keep their value.
    Edit {
        /// The ID of the account.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        balance: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an account.
    Delete {
        /// The ID of the account.
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List categories.
    List {
        /// Only income or only expense categories.
        #[arg(long, value_parser = parse_choice::<TransactionKind>)]
        kind: Option<TransactionKind>,
    },
    /// Add a category.
    Add {
        #[arg(long)]
        name: String,
        /// Either income or expense.
        #[arg(long, value_parser = parse_choice::<TransactionKind>)]
        kind: TransactionKind,
        /// A hex color, e.g. "#888888".
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Change a category. Fields that are not given keep their value.
    Edit {
        /// The ID of the category.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_choice::<TransactionKind>)]
        kind: Option<TransactionKind>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category.
    Delete {
        /// The ID of the category.
        id: String,
    },
}

fn parse_choice<T: FromStr<Err = Error>>(value: &str) -> Result<T, String> {
    value.parse().map_err(|error: Error| error.to_string())
}

fn parse_date(value: &str) -> Result<Date, String> {
    parse_iso_date(value).map_err(|error| error.to_string())
}

/// Run `command` against `state`.
///
/// Failures that the user should see are queued on `state` as notices before
/// the error is returned.
pub async fn execute<A: FinanceApi>(
    command: Command,
    state: &mut AppState<A>,
    config: &ClientConfig,
    output: &Output,
) -> Result<(), Error> {
    match command {
        Command::Login { email } => login(state, email).await,
        Command::Logout => {
            state.logout();
            output.message("Logged out.");
            Ok(())
        }
        Command::ForgotPassword { email } => {
            let email = state.report_failure(validate_email(&email), "")?;
            let result = state.auth.forgot_password(&state.api, &email).await;
            state.report(
                result,
                Notice::success(
                    "Email Sent",
                    "If an account exists for that email, a reset link is on its way.",
                ),
                "Failed to send password reset email",
            )
        }
        Command::ResetPassword { token } => reset_password(state, &token).await,
        Command::Dashboard => {
            state.load_dashboard().await?;

            let summary = state.financial_summary();
            let categories = state.categories.categories();
            let transactions = state.transactions.transactions();
            let breakdown = compute_category_breakdown(transactions, TransactionKind::Expense);

            let overview = Overview {
                summary,
                savings_rate: summary.savings_rate(),
                total_balance: state.accounts.total_balance(),
                accounts: state.accounts.accounts(),
                recent_transactions: recent_transactions(transactions, RECENT_TRANSACTION_COUNT),
                expense_breakdown: category_shares(&breakdown, categories),
            };

            output.overview(&overview, categories)
        }
        Command::Balance { days } => {
            state.load_dashboard().await?;

            let series = compute_balance_series(
                state.transactions.transactions(),
                days,
                config.today()?,
            );
            output.balance_series(&series)
        }
        Command::Compare { timeframe } => {
            state.load_dashboard().await?;

            let series = compute_interval_series(
                state.transactions.transactions(),
                timeframe,
                config.today()?,
            );
            output.interval_series(&series)
        }
        Command::Breakdown { kind, top } => {
            state.load_dashboard().await?;

            let breakdown = compute_category_breakdown(state.transactions.transactions(), kind);
            let shown = match top {
                Some(n) => top_categories(&breakdown, n),
                None => breakdown.as_slice(),
            };
            output.shares(&category_shares(shown, state.categories.categories()))
        }
        Command::CategorySpending {
            categories,
            months,
            top,
        } => {
            state.load_dashboard().await?;
            let transactions = state.transactions.transactions();

            let category_ids: Vec<CategoryId> = if categories.is_empty() {
                let breakdown = compute_category_breakdown(transactions, TransactionKind::Expense);
                top_categories(&breakdown, top)
                    .iter()
                    .map(|entry| entry.category_id.clone())
                    .collect()
            } else {
                categories.into_iter().map(CategoryId::new).collect()
            };

            let series = compute_category_spending_series(
                transactions,
                &category_ids,
                months,
                config.today()?,
            );
            output.category_spending(&series, state.categories.categories())
        }
        Command::Transactions(command) => transactions(command, state, config, output).await,
        Command::Accounts(command) => accounts(command, state, output).await,
        Command::Categories(command) => categories(command, state, output).await,
    }
}

async fn login<A: FinanceApi>(state: &mut AppState<A>, email: Option<String>) -> Result<(), Error> {
    let email = match email {
        Some(email) => email,
        None => match prompt_line("Email: ") {
            Some(email) => email,
            None => return Ok(()),
        },
    };
    let email = state.report_failure(validate_email(&email), "")?;

    let Some(password) = prompt_password("Password: ") else {
        return Ok(());
    };

    state.login(&Credentials { email, password }).await
}

async fn reset_password<A: FinanceApi>(state: &mut AppState<A>, token: &str) -> Result<(), Error> {
    let Some(password) = get_new_password() else {
        return Ok(());
    };

    let result = state.auth.reset_password(&state.api, token, &password).await;
    state.report(
        result,
        Notice::success(
            "Password Reset",
            "Your password has been reset. You can now log in with your new password.",
        ),
        "Failed to reset password",
    )
}

async fn transactions<A: FinanceApi>(
    command: TransactionCommand,
    state: &mut AppState<A>,
    config: &ClientConfig,
    output: &Output,
) -> Result<(), Error> {
    state.load_dashboard().await?;

    match command {
        TransactionCommand::List {
            search,
            category,
            kind,
            date,
            sort,
            direction,
            limit,
        } => {
            let filter = TransactionFilter {
                search,
                category_id: category.map(CategoryId::new),
                kind,
                date,
            };

            let mut listed = filter.apply(state.transactions.transactions());
            sort_transactions(&mut listed, sort, direction);
            if let Some(limit) = limit {
                listed.truncate(limit);
            }

            output.transactions(
                &listed,
                state.categories.categories(),
                state.accounts.accounts(),
            )
        }
        TransactionCommand::Add {
            amount,
            kind,
            category,
            account,
            date,
            description,
        } => {
            let draft = TransactionDraft {
                amount,
                kind,
                date: match date {
                    Some(date) => date,
                    None => config.today()?,
                },
                category_id: category.map(CategoryId::new),
                account_id: account.map(AccountId::new),
                description,
            };
            let new_transaction = state.report_failure(
                draft.validate(state.categories.categories(), state.accounts.accounts()),
                "",
            )?;

            let result = state
                .transactions
                .create(&state.api, &new_transaction)
                .await;
            state
                .report(
                    result,
                    Notice::success(
                        "Transaction Added",
                        "Your transaction has been recorded successfully.",
                    ),
                    "Failed to create transaction",
                )
                .map(|_| ())
        }
        TransactionCommand::Edit {
            id,
            amount,
            kind,
            category,
            account,
            date,
            description,
        } => {
            let id = TransactionId::new(id);
            let existing = state.report_failure(
                state
                    .transactions
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| Error::NotFound(Some("Transaction not found".to_owned()))),
                "",
            )?;

            let draft = TransactionDraft {
                amount: amount.unwrap_or_else(|| existing.amount.to_string()),
                kind: kind.unwrap_or(existing.kind),
                date: date.unwrap_or(existing.date),
                category_id: category.map(CategoryId::new).or(existing.category_id),
                account_id: account.map(AccountId::new).or(existing.account_id),
                description: description.unwrap_or(existing.description),
            };
            let updated = state.report_failure(
                draft.validate(state.categories.categories(), state.accounts.accounts()),
                "",
            )?;

            let result = state.transactions.update(&state.api, &id, &updated).await;
            state
                .report(
                    result,
                    Notice::success(
                        "Transaction Updated",
                        "Your transaction has been updated successfully.",
                    ),
                    "Failed to update transaction",
                )
                .map(|_| ())
        }
        TransactionCommand::Delete { id } => {
            let result = state
                .transactions
                .delete(&state.api, &TransactionId::new(id))
                .await;
            state.report(
                result,
                Notice::success(
                    "Transaction Deleted",
                    "The transaction has been removed.",
                ),
                "Failed to delete transaction",
            )
        }
    }
}

async fn accounts<A: FinanceApi>(
    command: AccountCommand,
    state: &mut AppState<A>,
    output: &Output,
) -> Result<(), Error> {
    state.require_login()?;
    let result = state.accounts.fetch(&state.api).await;
    state.report_failure(result, "Failed to fetch accounts")?;

    match command {
        AccountCommand::List => {
            output.accounts(state.accounts.accounts(), state.accounts.total_balance())
        }
        AccountCommand::Add {
            name,
            balance,
            color,
        } => {
            let draft = AccountDraft {
                name,
                balance,
                color,
            };
            let new_account = state.report_failure(draft.validate(), "")?;

            let result = state.accounts.create(&state.api, &new_account).await;
            state
                .report(
                    result,
                    Notice::success(
                        "Account Added",
                        format!("{} has been added to your accounts.", new_account.name),
                    ),
                    "Failed to create account",
                )
                .map(|_| ())
        }
        AccountCommand::Edit {
            id,
            name,
            balance,
            color,
        } => {
            let id = AccountId::new(id);
            let existing = state.report_failure(
                state
                    .accounts
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| Error::NotFound(Some("Account not found".to_owned()))),
                "",
            )?;

            let draft = AccountDraft {
                name: name.unwrap_or(existing.name),
                balance: balance.unwrap_or_else(|| existing.balance.to_string()),
                color: color.unwrap_or(existing.color),
            };
            let updated = state.report_failure(draft.validate(), "")?;

            let result = state.accounts.update(&state.api, &id, &updated).await;
            state
                .report(
                    result,
                    Notice::success(
                        "Account Updated",
                        format!("{} has been updated.", updated.name),
                    ),
                    "Failed to update account",
                )
                .map(|_| ())
        }
        AccountCommand::Delete { id } => {
            let result = state.accounts.delete(&state.api, &AccountId::new(id)).await;
            state.report(
                result,
                Notice::success("Account Deleted", "The account has been removed."),
                "Failed to delete account",
            )
        }
    }
}

async fn categories<A: FinanceApi>(
    command: CategoryCommand,
    state: &mut AppState<A>,
    output: &Output,
) -> Result<(), Error> {
    state.require_login()?;
    let result = state.categories.fetch(&state.api).await;
    state.report_failure(result, "Failed to fetch categories")?;

    match command {
        CategoryCommand::List { kind } => {
            let listed = match kind {
                Some(kind) => state.categories.of_kind(kind),
                None => state.categories.categories().iter().collect(),
            };
            output.categories(&listed)
        }
        CategoryCommand::Add { name, kind, color } => {
            let draft = CategoryDraft { name, kind, color };
            let new_category = state.report_failure(draft.validate(), "")?;

            let result = state.categories.create(&state.api, &new_category).await;
            state
                .report(
                    result,
                    Notice::success(
                        "Category Added",
                        format!("{} has been added to your categories.", new_category.name),
                    ),
                    "Failed to create category",
                )
                .map(|_| ())
        }
        CategoryCommand::Edit {
            id,
            name,
            kind,
            color,
        } => {
            let id = CategoryId::new(id);
            let existing = state.report_failure(
                state
                    .categories
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| Error::NotFound(Some("Category not found".to_owned()))),
                "",
            )?;

            let draft = CategoryDraft {
                name: name.unwrap_or(existing.name),
                kind: kind.unwrap_or(existing.kind),
                color: color.unwrap_or(existing.color),
            };
            let updated = state.report_failure(draft.validate(), "")?;

            let result = state.categories.update(&state.api, &id, &updated).await;
            state
                .report(
                    result,
                    Notice::success(
                        "Category Updated",
                        format!("{} has been updated.", updated.name),
                    ),
                    "Failed to update category",
                )
                .map(|_| ())
        }
        CategoryCommand::Delete { id } => {
            let result = state
                .categories
                .delete(&state.api, &CategoryId::new(id))
                .await;
            state.report(
                result,
                Notice::success("Category Deleted", "The category has been removed."),
                "Failed to delete category",
            )
        }
    }
}

/// Read one line from stdin. Returns `None` at end of input.
fn prompt_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    if let Err(error) = io::stdout().flush() {
        tracing::warn!("Could not flush stdout: {error}");
    }

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_owned()),
        Err(error) => {
            crate::print_error(format!("could not read from stdin: {error}"));
            None
        }
    }
}

/// Read a password without echoing it. Returns `None` at end of input.
fn prompt_password(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Some(password),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            crate::print_error(format!("could not read password from stdin: {error}"));
            None
        }
    }
}

/// Prompt for a new password until one meets the requirements and is entered
/// the same way twice.
fn get_new_password() -> Option<String> {
    loop {
        println!();

        let first_password = prompt_password("Enter a new password: ")?;
        let second_password = prompt_password("Enter the same password again: ")?;

        match validate_new_password(&first_password, &second_password) {
            Ok(()) => return Some(first_password),
            Err(error) => {
                crate::print_error(format!("{error}, try again."));
            }
        }
    }
}
