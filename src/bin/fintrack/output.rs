//! Prints command results as plain-text tables or as JSON.

use serde::Serialize;

use fintrack::{
    Error,
    aggregation::{BalancePoint, CategoryShare, IntervalTotals, MonthlyCategorySpending},
    format::{CurrencyFormat, calculate_percentage, format_date, initials},
    models::{Account, Category, FinancialSummary, Transaction},
    notice::{Notice, NoticeKind},
};

/// Where command results go and how they look.
#[derive(Debug, Clone)]
pub struct Output {
    json: bool,
    currency: CurrencyFormat,
}

/// The numbers shown at the top of the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview<'a> {
    pub summary: FinancialSummary,
    pub savings_rate: f64,
    pub total_balance: f64,
    pub accounts: &'a [Account],
    pub recent_transactions: Vec<&'a Transaction>,
    pub expense_breakdown: Vec<CategoryShare>,
}

impl Output {
    pub fn new(json: bool, currency: CurrencyFormat) -> Self {
        Self { json, currency }
    }

    fn money(&self, amount: f64) -> String {
        self.currency.format(amount)
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), Error> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Success notices go to stdout, errors to stderr in red.
    pub fn notice(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success if !self.json => println!("\x1b[32;1m{notice}\x1b[0m"),
            NoticeKind::Success => {}
            NoticeKind::Error => eprintln!("\x1b[31;1m{notice}\x1b[0m"),
        }
    }

    pub fn message(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn overview(&self, overview: &Overview, categories: &[Category]) -> Result<(), Error> {
        if self.json {
            return self.print_json(overview);
        }

        let summary = &overview.summary;
        println!("Net balance     {}", self.money(summary.net_balance));
        println!("Total income    {}", self.money(summary.total_income));
        println!("Total expenses  {}", self.money(summary.total_expense));
        println!("Savings rate    {:.1}%", overview.savings_rate);
        println!();

        self.accounts(overview.accounts, overview.total_balance)?;
        println!();

        println!("Recent transactions");
        self.transactions(&overview.recent_transactions, categories, overview.accounts)?;
        println!();

        println!("Expenses by category");
        self.shares(&overview.expense_breakdown)
    }

    pub fn accounts(&self, accounts: &[Account], total_balance: f64) -> Result<(), Error> {
        if self.json {
            return self.print_json(accounts);
        }

        if accounts.is_empty() {
            println!("No accounts yet.");
            return Ok(());
        }

        println!("{:<4} {:<24} {:<24} {:>16}", "", "ID", "NAME", "BALANCE");
        for account in accounts {
            println!(
                "{:<4} {:<24} {:<24} {:>16}",
                initials(&account.name),
                account.id,
                account.name,
                self.money(account.balance)
            );
        }
        println!("{:<54} {:>16}", "Total", self.money(total_balance));

        Ok(())
    }

    pub fn categories(&self, categories: &[&Category]) -> Result<(), Error> {
        if self.json {
            return self.print_json(categories);
        }

        if categories.is_empty() {
            println!("No categories yet.");
            return Ok(());
        }

        println!("{:<24} {:<24} {:<8} {:<8}", "ID", "NAME", "TYPE", "COLOR");
        for category in categories {
            println!(
                "{:<24} {:<24} {:<8} {:<8}",
                category.id,
                category.name,
                category.kind.label(),
                category.color
            );
        }

        Ok(())
    }

    pub fn transactions(
        &self,
        transactions: &[&Transaction],
        categories: &[Category],
        accounts: &[Account],
    ) -> Result<(), Error> {
        if self.json {
            return self.print_json(transactions);
        }

        if transactions.is_empty() {
            println!("No transactions found.");
            return Ok(());
        }

        println!(
            "{:<24} {:<13} {:<28} {:<16} {:<16} {:>16}",
            "ID", "DATE", "DESCRIPTION", "CATEGORY", "ACCOUNT", "AMOUNT"
        );
        for transaction in transactions {
            let category = transaction
                .category_id
                .as_ref()
                .and_then(|id| categories.iter().find(|category| &category.id == id))
                .map(|category| category.name.as_str())
                .unwrap_or("-");
            let account = transaction
                .account_id
                .as_ref()
                .and_then(|id| accounts.iter().find(|account| &account.id == id))
                .map(|account| account.name.as_str())
                .unwrap_or("-");

            println!(
                "{:<24} {:<13} {:<28} {:<16} {:<16} {:>16}",
                transaction.id,
                format_date(transaction.date),
                transaction.description,
                category,
                account,
                self.money(transaction.signed_amount())
            );
        }

        Ok(())
    }

    pub fn balance_series(&self, series: &[BalancePoint]) -> Result<(), Error> {
        if self.json {
            return self.print_json(series);
        }

        println!(
            "{:<13} {:>16} {:>16} {:>16}",
            "DATE", "INCOME", "EXPENSES", "BALANCE"
        );
        for point in series {
            println!(
                "{:<13} {:>16} {:>16} {:>16}",
                format_date(point.date),
                self.money(point.day_income),
                self.money(point.day_expense),
                self.money(point.cumulative_balance)
            );
        }

        Ok(())
    }

    pub fn interval_series(&self, series: &[IntervalTotals]) -> Result<(), Error> {
        if self.json {
            return self.print_json(series);
        }

        println!(
            "{:<10} {:>16} {:>16} {:>16}",
            "PERIOD", "INCOME", "EXPENSES", "BALANCE"
        );
        for interval in series {
            println!(
                "{:<10} {:>16} {:>16} {:>16}",
                interval.period_label,
                self.money(interval.income),
                self.money(interval.expense),
                self.money(interval.balance)
            );
        }

        Ok(())
    }

    pub fn shares(&self, shares: &[CategoryShare]) -> Result<(), Error> {
        if self.json {
            return self.print_json(shares);
        }

        if shares.is_empty() {
            println!("Nothing to show.");
            return Ok(());
        }

        for share in shares {
            println!(
                "{:<24} {:>16} {:>6.1}%",
                share.name,
                self.money(share.total),
                share.percentage
            );
        }

        Ok(())
    }

    pub fn category_spending(
        &self,
        series: &[MonthlyCategorySpending],
        categories: &[Category],
    ) -> Result<(), Error> {
        if self.json {
            return self.print_json(series);
        }

        let Some(first) = series.first() else {
            println!("Nothing to show.");
            return Ok(());
        };

        let names: Vec<&str> = first
            .totals
            .iter()
            .map(|entry| {
                categories
                    .iter()
                    .find(|category| category.id == entry.category_id)
                    .map(|category| category.name.as_str())
                    .unwrap_or(fintrack::aggregation::UNKNOWN_CATEGORY_NAME)
            })
            .collect();

        print!("{:<10}", "MONTH");
        for name in &names {
            print!(" {name:>16}");
        }
        println!();

        for month in series {
            let month_total: f64 = month.totals.iter().map(|entry| entry.total).sum();
            print!("{:<10}", month.period_label);
            for entry in &month.totals {
                print!(
                    " {:>10} {:>4.0}%",
                    self.money(entry.total),
                    calculate_percentage(entry.total, month_total)
                );
            }
            println!();
        }

        Ok(())
    }
}
