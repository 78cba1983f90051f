use crate::models::{FinancialSummary, Transaction, TransactionKind};

/// Sums all income and expenses, the local counterpart of the server's
/// summary endpoint.
pub fn compute_financial_summary(transactions: &[Transaction]) -> FinancialSummary {
    let (total_income, total_expense) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expense), transaction| match transaction.kind {
                TransactionKind::Income => (income + transaction.amount, expense),
                TransactionKind::Expense => (income, expense + transaction.amount),
            });

    FinancialSummary {
        total_income,
        total_expense,
        net_balance: total_income - total_expense,
    }
}
