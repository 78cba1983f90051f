use serde::{Deserialize, Serialize};

/// Totals over every transaction the user has recorded.
///
/// The server provides this via the summary endpoint, and it can also be
/// computed locally with [crate::aggregation::compute_financial_summary].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// Income minus expenses.
    pub net_balance: f64,
}

impl FinancialSummary {
    /// The share of income that was not spent, as a percentage.
    ///
    /// Zero when there is no income.
    pub fn savings_rate(&self) -> f64 {
        if self.total_income > 0.0 {
            (self.total_income - self.total_expense) / self.total_income * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FinancialSummary;

    #[test]
    fn savings_rate_is_share_of_income_kept() {
        let summary = FinancialSummary {
            total_income: 200.0,
            total_expense: 150.0,
            net_balance: 50.0,
        };

        assert_eq!(summary.savings_rate(), 25.0);
    }

    #[test]
    fn savings_rate_is_zero_without_income() {
        let summary = FinancialSummary {
            total_income: 0.0,
            total_expense: 150.0,
            net_balance: -150.0,
        };

        assert_eq!(summary.savings_rate(), 0.0);
    }

    #[test]
    fn deserializes_camel_case_with_missing_fields() {
        let summary: FinancialSummary =
            serde_json::from_str(r#"{"totalIncome": 100, "totalExpense": 40}"#).unwrap();

        assert_eq!(summary.total_income, 100.0);
        assert_eq!(summary.total_expense, 40.0);
        assert_eq!(summary.net_balance, 0.0);
    }
}
