//! Formatting for money, dates and names.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use serde::{Deserialize, Serialize};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::aggregation::month_abbrev;

/// How the digits before the decimal point are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// The last three digits, then pairs: 12,34,567.
    #[default]
    Indian,
    /// Groups of three: 1,234,567.
    Thousands,
}

/// The currency symbol and digit grouping used to display amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// The symbol placed before the amount, e.g. "₹".
    pub symbol: String,
    /// How to group the digits of the whole part.
    pub grouping: DigitGrouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₹".to_owned(),
            grouping: DigitGrouping::Indian,
        }
    }
}

impl CurrencyFormat {
    /// Format `amount` with two decimal places, e.g. "₹1,23,456.78" or
    /// "-₹1,234.00".
    pub fn format(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let magnitude = format!("{:.2}", amount.abs());
        let (whole, fraction) = magnitude.split_once('.').unwrap_or((magnitude.as_str(), "00"));

        let grouped = match self.grouping {
            DigitGrouping::Indian => group_indian(whole),
            DigitGrouping::Thousands => group_thousands(amount.abs(), whole),
        };

        // Amounts that round to zero are unsigned.
        let sign = if grouped == "0" && fraction == "00" {
            ""
        } else {
            sign
        };

        format!("{sign}{}{grouped}.{fraction}", self.symbol)
    }
}

/// Format `amount` in Indian rupees with Indian digit grouping.
pub fn format_currency(amount: f64) -> String {
    static DEFAULT_FORMAT: OnceLock<CurrencyFormat> = OnceLock::new();

    DEFAULT_FORMAT
        .get_or_init(CurrencyFormat::default)
        .format(amount)
}

fn group_indian(whole: &str) -> String {
    if whole.len() <= 3 {
        return whole.to_owned();
    }

    let (head, last_three) = whole.split_at(whole.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;

    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }

    groups.push(rest);
    groups.reverse();
    groups.push(last_three);

    groups.join(",")
}

fn group_thousands(magnitude: f64, whole: &str) -> String {
    static THOUSANDS_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = THOUSANDS_FMT.get_or_init(|| {
        Formatter::currency("")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
    });

    let whole_number = magnitude.trunc();

    // Zero is hardcoded as "0" by numfmt, and very large numbers are scaled,
    // so only hand the formatter numbers it renders verbatim.
    match formatter {
        Some(formatter) if whole_number > 0.0 && whole_number < 1e15 => {
            let formatted = formatter.fmt_string(whole_number);
            let digits: String = formatted.chars().filter(|c| c.is_ascii_digit()).collect();

            if digits == whole {
                formatted.trim().to_owned()
            } else {
                group_by_three(whole)
            }
        }
        _ => group_by_three(whole),
    }
}

fn group_by_three(whole: &str) -> String {
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = whole;

    while rest.len() > 3 {
        let (front, group) = rest.split_at(rest.len() - 3);
        groups.push(group);
        rest = front;
    }

    groups.push(rest);
    groups.reverse();
    groups.join(",")
}

/// Format a date as "Jan 5, 2024".
pub fn format_date(date: Date) -> String {
    format!(
        "{} {}, {}",
        month_abbrev(date.month()),
        date.day(),
        date.year()
    )
}

/// `value` as a percentage of `total`, or zero if `total` is zero.
pub fn calculate_percentage(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        value / total * 100.0
    }
}

/// The uppercase first letter of each word in `name`, e.g. "JD" for
/// "Jane Doe".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.graphemes(true).next())
        .map(str::to_uppercase)
        .collect()
}
