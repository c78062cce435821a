//! Reporting over a transaction list: period filters, income/expense
//! summaries, category breakdown, and daily spending with its trend.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use visualcents_core::{Calendar, Category, Error, Transaction};

/// Label used for expenses without a known category.
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Day,
    #[default]
    Month,
    Year,
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatsPeriod::Day => "day",
            StatsPeriod::Month => "month",
            StatsPeriod::Year => "year",
        })
    }
}

impl FromStr for StatsPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(StatsPeriod::Day),
            "month" | "monthly" => Ok(StatsPeriod::Month),
            "year" | "yearly" => Ok(StatsPeriod::Year),
            other => Err(Error::invalid(format!("unknown stats period: {other}"))),
        }
    }
}

/// Transactions in the same day, month or year as `selected`.
pub fn filter_period<'a>(
    calendar: &Calendar,
    period: StatsPeriod,
    selected: NaiveDate,
    transactions: &'a [Transaction],
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| {
            let d = calendar.local_date(t.date);
            match period {
                StatsPeriod::Day => d == selected,
                StatsPeriod::Month => d.year() == selected.year() && d.month() == selected.month(),
                StatsPeriod::Year => d.year() == selected.year(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub count: usize,
}

impl PeriodSummary {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = PeriodSummary::default();
        for t in transactions {
            if t.is_expense {
                summary.total_expense += t.amount;
            } else {
                summary.total_income += t.amount;
            }
            summary.count += 1;
        }
        summary.balance = summary.total_income - summary.total_expense;
        summary
    }
}

/// One slice of the spending pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Fraction of all expenses in the breakdown, 0..=1
    pub share: f64,
}

/// Expenses grouped by category name, largest first.
pub fn category_breakdown<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    categories: &[Category],
) -> Vec<CategoryShare> {
    let names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for t in transactions.into_iter().filter(|t| t.is_expense) {
        let name = t
            .category_id
            .as_deref()
            .and_then(|id| names.get(id).copied())
            .unwrap_or(OTHER_CATEGORY);
        *totals.entry(name.to_string()).or_default() += t.amount;
    }

    let grand_total: Decimal = totals.values().copied().sum();
    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| {
            let share = if grand_total > Decimal::ZERO {
                (amount / grand_total).to_f64().unwrap_or(0.0)
            } else {
                0.0
            };
            CategoryShare { category, amount, share }
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    shares
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySpending {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Expense total for each of the `days` days ending on `end`, oldest first.
/// Days without spending are zero. The window is cut short at the start of
/// the representable date range.
pub fn daily_spending(
    calendar: &Calendar,
    transactions: &[Transaction],
    end: NaiveDate,
    days: u32,
) -> Vec<DailySpending> {
    if days == 0 {
        return Vec::new();
    }
    let start = end
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .unwrap_or(NaiveDate::MIN);

    let mut by_date: HashMap<NaiveDate, Decimal> = HashMap::new();
    for t in transactions.iter().filter(|t| t.is_expense) {
        let d = calendar.local_date(t.date);
        if d >= start && d <= end {
            let total = by_date.entry(d).or_default();
            *total = total.saturating_add(t.amount);
        }
    }

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| DailySpending {
            date,
            amount: by_date.get(&date).copied().unwrap_or_default(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpendingTrend {
    pub total: Decimal,
    pub average_daily: Decimal,
    pub direction: TrendDirection,
}

impl SpendingTrend {
    /// Compare the later half of the series against the earlier half; a
    /// swing of more than 10% either way is a trend.
    pub fn from_points(points: &[DailySpending]) -> Self {
        let total: Decimal = points.iter().map(|p| p.amount).sum();
        let average_daily = if points.is_empty() {
            Decimal::ZERO
        } else {
            total / Decimal::from(points.len())
        };

        let half = points.len() / 2;
        let direction = if half == 0 {
            TrendDirection::Stable
        } else {
            let first: Decimal = points[..half].iter().map(|p| p.amount).sum();
            let second: Decimal = points[points.len() - half..].iter().map(|p| p.amount).sum();
            if second > first * Decimal::new(11, 1) {
                TrendDirection::Up
            } else if second < first * Decimal::new(9, 1) {
                TrendDirection::Down
            } else {
                TrendDirection::Stable
            }
        };

        Self {
            total,
            average_daily,
            direction,
        }
    }
}
