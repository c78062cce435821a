//! Budget progress: how much of a limit the current period has used.

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use visualcents_core::{Budget, BudgetPeriod, Calendar, Transaction};

/// Snapshot of a budget at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub period: BudgetPeriod,
    pub period_start: DateTime<Utc>,
    pub limit: Decimal,
    pub spent: Decimal,
    /// Never negative
    pub remaining: Decimal,
    /// spent / limit, not clamped; 0 when the limit is not positive
    pub progress: f64,
    pub warning_threshold: f64,
}

impl BudgetStatus {
    /// Progress clamped to 0..=1 for gauges.
    pub fn display_progress(&self) -> f64 {
        self.progress.clamp(0.0, 1.0)
    }

    pub fn is_over_limit(&self) -> bool {
        self.spent > self.limit
    }

    pub fn is_warning(&self) -> bool {
        self.progress >= self.warning_threshold
    }
}

/// Sum of expenses at or after `since`, optionally restricted to one
/// category. Saturates instead of overflowing.
pub fn spent_since(transactions: &[Transaction], since: DateTime<Utc>, category_id: Option<&str>) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.is_expense && t.date >= since)
        .filter(|t| match category_id {
            Some(id) => t.category_id.as_deref() == Some(id),
            None => true,
        })
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

/// spent / limit; falls back to float division when the decimal quotient
/// does not fit.
fn ratio(spent: Decimal, limit: Decimal) -> f64 {
    if limit <= Decimal::ZERO {
        return 0.0;
    }
    spent
        .checked_div(limit)
        .and_then(|r| r.to_f64())
        .or_else(|| Some(spent.to_f64()? / limit.to_f64()?))
        .unwrap_or(f64::INFINITY)
}

fn status_for(
    period: BudgetPeriod,
    period_start: DateTime<Utc>,
    limit: Decimal,
    spent: Decimal,
    warning_threshold: f64,
) -> BudgetStatus {
    BudgetStatus {
        period,
        period_start,
        limit,
        spent,
        remaining: limit.saturating_sub(spent).max(Decimal::ZERO),
        progress: ratio(spent, limit),
        warning_threshold,
    }
}

/// Evaluates budgets against a transaction list in one calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetTracker {
    calendar: Calendar,
}

impl BudgetTracker {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn status(&self, budget: &Budget, transactions: &[Transaction]) -> BudgetStatus {
        self.status_at(budget, transactions, Utc::now())
    }

    /// Budget status for the period containing `now`.
    pub fn status_at(&self, budget: &Budget, transactions: &[Transaction], now: DateTime<Utc>) -> BudgetStatus {
        let period_start = self.calendar.period_start(budget.period, now);
        let spent = spent_since(transactions, period_start, budget.category_id.as_deref());
        let status = status_for(
            budget.period,
            period_start,
            budget.limit_amount,
            spent,
            budget.warning_threshold,
        );
        debug!(
            "budget {}: spent {} of {} since {}",
            budget.id, status.spent, status.limit, period_start
        );
        status
    }

    /// Combined view over several budgets: limits are summed and spending is
    /// counted once, over the monthly period and across all categories.
    ///
    /// `None` when `budgets` is empty.
    pub fn overall_status_at(
        &self,
        budgets: &[Budget],
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Option<BudgetStatus> {
        if budgets.is_empty() {
            return None;
        }
        let period_start = self.calendar.period_start(BudgetPeriod::Monthly, now);
        let limit = budgets
            .iter()
            .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.limit_amount));
        let spent = spent_since(transactions, period_start, None);
        let threshold = budgets
            .iter()
            .map(|b| b.warning_threshold)
            .fold(f64::INFINITY, f64::min);
        Some(status_for(BudgetPeriod::Monthly, period_start, limit, spent, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn expense(id: &str, amount: Decimal, when: DateTime<Utc>) -> Transaction {
        Transaction::new(id, amount, "shop", when).unwrap()
    }

    #[test]
    fn test_monthly_progress() {
        let tracker = BudgetTracker::new(Calendar::utc());
        let txns = vec![
            expense("old", dec!(999), at(2024, 2, 28)),
            expense("a", dec!(300), at(2024, 3, 2)),
            expense("b", dec!(200), at(2024, 3, 10)),
            expense("pay", dec!(5000), at(2024, 3, 5)).income(),
        ];
        let budget = Budget::new("m", dec!(1000), BudgetPeriod::Monthly);
        let status = tracker.status_at(&budget, &txns, at(2024, 3, 15));

        assert_eq!(status.period_start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(status.spent, dec!(500));
        assert_eq!(status.remaining, dec!(500));
        assert!((status.progress - 0.5).abs() < 1e-9);
        assert!(!status.is_warning());
        assert!(!status.is_over_limit());
    }

    #[test]
    fn test_later_expenses_count_toward_current_period() {
        let tracker = BudgetTracker::new(Calendar::utc());
        let txns = vec![
            expense("a", dec!(100), at(2024, 3, 2)),
            expense("b", dec!(700), at(2024, 4, 1)),
        ];
        let budget = Budget::new("m", dec!(1000), BudgetPeriod::Monthly);
        let status = tracker.status_at(&budget, &txns, at(2024, 3, 15));
        assert_eq!(status.spent, dec!(800));
        assert_eq!(status.remaining, dec!(200));
    }

    #[test]
    fn test_huge_spend_against_tiny_limit() {
        let tracker = BudgetTracker::new(Calendar::utc());
        let txns = vec![expense("a", dec!(1000000000000000000000000000), at(2024, 3, 2))];
        let budget = Budget::new("tiny", dec!(0.001), BudgetPeriod::Monthly);
        let status = tracker.status_at(&budget, &txns, at(2024, 3, 15));
        assert!(status.progress > 1e29);
        assert!(status.is_over_limit());
        assert_eq!(status.remaining, dec!(0));
        assert_eq!(status.display_progress(), 1.0);
    }

    #[test]
    fn test_spent_saturates() {
        let txns = vec![
            expense("a", Decimal::MAX, at(2024, 3, 2)),
            expense("b", Decimal::MAX, at(2024, 3, 3)),
        ];
        assert_eq!(spent_since(&txns, at(2024, 3, 1), None), Decimal::MAX);
    }

    #[test]
    fn test_overspent_progress_is_not_clamped() {
        let tracker = BudgetTracker::new(Calendar::utc());
        let txns = vec![expense("a", dec!(1200), at(2024, 3, 2))];
        let budget = Budget::new("m", dec!(1000), BudgetPeriod::Monthly);
        let status = tracker.status_at(&budget, &txns, at(2024, 3, 15));

        assert_eq!(status.remaining, dec!(0));
        assert!((status.progress - 1.2).abs() < 1e-9);
        assert_eq!(status.display_progress(), 1.0);
        assert!(status.is_over_limit());
        assert!(status.is_warning());
    }

    #[test]
    fn test_zero_limit_has_zero_progress() {
        let tracker = BudgetTracker::new(Calendar::utc());
        let txns = vec![expense("a", dec!(10), at(2024, 3, 2))];
        let budget = Budget::new("z", dec!(0), BudgetPeriod::Monthly);
        let status = tracker.status_at(&budget, &txns, at(2024, 3, 15));
        assert_eq!(status.progress, 0.0);
        assert_eq!(status.remaining, dec!(0));
    }

    #[test]
    fn test_weekly_and_category_scope() {
        let tracker = BudgetTracker::new(Calendar::utc());
        // 2024-03-13 is a Wednesday; the week starts Monday the 11th
        let txns = vec![
            expense("sun", dec!(50), at(2024, 3, 10)).with_category("food"),
            expense("mon", dec!(20), at(2024, 3, 11)).with_category("food"),
            expense("tue", dec!(30), at(2024, 3, 12)).with_category("transport"),
        ];
        let weekly = Budget::new("w", dec!(100), BudgetPeriod::Weekly);
        assert_eq!(tracker.status_at(&weekly, &txns, at(2024, 3, 13)).spent, dec!(50));

        let food = Budget::new("f", dec!(100), BudgetPeriod::Weekly).for_category("food");
        assert_eq!(tracker.status_at(&food, &txns, at(2024, 3, 13)).spent, dec!(20));
    }

    #[test]
    fn test_warning_threshold() {
        let tracker = BudgetTracker::new(Calendar::utc());
        let txns = vec![expense("a", dec!(80), at(2024, 3, 2))];
        let budget = Budget::new("m", dec!(100), BudgetPeriod::Monthly);
        assert!(tracker.status_at(&budget, &txns, at(2024, 3, 3)).is_warning());

        let lenient = budget.with_warning_threshold(0.9);
        assert!(!tracker.status_at(&lenient, &txns, at(2024, 3, 3)).is_warning());
    }

    #[test]
    fn test_overall_status() {
        let tracker = BudgetTracker::new(Calendar::utc());
        let txns = vec![expense("a", dec!(150), at(2024, 3, 2)).with_category("food")];
        let budgets = vec![
            Budget::new("food", dec!(100), BudgetPeriod::Monthly).for_category("food"),
            Budget::new("fun", dec!(200), BudgetPeriod::Monthly).with_warning_threshold(0.4),
        ];
        let overall = tracker.overall_status_at(&budgets, &txns, at(2024, 3, 3)).unwrap();
        assert_eq!(overall.limit, dec!(300));
        assert_eq!(overall.spent, dec!(150));
        assert!((overall.warning_threshold - 0.4).abs() < 1e-9);
        assert!(overall.is_warning());
        assert!(tracker.overall_status_at(&[], &txns, at(2024, 3, 3)).is_none());
    }
}
