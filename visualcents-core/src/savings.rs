//! Savings goals with progress tracking

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Cancelled,
}

/// A target amount the user is saving towards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub id: String,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub status: GoalStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SavingsGoal {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        target_amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target_amount,
            current_amount: Decimal::ZERO,
            deadline: None,
            status: GoalStatus::Active,
            notes: None,
            created_at,
            completed_at: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Saved fraction of the target, clamped to 0.0 - 1.0
    pub fn progress(&self) -> f64 {
        if self.target_amount <= Decimal::ZERO {
            return 0.0;
        }
        (self.current_amount / self.target_amount)
            .to_f64()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }

    /// Amount still to save, never negative
    pub fn remaining(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    /// Whole days from `today` until the deadline (0 once it has passed).
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        let deadline = self.deadline?;
        Some((deadline - today).num_days().max(0))
    }

    /// Amount to put aside per day to hit the deadline.
    pub fn daily_savings_needed(&self, today: NaiveDate) -> Option<Decimal> {
        let days = self.days_remaining(today)?;
        if days <= 0 {
            return None;
        }
        Some(self.remaining() / Decimal::from(days))
    }

    /// Add money to the goal; reaching the target completes it.
    pub fn deposit(&mut self, amount: Decimal, now: DateTime<Utc>) {
        self.current_amount += amount;
        if self.current_amount >= self.target_amount && self.status != GoalStatus::Completed {
            self.status = GoalStatus::Completed;
            self.completed_at = Some(now);
        }
    }
}
