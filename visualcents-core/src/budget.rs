//! Budget definitions: a spending limit over a recurring period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Recurring window a budget is measured against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn display_name(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "Weekly",
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(BudgetPeriod::Weekly),
            "monthly" | "month" => Ok(BudgetPeriod::Monthly),
            "yearly" | "year" => Ok(BudgetPeriod::Yearly),
            other => Err(Error::invalid(format!("unknown budget period: {other}"))),
        }
    }
}

/// A spending limit, optionally scoped to one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: String,
    pub limit_amount: Decimal,
    pub period: BudgetPeriod,
    pub notifications_enabled: bool,
    /// Fraction of the limit (0.0 - 1.0) at which to warn
    pub warning_threshold: f64,
    pub category_id: Option<String>,
}

impl Budget {
    pub fn new(id: impl Into<String>, limit_amount: Decimal, period: BudgetPeriod) -> Self {
        Self {
            id: id.into(),
            limit_amount,
            period,
            notifications_enabled: true,
            warning_threshold: 0.8,
            category_id: None,
        }
    }

    pub fn for_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_warning_threshold(mut self, threshold: f64) -> Self {
        self.warning_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_period_parse_and_display() {
        assert_eq!("weekly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Weekly);
        assert_eq!(" Month ".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Monthly);
        assert_eq!(BudgetPeriod::Yearly.to_string(), "yearly");
        assert!("daily".parse::<BudgetPeriod>().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_budget_defaults() {
        let b = Budget::new("b-1", dec!(1000), BudgetPeriod::Monthly).for_category("food");
        assert!(b.notifications_enabled);
        assert_eq!(b.warning_threshold, 0.8);
        assert_eq!(b.category_id.as_deref(), Some("food"));
        assert_eq!(b.clone().with_warning_threshold(1.5).warning_threshold, 1.0);
    }
}
