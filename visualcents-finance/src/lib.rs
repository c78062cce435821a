//! visualcents-finance: day/month/week aggregation, budget progress,
//! statistics and net worth

pub mod aggregator;
pub mod budget;
pub mod net_worth;
pub mod statistics;

pub use aggregator::{MonthData, PeriodAggregator, PeriodBucket};
pub use budget::{BudgetStatus, BudgetTracker, spent_since};
pub use net_worth::NetWorth;
pub use statistics::{
    CategoryShare, DailySpending, PeriodSummary, SpendingTrend, StatsPeriod, TrendDirection,
    category_breakdown, daily_spending, filter_period,
};
