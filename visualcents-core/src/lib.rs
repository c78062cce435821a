//! visualcents-core: domain types and calendar arithmetic for VisualCents

pub mod asset;
pub mod budget;
pub mod calendar;
pub mod category;
pub mod error;
pub mod savings;
pub mod transaction;

pub use asset::{Asset, AssetType};
pub use budget::{Budget, BudgetPeriod};
pub use calendar::Calendar;
pub use category::Category;
pub use error::{Error, Result};
pub use savings::{GoalStatus, SavingsGoal};
pub use transaction::{Transaction, TransactionSource};
