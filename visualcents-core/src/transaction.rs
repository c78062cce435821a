//! Transaction records: a single expense or income entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A logged expense or income.
///
/// `amount` is always non-negative; direction lives in `is_expense`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Unique identifier for this record
    pub id: String,
    pub amount: Decimal,
    /// Merchant or payer ("Starbucks", "Salary")
    pub merchant_name: String,
    /// Instant the transaction happened
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    /// true = outflow, false = inflow
    pub is_expense: bool,
    pub source: TransactionSource,
    pub category_id: Option<String>,
    /// Account/wallet the money moved through
    pub asset_id: Option<String>,
}

/// How the transaction was created
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TransactionSource {
    #[default]
    #[serde(rename = "manual")]
    Manual,
    #[serde(rename = "ocr")]
    Ocr,
    #[serde(rename = "imported")]
    Imported,
}

impl TransactionSource {
    pub fn display_name(&self) -> &'static str {
        match self {
            TransactionSource::Manual => "Manual",
            TransactionSource::Ocr => "Screenshot",
            TransactionSource::Imported => "Imported",
        }
    }
}

impl Transaction {
    /// Create a manual expense. Negative amounts are rejected.
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        merchant_name: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<Self> {
        if amount < Decimal::ZERO {
            return Err(Error::invalid(format!(
                "transaction amount must be non-negative, got {amount}"
            )));
        }
        Ok(Self {
            id: id.into(),
            amount,
            merchant_name: merchant_name.into(),
            date,
            notes: None,
            is_expense: true,
            source: TransactionSource::Manual,
            category_id: None,
            asset_id: None,
        })
    }

    /// Mark as income (inflow)
    pub fn income(mut self) -> Self {
        self.is_expense = false;
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_source(mut self, source: TransactionSource) -> Self {
        self.source = source;
        self
    }

    /// Negative for expenses, positive for income
    pub fn signed_amount(&self) -> Decimal {
        if self.is_expense { -self.amount } else { self.amount }
    }

    pub fn is_income(&self) -> bool {
        !self.is_expense
    }
}
