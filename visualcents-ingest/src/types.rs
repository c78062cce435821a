use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use visualcents_core::{Calendar, Error, Result, Transaction, TransactionSource};

/// Best-effort fields pulled out of OCR text. Any field may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedReceipt {
    pub merchant_name: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    /// Input text, unmodified
    pub raw_text: String,
}

/// Receipt field a caller may need to ask the user for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptField {
    MerchantName,
    Amount,
    Date,
}

impl ExtractedReceipt {
    /// Fields extraction could not fill, in display order.
    pub fn missing_fields(&self) -> Vec<ReceiptField> {
        let mut out = Vec::new();
        if self.merchant_name.is_none() {
            out.push(ReceiptField::MerchantName);
        }
        if self.amount.is_none() {
            out.push(ReceiptField::Amount);
        }
        if self.date.is_none() {
            out.push(ReceiptField::Date);
        }
        out
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Build an OCR-sourced expense from the extracted fields.
    ///
    /// The amount is required. A missing date falls back to `now`; a found
    /// date is placed at the start of that day in `calendar`.
    pub fn to_transaction(
        &self,
        id: impl Into<String>,
        calendar: &Calendar,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        let amount = self
            .amount
            .ok_or_else(|| Error::invalid("receipt has no amount"))?;
        let date = self.date.map(|d| calendar.day_start(d)).unwrap_or(now);
        let merchant = self.merchant_name.clone().unwrap_or_default();
        Ok(Transaction::new(id, amount, merchant, date)?.with_source(TransactionSource::Ocr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn receipt() -> ExtractedReceipt {
        ExtractedReceipt {
            merchant_name: Some("星巴克".to_string()),
            amount: Some(dec!(32.00)),
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            raw_text: "星巴克\n¥32.00\n2024-01-15".to_string(),
        }
    }

    #[test]
    fn test_missing_fields() {
        assert!(receipt().is_complete());
        let partial = ExtractedReceipt {
            amount: None,
            date: None,
            ..receipt()
        };
        assert_eq!(partial.missing_fields(), vec![ReceiptField::Amount, ReceiptField::Date]);
    }

    #[test]
    fn test_to_transaction() {
        let cal = Calendar::default();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let txn = receipt().to_transaction("ocr-1", &cal, now).unwrap();
        assert_eq!(txn.source, TransactionSource::Ocr);
        assert!(txn.is_expense);
        assert_eq!(txn.merchant_name, "星巴克");
        assert_eq!(cal.local_date(txn.date), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let no_amount = ExtractedReceipt { amount: None, ..receipt() };
        assert!(no_amount.to_transaction("ocr-2", &cal, now).is_err());
    }
}
