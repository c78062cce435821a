//! Parse exported ledger CSV files into transactions.
//!
//! Expected header (columns after `amount` are optional):
//! date,amount,type,merchant,category,notes
//! 2024-01-15 09:30,32.00,expense,星巴克,food,
//! 2024-01-15,8000,income,Salary,income,January

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use visualcents_core::{Calendar, Transaction, TransactionSource};

use crate::expression::parse_amount;

#[derive(Debug, Deserialize)]
struct LedgerRow {
    date: String,
    amount: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    merchant: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Parse a ledger CSV file. Local times are read in `calendar`'s timezone.
pub fn parse_ledger_csv(path: impl AsRef<Path>, calendar: &Calendar) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_ledger_reader(file, calendar)
        .with_context(|| format!("parsing {}", path.as_ref().display()))
}

/// Parse ledger CSV from any reader. Malformed records and rows whose date,
/// amount or type cannot be read are skipped; only read errors fail.
pub fn parse_ledger_reader<R: Read>(reader: R, calendar: &Calendar) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut txns = Vec::new();

    for (line, result) in rdr.deserialize::<LedgerRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("row {}: skipping malformed record: {}", line + 1, e);
                continue;
            }
        };

        let Some(date) = parse_datetime(&row.date, calendar) else {
            warn!("row {}: skipping unparseable date '{}'", line + 1, row.date);
            continue;
        };

        let Some(raw_amount) = parse_amount(&clean_amount(&row.amount)) else {
            warn!("row {}: skipping unparseable amount '{}'", line + 1, row.amount);
            continue;
        };

        let is_expense = match row.kind.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("") | Some("expense") | Some("支出") => true,
            Some("income") | Some("收入") => false,
            Some(other) => {
                warn!("row {}: skipping unknown type '{}'", line + 1, other);
                continue;
            }
        };
        // A signed amount without a type column still means an outflow
        let is_expense = is_expense || raw_amount < Decimal::ZERO;

        let mut txn = Transaction::new(
            format!("csv-{:04}", txns.len() + 1),
            raw_amount.abs(),
            row.merchant.unwrap_or_default(),
            date,
        )?
        .with_source(TransactionSource::Imported);
        txn.is_expense = is_expense;
        txn.category_id = row.category.filter(|c| !c.is_empty());
        txn.notes = row.notes.filter(|n| !n.is_empty());

        txns.push(txn);
    }

    Ok(txns)
}

fn clean_amount(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ',' | '¥' | '￥' | '$' | ' '))
        .collect()
}

/// RFC 3339, or local `YYYY-MM-DD[ HH:MM[:SS]]` (also with `/`).
pub fn parse_datetime(s: &str, calendar: &Calendar) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return calendar
                .tz()
                .from_local_datetime(&ndt)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(calendar.day_start(date));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const LEDGER: &str = "\
date,amount,type,merchant,category,notes
2024-01-15 09:30,32.00,expense,星巴克,food,
2024-01-15,\"8,000\",income,Salary,income,January
2024-01-16T12:00:00Z,-18.5,,Metro,transport,
not-a-date,10,expense,Broken,,
2024-01-17,abc,expense,Broken,,
2024-01-18,5,refund,Unknown,,
";

    #[test]
    fn test_parse_ledger_rows() {
        let cal = Calendar::default();
        let txns = parse_ledger_reader(LEDGER.as_bytes(), &cal).unwrap();
        assert_eq!(txns.len(), 3);

        let coffee = &txns[0];
        assert_eq!(coffee.id, "csv-0001");
        assert_eq!(coffee.amount, dec!(32.00));
        assert!(coffee.is_expense);
        assert_eq!(coffee.source, TransactionSource::Imported);
        assert_eq!(coffee.category_id.as_deref(), Some("food"));
        assert_eq!(coffee.notes, None);
        // 09:30 Shanghai is 01:30 UTC
        assert_eq!(coffee.date, Utc.with_ymd_and_hms(2024, 1, 15, 1, 30, 0).unwrap());

        let salary = &txns[1];
        assert_eq!(salary.amount, dec!(8000));
        assert!(!salary.is_expense);
        assert_eq!(salary.notes.as_deref(), Some("January"));

        let metro = &txns[2];
        assert_eq!(metro.amount, dec!(18.5));
        assert!(metro.is_expense);
    }

    #[test]
    fn test_truncated_row_is_skipped() {
        let ledger = "\
date,amount,type,merchant,category,notes
2024-01-15 09:30,32.00,expense,星巴克,food,
2024-01-16
2024-01-17 12:00,18.00,expense,面馆,food,
";
        let txns = parse_ledger_reader(ledger.as_bytes(), &Calendar::utc()).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].merchant_name, "星巴克");
        assert_eq!(txns[1].merchant_name, "面馆");
        assert_eq!(txns[1].id, "csv-0002");
    }

    #[test]
    fn test_parse_ledger_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LEDGER.as_bytes()).unwrap();
        let txns = parse_ledger_csv(file.path(), &Calendar::utc()).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[1].date, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(parse_ledger_csv("/nonexistent/ledger.csv", &Calendar::utc()).is_err());
    }

    #[test]
    fn test_parse_datetime_formats() {
        let cal = Calendar::utc();
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 8, 15, 0).unwrap();
        assert_eq!(parse_datetime("2024-03-05 08:15", &cal), Some(expected));
        assert_eq!(parse_datetime("2024/03/05 08:15:00", &cal), Some(expected));
        assert_eq!(parse_datetime("2024-03-05T16:15:00+08:00", &cal), Some(expected));
        assert_eq!(parse_datetime("March 5", &cal), None);
    }
}
