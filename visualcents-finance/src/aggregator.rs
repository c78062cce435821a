//! Calendar-aligned bucketing of transactions: per-day groups, the filled
//! month grid, the activity timeline and week strips.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use visualcents_core::{Calendar, Error, Result, Transaction};

/// Transactions falling within one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    /// First instant of the day in the aggregator's calendar
    pub period_start: DateTime<Utc>,
    /// The local calendar date
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
}

impl PeriodBucket {
    pub fn total_expense(&self) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.is_expense)
            .map(|t| t.amount)
            .sum()
    }

    pub fn total_income(&self) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| !t.is_expense)
            .map(|t| t.amount)
            .sum()
    }

    /// Income minus expense
    pub fn net(&self) -> Decimal {
        self.total_income() - self.total_expense()
    }

    pub fn has_transactions(&self) -> bool {
        !self.transactions.is_empty()
    }
}

/// One bucket per day of a calendar month, in day order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthData {
    pub year: i32,
    pub month: u32,
    pub days: Vec<PeriodBucket>,
}

impl MonthData {
    pub fn total_expense(&self) -> Decimal {
        self.days.iter().map(PeriodBucket::total_expense).sum()
    }

    pub fn total_income(&self) -> Decimal {
        self.days.iter().map(PeriodBucket::total_income).sum()
    }

    pub fn balance(&self) -> Decimal {
        self.total_income() - self.total_expense()
    }

    /// "2024年3月"
    pub fn label(&self) -> String {
        format!("{}年{}月", self.year, self.month)
    }

    pub fn transaction_count(&self) -> usize {
        self.days.iter().map(|d| d.transactions.len()).sum()
    }
}

/// Groups transactions into day buckets using an explicit [`Calendar`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodAggregator {
    calendar: Calendar,
}

impl PeriodAggregator {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Partition by start-of-day instant. Input order is kept within a day.
    pub fn group_by_day(&self, transactions: &[Transaction]) -> BTreeMap<DateTime<Utc>, Vec<Transaction>> {
        let mut grouped: BTreeMap<DateTime<Utc>, Vec<Transaction>> = BTreeMap::new();
        for txn in transactions {
            grouped
                .entry(self.calendar.start_of_day(txn.date))
                .or_default()
                .push(txn.clone());
        }
        grouped
    }

    /// The filled grid for `month` of `year`: every day is present, empty
    /// days included, ascending.
    ///
    /// A month outside 1..=12 (or a year chrono cannot represent) is an
    /// `InvalidArgument` error.
    pub fn month_data(&self, year: i32, month: u32, transactions: &[Transaction]) -> Result<MonthData> {
        let days_in_month = self
            .calendar
            .days_in_month(year, month)
            .ok_or_else(|| Error::invalid(format!("no such month: {year}-{month}")))?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::invalid(format!("no such month: {year}-{month}")))?;

        let in_month: Vec<Transaction> = transactions
            .iter()
            .filter(|t| {
                let d = self.calendar.local_date(t.date);
                d.year() == year && d.month() == month
            })
            .cloned()
            .collect();
        let mut grouped = self.group_by_day(&in_month);

        let days: Vec<PeriodBucket> = first
            .iter_days()
            .take(days_in_month as usize)
            .map(|date| {
                let period_start = self.calendar.day_start(date);
                PeriodBucket {
                    period_start,
                    date,
                    transactions: grouped.remove(&period_start).unwrap_or_default(),
                }
            })
            .collect();

        debug!(
            "month {year}-{month:02}: {} transactions over {} days",
            in_month.len(),
            days.len()
        );

        Ok(MonthData { year, month, days })
    }

    /// Days that have activity, most recent first; within a day the newest
    /// transaction comes first.
    pub fn timeline(&self, transactions: &[Transaction]) -> Vec<PeriodBucket> {
        self.group_by_day(transactions)
            .into_iter()
            .rev()
            .map(|(period_start, mut txns)| {
                txns.sort_by(|a, b| b.date.cmp(&a.date));
                PeriodBucket {
                    period_start,
                    date: self.calendar.local_date(period_start),
                    transactions: txns,
                }
            })
            .collect()
    }

    /// The seven dates of the week containing `anchor`, from the calendar's
    /// first weekday. Dates past the end of the representable range repeat
    /// `NaiveDate::MAX`.
    pub fn week_dates(&self, anchor: NaiveDate) -> [NaiveDate; 7] {
        let start = self.calendar.week_start_date(anchor);
        let mut days = start.iter_days();
        std::array::from_fn(|_| days.next().unwrap_or(NaiveDate::MAX))
    }

    pub fn week_dates_of(&self, instant: DateTime<Utc>) -> [NaiveDate; 7] {
        self.week_dates(self.calendar.local_date(instant))
    }

    /// Transactions on one local date (the selected-day list).
    pub fn transactions_on(&self, date: NaiveDate, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.calendar.local_date(t.date) == date)
            .cloned()
            .collect()
    }
}
