//! Calendar utilities: timezone- and week-start-aware day, week, month and
//! year boundaries.
//!
//! Every bucketing decision goes through a [`Calendar`] value instead of the
//! process-local timezone, so results are reproducible across machines.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::budget::BudgetPeriod;
use crate::error::{Error, Result};

/// Timezone plus first day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
    week_start: Weekday,
}

impl Default for Calendar {
    /// Asia/Shanghai with weeks starting on Monday.
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Shanghai, Weekday::Mon)
    }
}

impl Calendar {
    pub fn new(tz: Tz, week_start: Weekday) -> Self {
        Self { tz, week_start }
    }

    /// UTC with Monday weeks.
    pub fn utc() -> Self {
        Self::new(chrono_tz::UTC, Weekday::Mon)
    }

    /// Build a calendar from an IANA zone name ("Asia/Shanghai") and a
    /// weekday name ("monday", "sun").
    pub fn from_names(tz: &str, week_start: &str) -> Result<Self> {
        let zone: Tz = tz
            .trim()
            .parse()
            .map_err(|_| Error::InvalidTimezone(tz.to_string()))?;
        let weekday: Weekday = week_start
            .trim()
            .parse()
            .map_err(|_| Error::invalid(format!("unknown weekday: {week_start}")))?;
        Ok(Self::new(zone, weekday))
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Calendar date of `instant` in this calendar's timezone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// First valid local instant of `date`, as UTC.
    ///
    /// Zones that skip midnight on a DST change start the day at the first
    /// wall-clock time that exists.
    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        for step in 0..96 {
            let candidate = midnight + Duration::minutes(15 * step);
            if let Some(local) = self.tz.from_local_datetime(&candidate).earliest() {
                return local.with_timezone(&Utc);
            }
        }
        midnight.and_utc()
    }

    /// Start-of-day instant for the local day containing `instant`.
    pub fn start_of_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.day_start(self.local_date(instant))
    }

    /// First date of the week containing `date`. Clamps to
    /// `NaiveDate::MIN` when that week starts before the representable range.
    pub fn week_start_date(&self, date: NaiveDate) -> NaiveDate {
        let offset = (date.weekday().num_days_from_monday() + 7
            - self.week_start.num_days_from_monday())
            % 7;
        date.checked_sub_signed(Duration::days(offset.into()))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn month_start_date(&self, date: NaiveDate) -> NaiveDate {
        date - Duration::days(date.day0().into())
    }

    pub fn year_start_date(&self, date: NaiveDate) -> NaiveDate {
        date - Duration::days(date.ordinal0().into())
    }

    /// Number of days in `month` of `year`, or `None` when the pair does not
    /// name a representable month.
    pub fn days_in_month(&self, year: i32, month: u32) -> Option<u32> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        u32::try_from((next - first).num_days()).ok()
    }

    fn period_first_date(&self, period: BudgetPeriod, date: NaiveDate) -> NaiveDate {
        match period {
            BudgetPeriod::Weekly => self.week_start_date(date),
            BudgetPeriod::Monthly => self.month_start_date(date),
            BudgetPeriod::Yearly => self.year_start_date(date),
        }
    }

    /// Start instant of the budget period of type `period` that contains `now`.
    pub fn period_start(&self, period: BudgetPeriod, now: DateTime<Utc>) -> DateTime<Utc> {
        self.day_start(self.period_first_date(period, self.local_date(now)))
    }

    /// Today's date in this calendar.
    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }
}
