//! Plain-text views printed by the CLI.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use visualcents_core::{Calendar, Transaction};
use visualcents_finance::{
    BudgetStatus, CategoryShare, MonthData, PeriodBucket, PeriodSummary, SpendingTrend, TrendDirection,
};
use visualcents_ingest::ExtractedReceipt;

fn money(amount: Decimal) -> String {
    format!("¥{:.2}", amount)
}

/// Each line newline-terminated.
fn join_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|l| l + "\n").collect()
}

fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "一",
        chrono::Weekday::Tue => "二",
        chrono::Weekday::Wed => "三",
        chrono::Weekday::Thu => "四",
        chrono::Weekday::Fri => "五",
        chrono::Weekday::Sat => "六",
        chrono::Weekday::Sun => "日",
    }
}

pub fn receipt(r: &ExtractedReceipt) -> String {
    let dash = || "-".to_string();
    let mut out = vec![
        format!("Merchant: {}", r.merchant_name.clone().unwrap_or_else(dash)),
        format!("Amount:   {}", r.amount.map(money).unwrap_or_else(dash)),
        format!("Date:     {}", r.date.map(|d| d.to_string()).unwrap_or_else(dash)),
    ];
    let missing = r.missing_fields();
    if !missing.is_empty() {
        out.push(format!("Missing:  {:?}", missing));
    }
    join_lines(out)
}

/// Days with activity, one line each, then the month totals.
pub fn month(m: &MonthData) -> String {
    let mut out = vec![m.label()];
    for day in m.days.iter().filter(|d| d.has_transactions()) {
        out.push(format!(
            "{} ({})  expense {:>10}  income {:>10}  [{}]",
            day.date,
            weekday_label(day.date),
            money(day.total_expense()),
            money(day.total_income()),
            day.transactions.len()
        ));
    }
    out.push(format!(
        "Total: expense {}  income {}  balance {}",
        money(m.total_expense()),
        money(m.total_income()),
        money(m.balance())
    ));
    join_lines(out)
}

fn transaction_line(calendar: &Calendar, t: &Transaction) -> String {
    let local = t.date.with_timezone(&calendar.tz());
    let sign = if t.is_expense { "-" } else { "+" };
    format!(
        "  {}  {}{:<10}  {}",
        local.format("%H:%M"),
        sign,
        money(t.amount),
        t.merchant_name
    )
}

pub fn timeline(calendar: &Calendar, buckets: &[PeriodBucket]) -> String {
    let mut out = Vec::new();
    for bucket in buckets {
        out.push(format!(
            "{} ({})  net {}",
            bucket.date,
            weekday_label(bucket.date),
            money(bucket.net())
        ));
        out.extend(bucket.transactions.iter().map(|t| transaction_line(calendar, t)));
    }
    join_lines(out)
}

pub fn week(dates: &[NaiveDate; 7], today: NaiveDate) -> String {
    join_lines(
        dates
            .iter()
            .map(|d| {
                let marker = if *d == today { " *" } else { "" };
                format!("{} {}{}", weekday_label(*d), d, marker)
            })
            .collect(),
    )
}

pub fn budget(status: &BudgetStatus) -> String {
    const WIDTH: usize = 20;
    let filled = (status.display_progress() * WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled), ".".repeat(WIDTH - filled));
    let mut out = vec![
        format!("{} budget since {}", status.period, status.period_start.format("%Y-%m-%d")),
        format!("[{bar}] {:.0}%", status.progress * 100.0),
        format!(
            "spent {} of {}, remaining {}",
            money(status.spent),
            money(status.limit),
            money(status.remaining)
        ),
    ];
    if status.is_over_limit() {
        out.push("Over budget".to_string());
    } else if status.is_warning() {
        out.push("Approaching limit".to_string());
    }
    join_lines(out)
}

pub fn stats(
    summary: &PeriodSummary,
    breakdown: &[CategoryShare],
    trend: &SpendingTrend,
    trend_days: u32,
) -> String {
    let mut out = vec![format!(
        "Income {}  Expense {}  Balance {}  ({} transactions)",
        money(summary.total_income),
        money(summary.total_expense),
        money(summary.balance),
        summary.count
    )];
    out.extend(breakdown.iter().map(|share| {
        format!(
            "  {:<16} {:>10}  {:>5.1}%",
            share.category,
            money(share.amount),
            share.share * 100.0
        )
    }));
    let arrow = match trend.direction {
        TrendDirection::Up => "up",
        TrendDirection::Down => "down",
        TrendDirection::Stable => "stable",
    };
    out.push(format!(
        "Last {} days: {} total, {} per day, trend {}",
        trend_days,
        money(trend.total),
        money(trend.average_daily.round_dp(2)),
        arrow
    ));
    join_lines(out)
}
