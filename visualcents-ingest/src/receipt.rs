//! Receipt field extraction from raw OCR text.
//!
//! Chinese mobile-payment screenshots usually read:
//!   星巴克（国贸店）
//!   ¥32.00
//!   支付时间 2024-01-15 09:30
//!
//! Extraction is best-effort. Each field is searched by an ordered list of
//! rules; the earliest rule in the list that matches wins, even if a later
//! rule would match earlier in the text.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use visualcents_core::Calendar;

use crate::expression::parse_amount;
use crate::types::ExtractedReceipt;

type ParseFn<T> = fn(&Captures<'_>, NaiveDate) -> Option<T>;

/// A pattern paired with the parser for its captures.
struct Rule<T> {
    name: &'static str,
    re: Regex,
    parse: ParseFn<T>,
}

impl<T> Rule<T> {
    fn new(name: &'static str, pattern: &str, parse: ParseFn<T>) -> Result<Self> {
        Ok(Self {
            name,
            re: Regex::new(pattern)?,
            parse,
        })
    }
}

const NUMBER: &str = r"([0-9]+\.?[0-9]*)";

fn amount_rules() -> Result<Vec<Rule<Decimal>>> {
    let labeled = |label: &str| format!(r"{label}[：:]?\s*{NUMBER}");
    Ok(vec![
        Rule::new("yen-sign", &format!("¥{NUMBER}"), parse_amount_capture)?,
        Rule::new("fullwidth-yen-sign", &format!("￥{NUMBER}"), parse_amount_capture)?,
        Rule::new("金额", &labeled("金额"), parse_amount_capture)?,
        Rule::new("合计", &labeled("合计"), parse_amount_capture)?,
        Rule::new("总计", &labeled("总计"), parse_amount_capture)?,
        Rule::new("实付", &labeled("实付"), parse_amount_capture)?,
    ])
}

fn date_rules() -> Result<Vec<Rule<NaiveDate>>> {
    Ok(vec![
        Rule::new(
            "year-month-day",
            r"([0-9]{4})([-/])([0-9]{1,2})([-/])([0-9]{1,2})",
            parse_ymd,
        )?,
        Rule::new("month-day", r"([0-9]{1,2})月([0-9]{1,2})日", parse_month_day)?,
    ])
}

fn parse_amount_capture(caps: &Captures<'_>, _today: NaiveDate) -> Option<Decimal> {
    parse_amount(&caps[1])
}

fn parse_ymd(caps: &Captures<'_>, _today: NaiveDate) -> Option<NaiveDate> {
    // 2024-01/15 is not a date
    if caps[2] != caps[4] {
        return None;
    }
    let y: i32 = caps[1].parse().ok()?;
    let m: u32 = caps[3].parse().ok()?;
    let d: u32 = caps[5].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// `3月5日` carries no year; it is read as a date in the current year.
fn parse_month_day(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let m: u32 = caps[1].parse().ok()?;
    let d: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), m, d)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Extracts merchant, amount and date from OCR text.
pub struct ReceiptExtractor {
    calendar: Calendar,
    amount_rules: Vec<Rule<Decimal>>,
    date_rules: Vec<Rule<NaiveDate>>,
}

impl ReceiptExtractor {
    /// Compile the rule tables; year inference uses the default calendar.
    pub fn new() -> Result<Self> {
        Self::with_calendar(Calendar::default())
    }

    pub fn with_calendar(calendar: Calendar) -> Result<Self> {
        Ok(Self {
            calendar,
            amount_rules: amount_rules()?,
            date_rules: date_rules()?,
        })
    }

    /// Extract receipt fields, resolving year-less dates against today.
    pub fn extract(&self, raw_text: &str) -> ExtractedReceipt {
        self.extract_on(raw_text, self.calendar.today())
    }

    /// Extract receipt fields with an explicit "today".
    pub fn extract_on(&self, raw_text: &str, today: NaiveDate) -> ExtractedReceipt {
        ExtractedReceipt {
            merchant_name: merchant_name(raw_text),
            amount: self.amount(raw_text, today),
            date: self.date(raw_text, today),
            raw_text: raw_text.to_string(),
        }
    }

    /// The first rule that matches decides; a bad capture leaves the amount empty.
    fn amount(&self, text: &str, today: NaiveDate) -> Option<Decimal> {
        let (rule, caps) = self
            .amount_rules
            .iter()
            .find_map(|rule| rule.re.captures(text).map(|caps| (rule, caps)))?;

        let value = (rule.parse)(&caps, today);
        match value {
            Some(v) => debug!("amount {v} matched rule {}", rule.name),
            None => warn!("amount rule {} matched '{}' but it did not parse", rule.name, &caps[0]),
        }
        value
    }

    /// Unlike amounts, an unparseable date falls through to the next rule.
    fn date(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        self.date_rules.iter().find_map(|rule| {
            let caps = rule.re.captures(text)?;
            let value = (rule.parse)(&caps, today);
            match value {
                Some(d) => debug!("date {d} matched rule {}", rule.name),
                None => debug!("date rule {} matched '{}' but it is not a valid date", rule.name, &caps[0]),
            }
            value
        })
    }
}

/// First non-empty line, verbatim.
fn merchant_name(text: &str) -> Option<String> {
    text.split(is_line_break)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn extract(text: &str) -> ExtractedReceipt {
        ReceiptExtractor::new().unwrap().extract_on(text, today())
    }

    #[test]
    fn test_basic_payment_screenshot() {
        let r = extract("星巴克\n¥32.00\n2024-01-15");
        assert_eq!(r.merchant_name.as_deref(), Some("星巴克"));
        assert_eq!(r.amount, Some(dec!(32.00)));
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(r.raw_text, "星巴克\n¥32.00\n2024-01-15");
    }

    #[test]
    fn test_merchant_skips_blank_lines() {
        let r = extract("\r\n\n  瑞幸咖啡\n实付 18");
        assert_eq!(r.merchant_name.as_deref(), Some("  瑞幸咖啡"));
        assert_eq!(extract("").merchant_name, None);
        assert_eq!(extract("\n\n").merchant_name, None);
    }

    #[test]
    fn test_rule_order_beats_text_position() {
        let r = extract("¥10 合计:20");
        assert_eq!(r.amount, Some(dec!(10)));

        // 合计 appears first in the text, the yen sign still wins
        let r = extract("合计:20 ¥10");
        assert_eq!(r.amount, Some(dec!(10)));

        // 金额 outranks 实付
        let r = extract("实付：15.5\n金额：18");
        assert_eq!(r.amount, Some(dec!(18)));
    }

    #[test]
    fn test_leftmost_match_within_rule() {
        let r = extract("￥5.00 优惠 ￥2.00");
        assert_eq!(r.amount, Some(dec!(5.00)));
    }

    #[test]
    fn test_labeled_amounts() {
        assert_eq!(extract("总计：128.80").amount, Some(dec!(128.80)));
        assert_eq!(extract("实付 66").amount, Some(dec!(66)));
        assert_eq!(extract("合计99.").amount, Some(dec!(99)));
    }

    #[test]
    fn test_amount_absent() {
        let r = extract("no amount here");
        assert_eq!(r.amount, None);
        assert_eq!(r.date, None);
    }

    #[test]
    fn test_slash_date_and_month_day() {
        assert_eq!(extract("2024/03/05").date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(extract("2024-3-5").date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(extract("消费 3月5日").date, NaiveDate::from_ymd_opt(2025, 3, 5));
    }

    #[test]
    fn test_invalid_date_falls_through() {
        // 2024-13-40 is not a date; the month/day rule still gets a chance
        let r = extract("2024-13-40 12月24日");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 12, 24));

        // mixed separators are not a date
        assert_eq!(extract("2024-01/15").date, None);
        assert_eq!(extract("2月30日").date, None);
    }

    #[test]
    fn test_month_day_uses_current_year() {
        use chrono::Datelike;
        let extractor = ReceiptExtractor::with_calendar(Calendar::utc()).unwrap();
        let r = extractor.extract("3月5日");
        let year = Calendar::utc().today().year();
        assert_eq!(r.date, NaiveDate::from_ymd_opt(year, 3, 5));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = ReceiptExtractor::new().unwrap();
        let text = "美团外卖\n合计：45.60\n1月8日";
        assert_eq!(extractor.extract_on(text, today()), extractor.extract_on(text, today()));
    }
}
