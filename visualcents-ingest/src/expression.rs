//! Keypad amount entry: decimal literals and a running `+`/`-` expression.
//!
//! The keypad lets users type `12.5+7.5-5` and commit the sum; evaluation
//! never fails, unparseable pieces are dropped.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a plain decimal literal ("32", "32.50", "32.", "-4", ".5").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s == "-" {
        return None;
    }
    let normalized = match s.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{rest}"),
        _ if s.starts_with('.') => format!("0{s}"),
        _ => s.to_string(),
    };
    Decimal::from_str(&normalized).ok()
}

/// Evaluate a left-to-right `+`/`-` expression of decimal literals.
///
/// Trailing operators and dots are ignored; an empty expression is 0. A sign
/// at the start, or directly after another operator, belongs to the number.
pub fn evaluate(expr: &str) -> Decimal {
    let expr = expr.trim().trim_end_matches(['+', '-', '.']);
    if expr.is_empty() {
        return Decimal::ZERO;
    }

    let mut result = Decimal::ZERO;
    let mut current = String::new();
    let mut op = '+';
    let mut prev: Option<char> = None;

    for c in expr.chars() {
        let is_op = c == '+' || c == '-';
        let starts_number = prev.is_none() || matches!(prev, Some('+') | Some('-'));
        if is_op && !starts_number {
            apply(&mut result, op, &current);
            current.clear();
            op = c;
        } else {
            current.push(c);
        }
        prev = Some(c);
    }
    apply(&mut result, op, &current);

    result
}

fn apply(result: &mut Decimal, op: char, literal: &str) {
    if let Some(n) = parse_amount(literal) {
        if op == '-' {
            *result -= n;
        } else {
            *result += n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("32.00"), Some(dec!(32.00)));
        assert_eq!(parse_amount("32."), Some(dec!(32)));
        assert_eq!(parse_amount(".5"), Some(dec!(0.5)));
        assert_eq!(parse_amount("-4"), Some(dec!(-4)));
        assert_eq!(parse_amount("+4"), Some(dec!(4)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_evaluate_sum() {
        assert_eq!(evaluate("12.5+7.5-5"), dec!(15));
        assert_eq!(evaluate("100"), dec!(100));
    }

    #[test]
    fn test_evaluate_trailing_operator_and_empty() {
        assert_eq!(evaluate(""), dec!(0));
        assert_eq!(evaluate("3+"), dec!(3));
        assert_eq!(evaluate("3.-"), dec!(3));
        assert_eq!(evaluate("-"), dec!(0));
    }

    #[test]
    fn test_evaluate_leading_and_double_sign() {
        assert_eq!(evaluate("-5+2"), dec!(-3));
        // the second '-' signs the literal
        assert_eq!(evaluate("10--2"), dec!(12));
        assert_eq!(evaluate("10+-2"), dec!(8));
    }
}
