//! Best-effort parser for bank-statement text (PDF extraction output or
//! pasted lines). Produces candidate transactions for the user to review;
//! nothing here is authoritative.

use crate::domain::Decimal;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// dd/mm/yy or dd/mm/yyyy, also with `-` or `.` separators.
    static ref DATE_RE: Regex = Regex::new(r"(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2,4})").unwrap();
    /// Monetary amount with two decimals, comma or dot.
    static ref AMOUNT_RE: Regex = Regex::new(r"-?\d+[.,]\d{2}").unwrap();
}

/// Lines at or below this length are noise (page headers, column rules).
const MIN_LINE_LEN: usize = 10;

/// One candidate transaction recovered from a statement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    pub raw_line: String,
    /// ISO date (yyyy-mm-dd) when a date was recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub description: String,
    /// First negative amount on the line, zero if none.
    pub debit: Decimal,
    /// First positive amount on the line, zero if none.
    pub credit: Decimal,
    /// First amount on the line; the usual transaction amount column.
    pub amount: Decimal,
    /// Last amount on the line; usually the running balance column.
    pub balance: Decimal,
    /// Stable key over the raw line, for downstream dedup.
    pub import_key: String,
}

/// Parse a whole statement text: one candidate per sufficiently long line.
pub fn parse_statement(text: &str) -> Vec<ParsedTransaction> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.len() > MIN_LINE_LEN)
        .map(parse_line)
        .collect()
}

/// Parse a single statement line into a candidate transaction.
pub fn parse_line(line: &str) -> ParsedTransaction {
    let date_match = DATE_RE.captures(line);

    let date = date_match.as_ref().map(|caps| {
        let day = &caps[1];
        let month = &caps[2];
        let year = &caps[3];
        let full_year = if year.len() == 2 {
            format!("20{}", year)
        } else {
            year.to_string()
        };
        format!("{}-{:0>2}-{:0>2}", full_year, month, day)
    });

    // Description is what follows the date; amounts are stripped from it.
    let mut description = match date_match.as_ref().and_then(|caps| caps.get(0)) {
        Some(m) => line[m.end()..].trim().to_string(),
        None => line.to_string(),
    };

    let mut amounts = Vec::new();
    for m in AMOUNT_RE.find_iter(line) {
        description = description.replace(m.as_str(), "");
        if let Ok(value) = Decimal::from_str_canonical(&m.as_str().replace(',', ".")) {
            amounts.push(value);
        }
    }
    let description = description.trim().to_string();

    let first = amounts.first().copied().unwrap_or(Decimal::ZERO);
    let last = amounts.last().copied().unwrap_or(Decimal::ZERO);
    let debit = amounts
        .iter()
        .copied()
        .find(Decimal::is_negative)
        .unwrap_or(Decimal::ZERO);
    let credit = amounts
        .iter()
        .copied()
        .find(Decimal::is_positive)
        .unwrap_or(Decimal::ZERO);

    ParsedTransaction {
        import_key: line_key(line),
        raw_line: line.to_string(),
        date,
        description: if description.is_empty() {
            "Transaction".to_string()
        } else {
            description
        },
        debit,
        credit,
        amount: first,
        balance: last,
    }
}

fn line_key(line: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(line.as_bytes());
    let hash = hasher.finalize();
    format!("line:{}", hex::encode(&hash[..16]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parses_date_amount_and_balance() {
        let parsed = parse_line("12/03/2024 CARD PAYMENT GROCERY -45,80 1250,00");
        assert_eq!(parsed.date.as_deref(), Some("2024-03-12"));
        assert_eq!(parsed.description, "CARD PAYMENT GROCERY");
        assert_eq!(parsed.amount, dec("-45.80"));
        assert_eq!(parsed.debit, dec("-45.80"));
        assert_eq!(parsed.credit, dec("1250.00"));
        assert_eq!(parsed.balance, dec("1250.00"));
    }

    #[test]
    fn test_two_digit_year_expands_to_2000s() {
        let parsed = parse_line("05/07/23 TRANSFER RECEIVED 300,00");
        assert_eq!(parsed.date.as_deref(), Some("2023-07-05"));
        assert_eq!(parsed.credit, dec("300"));
        assert_eq!(parsed.debit, Decimal::ZERO);
    }

    #[test]
    fn test_dash_separated_date_and_dot_decimal() {
        let parsed = parse_line("1-2-2024 SUBSCRIPTION FEE -9.99");
        assert_eq!(parsed.date.as_deref(), Some("2024-02-01"));
        assert_eq!(parsed.amount, dec("-9.99"));
        assert_eq!(parsed.balance, dec("-9.99"));
    }

    #[test]
    fn test_line_without_date_keeps_full_description() {
        let parsed = parse_line("MONTHLY ACCOUNT FEE -2,50");
        assert_eq!(parsed.date, None);
        assert_eq!(parsed.description, "MONTHLY ACCOUNT FEE");
        assert_eq!(parsed.amount, dec("-2.50"));
    }

    #[test]
    fn test_line_without_amounts_defaults_to_zero() {
        let parsed = parse_line("STATEMENT PERIOD MARCH");
        assert_eq!(parsed.amount, Decimal::ZERO);
        assert_eq!(parsed.balance, Decimal::ZERO);
        assert_eq!(parsed.debit, Decimal::ZERO);
        assert_eq!(parsed.credit, Decimal::ZERO);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let text = "HEADER\n12/03/2024 CARD PAYMENT GROCERY -45,80\nP. 1/2\n";
        let parsed = parse_statement(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].date.as_deref(), Some("2024-03-12"));
    }

    #[test]
    fn test_import_key_stable_per_line() {
        let a = parse_line("12/03/2024 CARD PAYMENT -45,80");
        let b = parse_line("12/03/2024 CARD PAYMENT -45,80");
        let c = parse_line("12/03/2024 CARD PAYMENT -45,81");
        assert_eq!(a.import_key, b.import_key);
        assert_ne!(a.import_key, c.import_key);
        assert!(a.import_key.starts_with("line:"));
    }
}
