//! Operation type: one append-only ledger entry on an investment.

use crate::domain::{Decimal, TimeMs};
use serde::{Deserialize, Serialize};

/// Kind of ledger operation.
///
/// `Dividend` doubles as DeFi yield, bond interest, or mining reward
/// depending on the investment kind that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Buy,
    Sell,
    Dividend,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Buy => "buy",
            OperationKind::Sell => "sell",
            OperationKind::Dividend => "dividend",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(OperationKind::Buy),
            "sell" => Some(OperationKind::Sell),
            "dividend" => Some(OperationKind::Dividend),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger operation.
///
/// Operations keep the order they were appended in; the cost-basis reducer is
/// order-dependent and never re-sorts by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub date: TimeMs,
    pub kind: OperationKind,
    /// Units bought or sold; ignored for dividends.
    pub quantity: Decimal,
    /// Unit price at operation time; ignored for dividends.
    pub price: Decimal,
    /// Non-negative; loads the cost basis on buys, informational on sells.
    pub fees: Decimal,
    /// Stored cash total; the single source of truth for the cost reducer.
    pub total: Decimal,
    #[serde(default)]
    pub note: String,
    /// Stable key for operations created from an imported transaction, used
    /// to make re-linking idempotent. None for manual entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_key: Option<String>,
}

impl Operation {
    /// Build an operation from user-supplied fields, deriving the canonical
    /// total: `quantity * price + fees`.
    pub fn from_parts(
        date: TimeMs,
        kind: OperationKind,
        quantity: Decimal,
        price: Decimal,
        fees: Decimal,
        note: String,
    ) -> Self {
        Operation {
            date,
            kind,
            quantity,
            price,
            fees,
            total: quantity * price + fees,
            note,
            import_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(serde_json::to_string(&OperationKind::Buy).unwrap(), "\"buy\"");
        assert_eq!(
            serde_json::to_string(&OperationKind::Dividend).unwrap(),
            "\"dividend\""
        );
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [OperationKind::Buy, OperationKind::Sell, OperationKind::Dividend] {
            assert_eq!(OperationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(OperationKind::parse("transfer"), None);
    }

    #[test]
    fn test_from_parts_derives_total_with_fees() {
        let op = Operation::from_parts(
            TimeMs::new(0),
            OperationKind::Buy,
            dec("10"),
            dec("100"),
            dec("2.5"),
            String::new(),
        );
        assert_eq!(op.total, dec("1002.5"));
    }

    #[test]
    fn test_operation_json_roundtrip() {
        let op = Operation::from_parts(
            TimeMs::new(1000),
            OperationKind::Sell,
            dec("5"),
            dec("150"),
            Decimal::ZERO,
            "partial exit".to_string(),
        );
        let json = serde_json::to_string(&op).unwrap();
        let back: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, back);
    }
}
