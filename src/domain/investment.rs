//! Investment entity and its kind taxonomy.

use crate::domain::{Decimal, InvestmentId, Operation, OperationKind, TimeMs};
use serde::{Deserialize, Serialize};

/// The eight supported investment kinds.
///
/// Unit-based kinds (`Stock`, `Crypto`, `Etf`, `Bond`, and nominally
/// `Commodity`) price per unit; for `TradingAccount`, `RealEstate`, and
/// `Commodity` the `current_price` field is overloaded to mean the current
/// total value and `quantity` carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    Stock,
    Crypto,
    Etf,
    Bond,
    TradingAccount,
    RealEstate,
    Commodity,
    MiningRig,
}

impl InvestmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentKind::Stock => "stock",
            InvestmentKind::Crypto => "crypto",
            InvestmentKind::Etf => "etf",
            InvestmentKind::Bond => "bond",
            InvestmentKind::TradingAccount => "trading_account",
            InvestmentKind::RealEstate => "real_estate",
            InvestmentKind::Commodity => "commodity",
            InvestmentKind::MiningRig => "mining_rig",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stock" => Some(InvestmentKind::Stock),
            "crypto" => Some(InvestmentKind::Crypto),
            "etf" => Some(InvestmentKind::Etf),
            "bond" => Some(InvestmentKind::Bond),
            "trading_account" => Some(InvestmentKind::TradingAccount),
            "real_estate" => Some(InvestmentKind::RealEstate),
            "commodity" => Some(InvestmentKind::Commodity),
            "mining_rig" => Some(InvestmentKind::MiningRig),
            _ => None,
        }
    }

    /// Kinds valued as a whole rather than per unit. Their supplementary
    /// metrics fall back to `initial_value` when no operations exist.
    pub fn is_value_based(&self) -> bool {
        matches!(
            self,
            InvestmentKind::TradingAccount
                | InvestmentKind::RealEstate
                | InvestmentKind::Commodity
                | InvestmentKind::MiningRig
        )
    }
}

impl std::fmt::Display for InvestmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An investment with its ordered operation history.
///
/// Numeric fields that are optional on the wire deserialize to zero, so the
/// engines never see a missing value (the leniency required by the source
/// system is applied once, at this boundary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: InvestmentId,
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    pub kind: InvestmentKind,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub average_price: Decimal,
    #[serde(default)]
    pub current_price: Decimal,
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Only meaningful for real estate, commodities, mining rigs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<TimeMs>,
    /// Starting balance / acquisition value for value-based kinds.
    #[serde(default)]
    pub initial_value: Decimal,
    /// Recurring upkeep for real estate, commodities, mining rigs.
    #[serde(default)]
    pub monthly_costs: Decimal,
    /// Annual depreciation percentage for commodities.
    #[serde(default)]
    pub depreciation_rate: Decimal,
    pub created_at: TimeMs,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Investment {
    /// Net held units implied by the operation history: buys minus sells.
    pub fn held_quantity(&self) -> Decimal {
        let mut held = Decimal::ZERO;
        for op in &self.operations {
            match op.kind {
                OperationKind::Buy => held += op.quantity,
                OperationKind::Sell => held -= op.quantity,
                OperationKind::Dividend => {}
            }
        }
        held
    }

    /// Sum of dividend-kind operation totals (dividends, yields, interest,
    /// mining rewards depending on the investment kind).
    pub fn distribution_total(&self) -> Decimal {
        self.operations
            .iter()
            .filter(|op| op.kind == OperationKind::Dividend)
            .map(|op| op.total)
            .sum()
    }
}
