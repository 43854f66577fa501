//! Pure computation engines: cost basis / metrics, and growth projection.

use crate::domain::Decimal;
use serde::Serialize;

pub mod cost_basis;
pub mod projection;

pub use cost_basis::{average_unit_cost, compute_metrics, CostAccumulator};
pub use projection::{project, yearly_samples, ProjectionParams, ProjectionPoint};

/// Metrics computed for every investment regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMetrics {
    /// Average unit cost (PRU) of the current position.
    pub unit_cost: Decimal,
    pub current_value: Decimal,
    pub cost_basis: Decimal,
    pub gain: Decimal,
    pub gain_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMetrics {
    #[serde(flatten)]
    pub base: BaseMetrics,
    pub dividends: Decimal,
    pub total_return: Decimal,
    pub total_return_pct: Decimal,
    pub dividend_yield_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoMetrics {
    #[serde(flatten)]
    pub base: BaseMetrics,
    pub defi_yields: Decimal,
    pub total_return: Decimal,
    pub total_return_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfMetrics {
    #[serde(flatten)]
    pub base: BaseMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BondMetrics {
    #[serde(flatten)]
    pub base: BaseMetrics,
    pub interest: Decimal,
    pub total_return: Decimal,
    pub yield_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingAccountMetrics {
    #[serde(flatten)]
    pub base: BaseMetrics,
    pub initial_value: Decimal,
    pub current_balance: Decimal,
    pub trading_gain: Decimal,
    pub trading_gain_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateMetrics {
    #[serde(flatten)]
    pub base: BaseMetrics,
    pub maintenance_costs: Decimal,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityMetrics {
    /// For a non-zero depreciation rate, `base.current_value` and
    /// `base.gain` hold the depreciated view rather than quantity x price.
    #[serde(flatten)]
    pub base: BaseMetrics,
    pub maintenance_costs: Decimal,
    pub total_cost: Decimal,
    pub depreciation: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningRigMetrics {
    #[serde(flatten)]
    pub base: BaseMetrics,
    pub mining_rewards: Decimal,
    pub maintenance_costs: Decimal,
    pub total_cost: Decimal,
    pub net_profit: Decimal,
    pub roi_pct: Decimal,
}

/// Metrics view of an investment, discriminated by kind.
///
/// The `kind` tag on the wire matches the investment kind strings, so a
/// consumer can dispatch on the same value it stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metrics {
    Stock(StockMetrics),
    Crypto(CryptoMetrics),
    Etf(EtfMetrics),
    Bond(BondMetrics),
    TradingAccount(TradingAccountMetrics),
    RealEstate(RealEstateMetrics),
    Commodity(CommodityMetrics),
    MiningRig(MiningRigMetrics),
}

impl Metrics {
    pub fn base(&self) -> &BaseMetrics {
        match self {
            Metrics::Stock(m) => &m.base,
            Metrics::Crypto(m) => &m.base,
            Metrics::Etf(m) => &m.base,
            Metrics::Bond(m) => &m.base,
            Metrics::TradingAccount(m) => &m.base,
            Metrics::RealEstate(m) => &m.base,
            Metrics::Commodity(m) => &m.base,
            Metrics::MiningRig(m) => &m.base,
        }
    }
}
