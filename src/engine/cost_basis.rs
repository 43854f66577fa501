//! Running average-cost (PRU) reducer and per-kind metrics computation.
//!
//! Everything here is pure: inputs are read, results are freshly allocated,
//! and no degenerate input raises — division guards resolve to zero.

use crate::domain::{Decimal, Investment, InvestmentKind, Operation, OperationKind, TimeMs};

use super::{
    BaseMetrics, BondMetrics, CommodityMetrics, CryptoMetrics, EtfMetrics, Metrics,
    MiningRigMetrics, RealEstateMetrics, StockMetrics, TradingAccountMetrics,
};

/// Milliseconds in a 365.25-day year, the divisor for fractional
/// years-owned figures.
const MS_PER_YEAR: i64 = 31_557_600_000;

/// Running cost-basis state over an ordered operation sequence.
///
/// Buys add their stored total to the cost and their quantity to the
/// position. Sells remove quantity at the current average cost, which leaves
/// the average of the remaining position unchanged. Dividends are neutral.
///
/// Selling more than is held drives the quantity negative without error;
/// whether that state is ever created is the caller's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CostAccumulator {
    pub total_cost: Decimal,
    pub total_quantity: Decimal,
}

impl CostAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one operation into the running state.
    pub fn apply(&mut self, op: &Operation) {
        match op.kind {
            OperationKind::Buy => {
                self.total_cost += op.total;
                self.total_quantity += op.quantity;
            }
            OperationKind::Sell => {
                let avg_before_sale = self.total_cost.div_or_zero(self.total_quantity);
                self.total_cost -= avg_before_sale * op.quantity;
                self.total_quantity -= op.quantity;
            }
            OperationKind::Dividend => {}
        }
    }

    /// Average unit cost of the current position, zero when nothing is held.
    pub fn average(&self) -> Decimal {
        if self.total_quantity.is_positive() {
            self.total_cost / self.total_quantity
        } else {
            Decimal::ZERO
        }
    }
}

/// Average unit cost (PRU) after folding `operations` in the given order.
pub fn average_unit_cost(operations: &[Operation]) -> Decimal {
    let mut acc = CostAccumulator::new();
    for op in operations {
        acc.apply(op);
    }
    acc.average()
}

/// Fractional years between `purchase_date` and `as_of`, 365.25-day years.
/// Zero when the purchase date is unset.
fn years_owned(purchase_date: Option<TimeMs>, as_of: TimeMs) -> Decimal {
    match purchase_date {
        Some(purchased) => {
            let elapsed_ms = as_of.as_i64() - purchased.as_i64();
            Decimal::from(elapsed_ms) / Decimal::from(MS_PER_YEAR)
        }
        None => Decimal::ZERO,
    }
}

/// Compute the metrics view for an investment at the valuation instant
/// `as_of` (passed explicitly so elapsed-time figures are deterministic).
pub fn compute_metrics(investment: &Investment, as_of: TimeMs) -> Metrics {
    let unit_cost = average_unit_cost(&investment.operations);
    let current_value = investment.quantity * investment.current_price;
    let cost_basis = investment.quantity * unit_cost;
    let gain = current_value - cost_basis;

    let base = BaseMetrics {
        unit_cost,
        current_value,
        cost_basis,
        gain,
        gain_pct: gain.pct_of(cost_basis),
    };

    // Value-based kinds with no unit operations anchor their supplementary
    // formulas on the declared initial value instead of an empty cost basis.
    let acquisition_basis = if investment.kind.is_value_based() && cost_basis.is_zero() {
        investment.initial_value
    } else {
        cost_basis
    };

    let owned = years_owned(investment.purchase_date, as_of);
    let twelve = Decimal::from(12);

    match investment.kind {
        InvestmentKind::Stock => {
            let dividends = investment.distribution_total();
            let total_return = base.gain + dividends;
            Metrics::Stock(StockMetrics {
                total_return_pct: total_return.pct_of(cost_basis),
                dividend_yield_pct: dividends.pct_of(cost_basis),
                base,
                dividends,
                total_return,
            })
        }
        InvestmentKind::Crypto => {
            let defi_yields = investment.distribution_total();
            let total_return = base.gain + defi_yields;
            Metrics::Crypto(CryptoMetrics {
                total_return_pct: total_return.pct_of(cost_basis),
                base,
                defi_yields,
                total_return,
            })
        }
        InvestmentKind::Etf => Metrics::Etf(EtfMetrics { base }),
        InvestmentKind::Bond => {
            let interest = investment.distribution_total();
            Metrics::Bond(BondMetrics {
                yield_pct: interest.pct_of(cost_basis),
                base,
                interest,
                // Unrealized gain is deliberately excluded here.
                total_return: interest,
            })
        }
        InvestmentKind::TradingAccount => {
            let initial_value = investment.initial_value;
            let current_balance = investment.current_price;
            let trading_gain = current_balance - initial_value;
            Metrics::TradingAccount(TradingAccountMetrics {
                trading_gain_pct: trading_gain.pct_of(initial_value),
                base,
                initial_value,
                current_balance,
                trading_gain,
            })
        }
        InvestmentKind::RealEstate => {
            let maintenance_costs = investment.monthly_costs * twelve * owned;
            Metrics::RealEstate(RealEstateMetrics {
                total_cost: acquisition_basis + maintenance_costs,
                base,
                maintenance_costs,
            })
        }
        InvestmentKind::Commodity => {
            let maintenance_costs = investment.monthly_costs * twelve * owned;
            let depreciation =
                acquisition_basis * (investment.depreciation_rate / Decimal::from(100)) * owned;
            let mut base = base;
            if !investment.depreciation_rate.is_zero() {
                // Decay replaces the mark-to-market view; gain_pct keeps its
                // pre-overwrite value, as the source system did.
                base.current_value = (acquisition_basis - depreciation).max(Decimal::ZERO);
                base.gain = base.current_value - acquisition_basis;
            }
            Metrics::Commodity(CommodityMetrics {
                total_cost: acquisition_basis + maintenance_costs,
                base,
                maintenance_costs,
                depreciation,
            })
        }
        InvestmentKind::MiningRig => {
            let mining_rewards = investment.distribution_total();
            let maintenance_costs = investment.monthly_costs * twelve * owned;
            let net_profit = mining_rewards - maintenance_costs;
            Metrics::MiningRig(MiningRigMetrics {
                roi_pct: net_profit.pct_of(acquisition_basis),
                total_cost: acquisition_basis + maintenance_costs,
                base,
                mining_rewards,
                maintenance_costs,
                net_profit,
            })
        }
    }
}
