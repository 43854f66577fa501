//! Compound-growth projection: discrete monthly compounding over a horizon.
//!
//! Runs on plain f64 by design: the simulation is forward-looking display
//! math, not ledger accounting, and its contract is double-precision
//! compounding with no rounding inside the loop.

use serde::{Deserialize, Serialize};

/// Inputs for one projection run. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParams {
    pub initial_amount: f64,
    pub monthly_amount: f64,
    pub years: u32,
    pub annual_return_pct: f64,
}

/// One point of the projected series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month: u32,
    pub total: f64,
    pub invested: f64,
    pub gains: f64,
}

/// Simulate monthly compounding and return the full monthly series,
/// including the month-0 seed point (`years * 12 + 1` points).
///
/// Each month the contribution is added first, then growth is applied to the
/// whole balance, so a contribution compounds once in its own month.
pub fn project(params: &ProjectionParams) -> Vec<ProjectionPoint> {
    let months = params.years * 12;
    let monthly_rate = params.annual_return_pct / 100.0 / 12.0;

    let mut points = Vec::with_capacity(months as usize + 1);
    let mut total = params.initial_amount;
    let mut invested = params.initial_amount;

    points.push(ProjectionPoint {
        month: 0,
        total,
        invested,
        gains: 0.0,
    });

    for month in 1..=months {
        total += params.monthly_amount;
        invested += params.monthly_amount;
        total *= 1.0 + monthly_rate;

        points.push(ProjectionPoint {
            month,
            total,
            invested,
            gains: total - invested,
        });
    }

    points
}

/// Resample a monthly series to yearly points: every 12th index plus the
/// final point. A pure post-filter; the monthly series stays authoritative.
pub fn yearly_samples(points: &[ProjectionPoint]) -> Vec<ProjectionPoint> {
    let last = points.len().saturating_sub(1);
    points
        .iter()
        .enumerate()
        .filter(|(idx, _)| idx % 12 == 0 || *idx == last)
        .map(|(_, p)| *p)
        .collect()
}
