use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::investments::parse_investment_id;
use crate::api::AppState;
use crate::config::SellPolicy;
use crate::domain::{
    Decimal, Investment, InvestmentId, LinkedTransaction, Operation, OperationKind, TimeMs,
};
use crate::engine::average_unit_cost;
use crate::error::AppError;
use crate::ingest::operation_from_transaction;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub date: i64,
    pub kind: OperationKind,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub fees: Decimal,
    #[serde(default)]
    pub note: String,
}

impl OperationRequest {
    fn into_operation(self) -> Result<Operation, AppError> {
        if self.quantity.is_negative() || self.price.is_negative() || self.fees.is_negative() {
            return Err(AppError::BadRequest(
                "quantity, price and fees must be non-negative".to_string(),
            ));
        }

        Ok(Operation::from_parts(
            TimeMs::new(self.date),
            self.kind,
            self.quantity,
            self.price,
            self.fees,
            self.note,
        ))
    }
}

pub async fn append_operation(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<OperationRequest>,
) -> Result<Json<Investment>, AppError> {
    let id = parse_investment_id(&id)?;
    let investment = fetch_investment(&state, &id).await?;
    let op = req.into_operation()?;

    enforce_sell_policy(&state, &investment, &op)?;

    state.repo.append_operation(&id, &op).await?;
    let updated = recompute_holdings(&state, &id).await?;
    Ok(Json(updated))
}

pub async fn update_operation(
    Path((id, index)): Path<(String, i64)>,
    State(state): State<AppState>,
    Json(req): Json<OperationRequest>,
) -> Result<Json<Investment>, AppError> {
    let id = parse_investment_id(&id)?;
    let investment = fetch_investment(&state, &id).await?;
    let op = req.into_operation()?;

    if index < 0 {
        return Err(AppError::BadRequest(
            "operation index must be non-negative".to_string(),
        ));
    }

    // The replaced operation no longer counts toward the held quantity.
    if state.config.sell_policy == SellPolicy::Reject && op.kind == OperationKind::Sell {
        let mut held = investment.held_quantity();
        if let Some(old) = investment.operations.get(index as usize) {
            match old.kind {
                OperationKind::Buy => held -= old.quantity,
                OperationKind::Sell => held += old.quantity,
                OperationKind::Dividend => {}
            }
        }
        if op.quantity > held {
            return Err(AppError::BadRequest(
                "sell quantity exceeds held quantity".to_string(),
            ));
        }
    }

    let replaced = state.repo.update_operation(&id, index, &op).await?;
    if !replaced {
        return Err(AppError::NotFound(format!(
            "Operation {} not found",
            index
        )));
    }

    let updated = recompute_holdings(&state, &id).await?;
    Ok(Json(updated))
}

pub async fn delete_operation(
    Path((id, index)): Path<(String, i64)>,
    State(state): State<AppState>,
) -> Result<Json<Investment>, AppError> {
    let id = parse_investment_id(&id)?;
    fetch_investment(&state, &id).await?;

    if index < 0 {
        return Err(AppError::BadRequest(
            "operation index must be non-negative".to_string(),
        ));
    }

    let removed = state.repo.delete_operation(&id, index).await?;
    if !removed {
        return Err(AppError::NotFound(format!(
            "Operation {} not found",
            index
        )));
    }

    let updated = recompute_holdings(&state, &id).await?;
    Ok(Json(updated))
}

/// Link a cash transaction to an investment as a synthetic operation.
///
/// Re-linking the same transaction is a no-op; the response reports whether
/// anything was appended. The sell policy is not applied here since a linked
/// transaction records a cash flow that already happened.
pub async fn link_transaction(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(txn): Json<LinkedTransaction>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_investment_id(&id)?;
    fetch_investment(&state, &id).await?;

    let op = operation_from_transaction(&txn);
    let linked = state.repo.append_operation(&id, &op).await?;
    let updated = recompute_holdings(&state, &id).await?;

    Ok(Json(serde_json::json!({
        "linked": linked,
        "investment": updated,
    })))
}

async fn fetch_investment(
    state: &AppState,
    id: &InvestmentId,
) -> Result<Investment, AppError> {
    state
        .repo
        .get_investment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Investment {} not found", id)))
}

fn enforce_sell_policy(
    state: &AppState,
    investment: &Investment,
    op: &Operation,
) -> Result<(), AppError> {
    if state.config.sell_policy == SellPolicy::Reject
        && op.kind == OperationKind::Sell
        && op.quantity > investment.held_quantity()
    {
        return Err(AppError::BadRequest(
            "sell quantity exceeds held quantity".to_string(),
        ));
    }
    Ok(())
}

/// Refresh the denormalized holdings columns from the operation history and
/// return the investment as stored.
async fn recompute_holdings(
    state: &AppState,
    id: &InvestmentId,
) -> Result<Investment, AppError> {
    let mut investment = fetch_investment(state, id).await?;

    let quantity = investment.held_quantity();
    let average_price = average_unit_cost(&investment.operations);
    let current_price = if investment.current_price.is_zero() {
        average_price
    } else {
        investment.current_price
    };

    state
        .repo
        .update_holdings(id, quantity, average_price, current_price)
        .await?;

    investment.quantity = quantity;
    investment.average_price = average_price;
    investment.current_price = current_price;
    Ok(investment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_quantity_rejected() {
        let req = OperationRequest {
            date: 0,
            kind: OperationKind::Buy,
            quantity: Decimal::from(-1),
            price: Decimal::from(10),
            fees: Decimal::ZERO,
            note: String::new(),
        };
        assert!(req.into_operation().is_err());
    }

    #[test]
    fn test_total_derived_from_parts() {
        let req = OperationRequest {
            date: 0,
            kind: OperationKind::Buy,
            quantity: Decimal::from(3),
            price: Decimal::from(10),
            fees: Decimal::from(2),
            note: String::new(),
        };
        let op = req.into_operation().unwrap();
        assert_eq!(op.total, Decimal::from(32));
    }
}
