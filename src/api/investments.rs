use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{Decimal, Investment, InvestmentId, InvestmentKind, TimeMs};
use crate::error::AppError;
use chrono::Utc;

pub(crate) fn parse_investment_id(input: &str) -> Result<InvestmentId, AppError> {
    InvestmentId::parse(input)
        .map_err(|_| AppError::BadRequest("Invalid investment id".to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentRequest {
    pub name: String,
    pub kind: InvestmentKind,
    #[serde(default)]
    pub symbol: String,
    pub currency: Option<String>,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub average_price: Decimal,
    #[serde(default)]
    pub current_price: Decimal,
    pub purchase_date: Option<i64>,
    #[serde(default)]
    pub initial_value: Decimal,
    #[serde(default)]
    pub monthly_costs: Decimal,
    #[serde(default)]
    pub depreciation_rate: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestmentRequest {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub kind: Option<InvestmentKind>,
    pub currency: Option<String>,
    pub quantity: Option<Decimal>,
    pub average_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
    pub purchase_date: Option<i64>,
    pub initial_value: Option<Decimal>,
    pub monthly_costs: Option<Decimal>,
    pub depreciation_rate: Option<Decimal>,
}

pub async fn create_investment(
    State(state): State<AppState>,
    Json(req): Json<CreateInvestmentRequest>,
) -> Result<Json<Investment>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }

    // A missing market price starts out at the acquisition price.
    let current_price = if req.current_price.is_zero() {
        req.average_price
    } else {
        req.current_price
    };

    let investment = Investment {
        id: InvestmentId::generate(),
        name: req.name,
        symbol: req.symbol,
        kind: req.kind,
        currency: req.currency.unwrap_or_else(|| "EUR".to_string()),
        quantity: req.quantity,
        average_price: req.average_price,
        current_price,
        operations: Vec::new(),
        purchase_date: req.purchase_date.map(TimeMs::new),
        initial_value: req.initial_value,
        monthly_costs: req.monthly_costs,
        depreciation_rate: req.depreciation_rate,
        created_at: TimeMs::from_datetime(Utc::now()),
    };

    state.repo.insert_investment(&investment).await?;
    Ok(Json(investment))
}

pub async fn list_investments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Investment>>, AppError> {
    let investments = state.repo.list_investments().await?;
    Ok(Json(investments))
}

pub async fn get_investment(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Investment>, AppError> {
    let id = parse_investment_id(&id)?;
    let investment = state
        .repo
        .get_investment(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Investment {} not found", id)))?;
    Ok(Json(investment))
}

pub async fn update_investment(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateInvestmentRequest>,
) -> Result<Json<Investment>, AppError> {
    let id = parse_investment_id(&id)?;
    let mut investment = state
        .repo
        .get_investment(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Investment {} not found", id)))?;

    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        investment.name = name;
    }
    if let Some(symbol) = req.symbol {
        investment.symbol = symbol;
    }
    if let Some(kind) = req.kind {
        investment.kind = kind;
    }
    if let Some(currency) = req.currency {
        investment.currency = currency;
    }
    if let Some(quantity) = req.quantity {
        investment.quantity = quantity;
    }
    if let Some(average_price) = req.average_price {
        investment.average_price = average_price;
    }
    if let Some(current_price) = req.current_price {
        investment.current_price = current_price;
    }
    if let Some(purchase_date) = req.purchase_date {
        investment.purchase_date = Some(TimeMs::new(purchase_date));
    }
    if let Some(initial_value) = req.initial_value {
        investment.initial_value = initial_value;
    }
    if let Some(monthly_costs) = req.monthly_costs {
        investment.monthly_costs = monthly_costs;
    }
    if let Some(depreciation_rate) = req.depreciation_rate {
        investment.depreciation_rate = depreciation_rate;
    }

    state.repo.update_investment(&investment).await?;
    Ok(Json(investment))
}

pub async fn delete_investment(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_investment_id(&id)?;
    let deleted = state.repo.delete_investment(&id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Investment {} not found", id)));
    }
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
