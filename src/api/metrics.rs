use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::api::investments::parse_investment_id;
use crate::api::AppState;
use crate::domain::TimeMs;
use crate::engine::{compute_metrics, Metrics};
use crate::error::AppError;

/// Kind-specific metrics for one investment, computed on demand from the
/// stored operation history.
pub async fn get_metrics(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Metrics>, AppError> {
    let id = parse_investment_id(&id)?;
    let investment = state
        .repo
        .get_investment(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Investment {} not found", id)))?;

    let metrics = compute_metrics(&investment, TimeMs::from_datetime(Utc::now()));
    Ok(Json(metrics))
}
