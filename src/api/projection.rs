use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::engine::{project, yearly_samples, ProjectionParams, ProjectionPoint};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionQuery {
    pub initial_amount: Option<f64>,
    pub monthly_amount: Option<f64>,
    pub years: u32,
    pub annual_return_pct: Option<f64>,
    /// "monthly" (default) or "yearly".
    pub sampling: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    pub points: Vec<ProjectionPoint>,
}

pub async fn get_projection(
    Query(params): Query<ProjectionQuery>,
    State(state): State<AppState>,
) -> Result<Json<ProjectionResponse>, AppError> {
    if params.years == 0 {
        return Err(AppError::BadRequest("years must be at least 1".to_string()));
    }
    if params.years > state.config.max_projection_years {
        return Err(AppError::BadRequest(format!(
            "years must be at most {}",
            state.config.max_projection_years
        )));
    }

    let initial_amount = params.initial_amount.unwrap_or(0.0);
    let monthly_amount = params.monthly_amount.unwrap_or(0.0);
    let annual_return_pct = params.annual_return_pct.unwrap_or(0.0);

    if !initial_amount.is_finite() || !monthly_amount.is_finite() || !annual_return_pct.is_finite()
    {
        return Err(AppError::BadRequest(
            "projection inputs must be finite numbers".to_string(),
        ));
    }
    if initial_amount < 0.0 || monthly_amount < 0.0 {
        return Err(AppError::BadRequest(
            "amounts must be non-negative".to_string(),
        ));
    }

    let sampling = params.sampling.as_deref().unwrap_or("monthly");
    let projection = project(&ProjectionParams {
        initial_amount,
        monthly_amount,
        years: params.years,
        annual_return_pct,
    });

    let points = match sampling {
        "monthly" => projection,
        "yearly" => yearly_samples(&projection),
        other => {
            return Err(AppError::BadRequest(format!(
                "sampling must be monthly or yearly, got {}",
                other
            )))
        }
    };

    Ok(Json(ProjectionResponse { points }))
}
