pub mod health;
pub mod import;
pub mod investments;
pub mod metrics;
pub mod operations;
pub mod projection;

use crate::config::Config;
use crate::db::Repository;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/investments",
            get(investments::list_investments).post(investments::create_investment),
        )
        .route(
            "/v1/investments/:id",
            get(investments::get_investment)
                .put(investments::update_investment)
                .delete(investments::delete_investment),
        )
        .route("/v1/investments/:id/metrics", get(metrics::get_metrics))
        .route(
            "/v1/investments/:id/operations",
            post(operations::append_operation),
        )
        .route(
            "/v1/investments/:id/operations/:index",
            put(operations::update_operation).delete(operations::delete_operation),
        )
        .route("/v1/investments/:id/link", post(operations::link_transaction))
        .route("/v1/projection", get(projection::get_projection))
        .route("/v1/import/statement", post(import::import_statement))
        .route("/v1/import/csv", post(import::import_csv))
        .layer(cors)
        .with_state(state)
}
