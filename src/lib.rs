pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ingest;

pub use config::{Config, SellPolicy};
pub use db::{init_db, Repository};
pub use domain::{
    Decimal, Direction, Investment, InvestmentId, InvestmentKind, LinkedTransaction, Operation,
    OperationKind, TimeMs,
};
pub use engine::{compute_metrics, project, Metrics, ProjectionParams};
pub use error::AppError;
