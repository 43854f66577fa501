//! Domain types for the investment ledger.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: InvestmentId, TimeMs
//! - Investment, Operation, and LinkedTransaction entities with canonical
//!   JSON serialization

pub mod decimal;
pub mod investment;
pub mod operation;
pub mod primitives;
pub mod transaction;

pub use decimal::Decimal;
pub use investment::{Investment, InvestmentKind};
pub use operation::{Operation, OperationKind};
pub use primitives::{InvestmentId, TimeMs};
pub use transaction::{Direction, LinkedTransaction};
