//! Transactions as seen by this service: external records a user can link
//! to an investment. Never persisted here.

use crate::domain::{Decimal, TimeMs};
use serde::{Deserialize, Serialize};

/// Cash-flow direction of a transaction in the source ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Income,
    Expense,
}

/// A transaction supplied by the surrounding application (manual entry,
/// statement parse, or CSV import) for linking to an investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedTransaction {
    pub date: TimeMs,
    pub description: String,
    /// Cash amount, always taken as an absolute magnitude; `direction`
    /// carries the sign.
    pub amount: Decimal,
    pub direction: Direction,
}

impl LinkedTransaction {
    /// Stable key over the identifying fields, so linking the same
    /// transaction twice appends exactly one operation.
    pub fn import_key(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(self.date.as_i64().to_le_bytes());
        hasher.update(self.description.as_bytes());
        hasher.update(self.amount.to_canonical_string().as_bytes());
        hasher.update(match self.direction {
            Direction::Income => b"I",
            Direction::Expense => b"E",
        });
        let hash = hasher.finalize();
        format!("txn:{}", hex::encode(&hash[..16]))
    }
}
