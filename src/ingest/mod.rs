//! Input adapters feeding the ledger: statement text parsing, CSV import,
//! and transaction-to-operation linking. All best-effort; the engines only
//! ever see ordinary operations.

pub mod csv;
pub mod link;
pub mod statement;

pub use csv::{parse_bank_csv, CsvTransaction};
pub use link::operation_from_transaction;
pub use statement::{parse_statement, ParsedTransaction};
