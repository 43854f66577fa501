//! Synthetic operations from linked transactions.
//!
//! When a user links a cash transaction to an investment, it enters the
//! ledger as an ordinary operation: a buy for an expense, a sell for income,
//! one unit at the transaction amount. The cost-basis engine applies no
//! special casing to it.

use crate::domain::{Decimal, Direction, LinkedTransaction, Operation, OperationKind};

/// Build the synthetic operation for a linked transaction.
pub fn operation_from_transaction(txn: &LinkedTransaction) -> Operation {
    let kind = match txn.direction {
        Direction::Expense => OperationKind::Buy,
        Direction::Income => OperationKind::Sell,
    };
    let amount = txn.amount.abs();

    let mut op = Operation::from_parts(
        txn.date,
        kind,
        Decimal::from(1),
        amount,
        Decimal::ZERO,
        txn.description.clone(),
    );
    op.import_key = Some(txn.import_key());
    op
}
