//! Operation history persistence.
//!
//! Operations are addressed by their position in the history (`seq`). Deletes
//! compact the remaining positions inside the same transaction so `seq` stays
//! dense and equal to the API's positional index.

use super::{parse_stored_decimal, Repository};
use crate::domain::{InvestmentId, Operation, OperationKind, TimeMs};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

impl Repository {
    /// Append an operation at the end of an investment's history.
    ///
    /// Appends carrying an `import_key` already present for this investment
    /// are ignored, which makes transaction linking idempotent. Returns true
    /// when a row was actually inserted.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn append_operation(
        &self,
        investment_id: &InvestmentId,
        op: &Operation,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT COALESCE(MAX(seq), -1) + 1 AS next_seq FROM operations WHERE investment_id = ?",
        )
        .bind(investment_id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        let next_seq: i64 = row.get("next_seq");

        let result = sqlx::query(
            r#"
            INSERT INTO operations
            (investment_id, seq, date_ms, kind, quantity, price, fees, total, note, import_key)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(investment_id, import_key) DO NOTHING
            "#,
        )
        .bind(investment_id.to_string())
        .bind(next_seq)
        .bind(op.date.as_i64())
        .bind(op.kind.as_str())
        .bind(op.quantity.to_canonical_string())
        .bind(op.price.to_canonical_string())
        .bind(op.fees.to_canonical_string())
        .bind(op.total.to_canonical_string())
        .bind(&op.note)
        .bind(op.import_key.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// List an investment's operations in history order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_operations(
        &self,
        investment_id: &InvestmentId,
    ) -> Result<Vec<Operation>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM operations WHERE investment_id = ? ORDER BY seq ASC",
        )
        .bind(investment_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(operation_from_row).collect())
    }

    /// Replace the operation at a positional index.
    ///
    /// Returns false when the index does not exist.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_operation(
        &self,
        investment_id: &InvestmentId,
        index: i64,
        op: &Operation,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE operations SET
                date_ms = ?, kind = ?, quantity = ?, price = ?, fees = ?, total = ?, note = ?
            WHERE investment_id = ? AND seq = ?
            "#,
        )
        .bind(op.date.as_i64())
        .bind(op.kind.as_str())
        .bind(op.quantity.to_canonical_string())
        .bind(op.price.to_canonical_string())
        .bind(op.fees.to_canonical_string())
        .bind(op.total.to_canonical_string())
        .bind(&op.note)
        .bind(investment_id.to_string())
        .bind(index)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove the operation at a positional index, compacting later positions.
    ///
    /// Returns false when the index does not exist.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn delete_operation(
        &self,
        investment_id: &InvestmentId,
        index: i64,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM operations WHERE investment_id = ? AND seq = ?")
            .bind(investment_id.to_string())
            .bind(index)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE operations SET seq = seq - 1 WHERE investment_id = ? AND seq > ?",
        )
        .bind(investment_id.to_string())
        .bind(index)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}

fn operation_from_row(row: &SqliteRow) -> Operation {
    let kind_str: String = row.get("kind");
    let kind = OperationKind::parse(&kind_str).unwrap_or_else(|| {
        warn!(kind = %kind_str, "Unknown stored operation kind, defaulting to buy");
        OperationKind::Buy
    });

    let quantity: String = row.get("quantity");
    let price: String = row.get("price");
    let fees: String = row.get("fees");
    let total: String = row.get("total");

    Operation {
        date: TimeMs::new(row.get("date_ms")),
        kind,
        quantity: parse_stored_decimal("quantity", &quantity),
        price: parse_stored_decimal("price", &price),
        fees: parse_stored_decimal("fees", &fees),
        total: parse_stored_decimal("total", &total),
        note: row.get("note"),
        import_key: row.get("import_key"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::init_db;
    use crate::domain::{Decimal, Investment, InvestmentKind};
    use std::str::FromStr;
    use tempfile::TempDir;

    async fn setup_test_db() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn insert_host(repo: &Repository) -> InvestmentId {
        let inv = Investment {
            id: InvestmentId::generate(),
            name: "Host".to_string(),
            symbol: String::new(),
            kind: InvestmentKind::Stock,
            currency: "EUR".to_string(),
            quantity: Decimal::ZERO,
            average_price: Decimal::ZERO,
            current_price: Decimal::ZERO,
            operations: Vec::new(),
            purchase_date: None,
            initial_value: Decimal::ZERO,
            monthly_costs: Decimal::ZERO,
            depreciation_rate: Decimal::ZERO,
            created_at: TimeMs::new(1_700_000_000_000),
        };
        repo.insert_investment(&inv).await.unwrap();
        inv.id
    }

    fn buy(date_ms: i64, quantity: &str, price: &str) -> Operation {
        Operation::from_parts(
            TimeMs::new(date_ms),
            OperationKind::Buy,
            dec(quantity),
            dec(price),
            Decimal::ZERO,
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_append_and_list_preserves_order() {
        let (repo, _temp) = setup_test_db().await;
        let id = insert_host(&repo).await;

        // Out-of-date-order appends stay in append order.
        let first = buy(2_000, "1", "100");
        let second = buy(1_000, "2", "50");
        repo.append_operation(&id, &first).await.unwrap();
        repo.append_operation(&id, &second).await.unwrap();

        let ops = repo.list_operations(&id).await.unwrap();
        assert_eq!(ops, vec![first, second]);
    }

    #[tokio::test]
    async fn test_append_duplicate_import_key_ignored() {
        let (repo, _temp) = setup_test_db().await;
        let id = insert_host(&repo).await;

        let mut op = buy(1_000, "1", "100");
        op.import_key = Some("txn:abc".to_string());

        assert!(repo.append_operation(&id, &op).await.unwrap());
        assert!(!repo.append_operation(&id, &op).await.unwrap());
        assert_eq!(repo.list_operations(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_import_key_allowed_across_investments() {
        let (repo, _temp) = setup_test_db().await;
        let a = insert_host(&repo).await;
        let b = insert_host(&repo).await;

        let mut op = buy(1_000, "1", "100");
        op.import_key = Some("txn:abc".to_string());

        assert!(repo.append_operation(&a, &op).await.unwrap());
        assert!(repo.append_operation(&b, &op).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_operation_at_index() {
        let (repo, _temp) = setup_test_db().await;
        let id = insert_host(&repo).await;

        repo.append_operation(&id, &buy(1_000, "1", "100"))
            .await
            .unwrap();
        repo.append_operation(&id, &buy(2_000, "2", "200"))
            .await
            .unwrap();

        let replacement = buy(3_000, "5", "50");
        assert!(repo.update_operation(&id, 1, &replacement).await.unwrap());

        let ops = repo.list_operations(&id).await.unwrap();
        assert_eq!(ops[1], replacement);
        assert_eq!(ops[0].quantity, dec("1"));
    }

    #[tokio::test]
    async fn test_update_out_of_range_returns_false() {
        let (repo, _temp) = setup_test_db().await;
        let id = insert_host(&repo).await;
        repo.append_operation(&id, &buy(1_000, "1", "100"))
            .await
            .unwrap();

        assert!(!repo
            .update_operation(&id, 5, &buy(1_000, "1", "1"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_compacts_positions() {
        let (repo, _temp) = setup_test_db().await;
        let id = insert_host(&repo).await;

        repo.append_operation(&id, &buy(1_000, "1", "100"))
            .await
            .unwrap();
        repo.append_operation(&id, &buy(2_000, "2", "200"))
            .await
            .unwrap();
        repo.append_operation(&id, &buy(3_000, "3", "300"))
            .await
            .unwrap();

        assert!(repo.delete_operation(&id, 1).await.unwrap());

        let ops = repo.list_operations(&id).await.unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].quantity, dec("1"));
        assert_eq!(ops[1].quantity, dec("3"));

        // Index 1 now addresses the former third operation.
        assert!(repo.delete_operation(&id, 1).await.unwrap());
        let ops = repo.list_operations(&id).await.unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].quantity, dec("1"));
    }

    #[tokio::test]
    async fn test_delete_out_of_range_returns_false() {
        let (repo, _temp) = setup_test_db().await;
        let id = insert_host(&repo).await;
        assert!(!repo.delete_operation(&id, 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleting_investment_cascades_operations() {
        let (repo, _temp) = setup_test_db().await;
        let id = insert_host(&repo).await;
        repo.append_operation(&id, &buy(1_000, "1", "100"))
            .await
            .unwrap();

        repo.delete_investment(&id).await.unwrap();

        let ops = repo.list_operations(&id).await.unwrap();
        assert!(ops.is_empty());
    }
}
