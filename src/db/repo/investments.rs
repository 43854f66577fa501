//! Investment row persistence.

use super::{parse_stored_decimal, Repository};
use crate::domain::{Decimal, Investment, InvestmentId, InvestmentKind, TimeMs};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

impl Repository {
    /// Insert a new investment. Operations are persisted separately.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_investment(&self, inv: &Investment) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO investments
            (id, name, symbol, kind, currency, quantity, average_price, current_price,
             purchase_date_ms, initial_value, monthly_costs, depreciation_rate, created_at_ms)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(inv.id.to_string())
        .bind(&inv.name)
        .bind(&inv.symbol)
        .bind(inv.kind.as_str())
        .bind(&inv.currency)
        .bind(inv.quantity.to_canonical_string())
        .bind(inv.average_price.to_canonical_string())
        .bind(inv.current_price.to_canonical_string())
        .bind(inv.purchase_date.map(|t| t.as_i64()))
        .bind(inv.initial_value.to_canonical_string())
        .bind(inv.monthly_costs.to_canonical_string())
        .bind(inv.depreciation_rate.to_canonical_string())
        .bind(inv.created_at.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch one investment with its full operation history.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_investment(
        &self,
        id: &InvestmentId,
    ) -> Result<Option<Investment>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM investments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut inv = investment_from_row(&row);
        inv.operations = self.list_operations(id).await?;
        Ok(Some(inv))
    }

    /// List all investments (newest first) with operation histories attached.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_investments(&self) -> Result<Vec<Investment>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM investments ORDER BY created_at_ms DESC, id ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut investments = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut inv = investment_from_row(row);
            inv.operations = self.list_operations(&inv.id).await?;
            investments.push(inv);
        }

        Ok(investments)
    }

    /// Update the mutable descriptive fields of an investment.
    ///
    /// Returns false when no row matched the id.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_investment(&self, inv: &Investment) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE investments SET
                name = ?, symbol = ?, kind = ?, currency = ?,
                quantity = ?, average_price = ?, current_price = ?,
                purchase_date_ms = ?, initial_value = ?, monthly_costs = ?, depreciation_rate = ?
            WHERE id = ?
            "#,
        )
        .bind(&inv.name)
        .bind(&inv.symbol)
        .bind(inv.kind.as_str())
        .bind(&inv.currency)
        .bind(inv.quantity.to_canonical_string())
        .bind(inv.average_price.to_canonical_string())
        .bind(inv.current_price.to_canonical_string())
        .bind(inv.purchase_date.map(|t| t.as_i64()))
        .bind(inv.initial_value.to_canonical_string())
        .bind(inv.monthly_costs.to_canonical_string())
        .bind(inv.depreciation_rate.to_canonical_string())
        .bind(inv.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an investment; its operations cascade.
    ///
    /// Returns false when no row matched the id.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_investment(&self, id: &InvestmentId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM investments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Persist the derived holdings after an operation mutation.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_holdings(
        &self,
        id: &InvestmentId,
        quantity: Decimal,
        average_price: Decimal,
        current_price: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE investments SET quantity = ?, average_price = ?, current_price = ? WHERE id = ?",
        )
        .bind(quantity.to_canonical_string())
        .bind(average_price.to_canonical_string())
        .bind(current_price.to_canonical_string())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn investment_from_row(row: &SqliteRow) -> Investment {
    let id_str: String = row.get("id");
    let id = InvestmentId::parse(&id_str).unwrap_or_else(|e| {
        warn!(id = %id_str, error = %e, "Failed to parse stored investment id, generating fresh");
        InvestmentId::generate()
    });

    let kind_str: String = row.get("kind");
    let kind = InvestmentKind::parse(&kind_str).unwrap_or_else(|| {
        warn!(kind = %kind_str, "Unknown stored investment kind, defaulting to etf");
        InvestmentKind::Etf
    });

    let quantity: String = row.get("quantity");
    let average_price: String = row.get("average_price");
    let current_price: String = row.get("current_price");
    let initial_value: String = row.get("initial_value");
    let monthly_costs: String = row.get("monthly_costs");
    let depreciation_rate: String = row.get("depreciation_rate");

    Investment {
        id,
        name: row.get("name"),
        symbol: row.get("symbol"),
        kind,
        currency: row.get("currency"),
        quantity: parse_stored_decimal("quantity", &quantity),
        average_price: parse_stored_decimal("average_price", &average_price),
        current_price: parse_stored_decimal("current_price", &current_price),
        operations: Vec::new(),
        purchase_date: row
            .get::<Option<i64>, _>("purchase_date_ms")
            .map(TimeMs::new),
        initial_value: parse_stored_decimal("initial_value", &initial_value),
        monthly_costs: parse_stored_decimal("monthly_costs", &monthly_costs),
        depreciation_rate: parse_stored_decimal("depreciation_rate", &depreciation_rate),
        created_at: TimeMs::new(row.get("created_at_ms")),
    }
}
