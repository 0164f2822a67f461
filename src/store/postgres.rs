use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::query::CardQuery;

use super::{Card, CardStore, StoreError};

/// Postgres-backed card store.
pub struct PgCardStore {
    pool: PgPool,
}

impl PgCardStore {
    /// Connect and make sure the cards table exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!("Connected to Postgres card store");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        // BIGSERIAL sequences are monotonic and never reissue ids after deletes
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cards (
                id BIGSERIAL PRIMARY KEY,
                amount NUMERIC NOT NULL,
                owner TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS cards_owner_idx ON cards (owner)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CardStore for PgCardStore {
    async fn insert(&self, amount: Decimal, owner: &str) -> Result<Card, StoreError> {
        let card = sqlx::query_as::<_, Card>(
            "INSERT INTO cards (amount, owner) VALUES ($1, $2) RETURNING id, amount, owner",
        )
        .bind(amount)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(card)
    }

    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<Card>, StoreError> {
        let card = sqlx::query_as::<_, Card>(
            "SELECT id, amount, owner FROM cards WHERE id = $1 AND owner = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn list_by_owner(&self, owner: &str, query: &CardQuery) -> Result<Vec<Card>, StoreError> {
        // Sort field and direction come from closed enums, so interpolating
        // them into the statement cannot inject arbitrary SQL
        let sql = format!(
            "SELECT id, amount, owner FROM cards WHERE owner = $1 \
             ORDER BY {} {}, id ASC LIMIT $2 OFFSET $3",
            query.sort_field.to_sql(),
            query.sort_direction.to_sql(),
        );

        let cards = sqlx::query_as::<_, Card>(&sql)
            .bind(owner)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(cards)
    }

    async fn update_amount(
        &self,
        id: i64,
        owner: &str,
        amount: Decimal,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE cards SET amount = $1 WHERE id = $2 AND owner = $3")
            .bind(amount)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64, owner: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
