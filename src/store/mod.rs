use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::CardQuery;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCardStore;
pub use postgres::PgCardStore;

/// A single monetary record. `owner` is stamped at creation from the
/// authenticated principal and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: i64,
    pub amount: Decimal,
    pub owner: String,
}

/// Errors from store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Capability interface over the durable card store.
///
/// Update and delete are scoped by (id, owner) in a single call so the store's
/// own per-key atomicity is the only concurrency guard needed above it.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Insert a new card, generating its id. Ids are unique for the store's
    /// lifetime and never reused after deletion.
    async fn insert(&self, amount: Decimal, owner: &str) -> Result<Card, StoreError>;

    async fn find_by_id_and_owner(&self, id: i64, owner: &str)
        -> Result<Option<Card>, StoreError>;

    /// Owner-filtered paged scan. Ordering is total: the query's sort field
    /// and direction, then id ascending as a tie-break.
    async fn list_by_owner(&self, owner: &str, query: &CardQuery) -> Result<Vec<Card>, StoreError>;

    /// Replace the amount of the card matching (id, owner). Returns false when
    /// no such card exists.
    async fn update_amount(&self, id: i64, owner: &str, amount: Decimal)
        -> Result<bool, StoreError>;

    /// Delete the card matching (id, owner). Returns false when no such card
    /// exists.
    async fn delete(&self, id: i64, owner: &str) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
