use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::access::{AccessDecision, OwnershipEnforcer};
use crate::auth::AuthUser;
use crate::config::PagingConfig;
use crate::query::{ListParams, QueryError, QueryResolver};
use crate::store::{Card, CardStore, StoreError};

#[derive(Debug, Error)]
pub enum CardError {
    #[error("principal lacks the card-owner role")]
    Forbidden,
    #[error("card not found")]
    NotFound,
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates the five card operations: role check first, then an
/// owner-scoped store call, then decision mapping. Holds no per-request state;
/// all durable state lives behind the store.
pub struct CardService {
    store: Arc<dyn CardStore>,
    paging: PagingConfig,
}

impl CardService {
    pub fn new(store: Arc<dyn CardStore>, paging: PagingConfig) -> Self {
        Self { store, paging }
    }

    pub fn store(&self) -> &Arc<dyn CardStore> {
        &self.store
    }

    fn authorize(&self, user: &AuthUser) -> Result<(), CardError> {
        match OwnershipEnforcer::authorize_role(user) {
            AccessDecision::Allow => Ok(()),
            _ => Err(CardError::Forbidden),
        }
    }

    /// Create a card owned by the caller. The owner always comes from the
    /// authenticated principal, never from request input.
    pub async fn create(&self, user: &AuthUser, amount: Decimal) -> Result<Card, CardError> {
        self.authorize(user)?;
        let card = self.store.insert(amount, &user.username).await?;
        debug!(id = card.id, owner = %card.owner, "created card");
        Ok(card)
    }

    pub async fn get(&self, user: &AuthUser, id: i64) -> Result<Card, CardError> {
        self.authorize(user)?;
        let card = self.store.find_by_id_and_owner(id, &user.username).await?;
        match OwnershipEnforcer::filter_by_ownership(&user.username, card.as_ref()) {
            AccessDecision::Allow => card.ok_or(CardError::NotFound),
            _ => Err(CardError::NotFound),
        }
    }

    /// Owner-filtered page of cards in the resolved order. Returns page
    /// content only; no count metadata is surfaced.
    pub async fn list(&self, user: &AuthUser, params: &ListParams) -> Result<Vec<Card>, CardError> {
        self.authorize(user)?;
        let query = QueryResolver::resolve(params, &self.paging)?;
        Ok(self.store.list_by_owner(&user.username, &query).await?)
    }

    /// Replace the amount of an owned card, preserving id and owner. The store
    /// call is scoped by (id, owner) in one step, so absent and foreign cards
    /// are equally a miss.
    pub async fn update(&self, user: &AuthUser, id: i64, amount: Decimal) -> Result<(), CardError> {
        self.authorize(user)?;
        let updated = self.store.update_amount(id, &user.username, amount).await?;
        if updated {
            Ok(())
        } else {
            Err(CardError::NotFound)
        }
    }

    pub async fn delete(&self, user: &AuthUser, id: i64) -> Result<(), CardError> {
        self.authorize(user)?;
        let deleted = self.store.delete(id, &user.username).await?;
        if deleted {
            debug!(id, owner = %user.username, "deleted card");
            Ok(())
        } else {
            Err(CardError::NotFound)
        }
    }
}
