use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::query::{CardQuery, SortDirection, SortField};

use super::{Card, CardStore, StoreError};

/// In-memory card store used for local runs and tests.
///
/// Ids come from a monotonic sequence, so deleted ids are never handed out
/// again. The map lock is held only for the duration of each synchronous
/// mutation, which gives update/delete the same single-step scoped semantics
/// as the SQL statements in the Postgres adapter.
pub struct MemoryCardStore {
    cards: RwLock<BTreeMap<i64, Card>>,
    next_id: AtomicI64,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self {
            cards: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Pre-populate with fixed cards; the id sequence continues past the
    /// highest seeded id.
    pub fn with_seed(cards: Vec<Card>) -> Self {
        let next = cards.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            cards: RwLock::new(cards.into_iter().map(|c| (c.id, c)).collect()),
            next_id: AtomicI64::new(next),
        }
    }

    /// The demo data set: three cards for sarah1 and one for kumar2.
    pub fn with_demo_fixtures() -> Self {
        let card = |id, amount, owner: &str| Card {
            id,
            amount,
            owner: owner.to_string(),
        };
        Self::with_seed(vec![
            card(99, Decimal::new(12345, 2), "sarah1"),
            card(100, Decimal::new(100, 2), "sarah1"),
            card(101, Decimal::new(15000, 2), "sarah1"),
            card(102, Decimal::new(20000, 2), "kumar2"),
        ])
    }
}

impl Default for MemoryCardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn insert(&self, amount: Decimal, owner: &str) -> Result<Card, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let card = Card {
            id,
            amount,
            owner: owner.to_string(),
        };
        self.cards
            .write()
            .expect("card map lock poisoned")
            .insert(id, card.clone());
        Ok(card)
    }

    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<Card>, StoreError> {
        let cards = self.cards.read().expect("card map lock poisoned");
        Ok(cards.get(&id).filter(|c| c.owner == owner).cloned())
    }

    async fn list_by_owner(&self, owner: &str, query: &CardQuery) -> Result<Vec<Card>, StoreError> {
        let mut page: Vec<Card> = {
            let cards = self.cards.read().expect("card map lock poisoned");
            cards
                .values()
                .filter(|c| c.owner == owner)
                .cloned()
                .collect()
        };

        // Total order: sort field and direction, then id ascending
        page.sort_by(|a, b| {
            let primary = match query.sort_field {
                SortField::Amount => a.amount.cmp(&b.amount),
                SortField::Id => a.id.cmp(&b.id),
            };
            let primary = match query.sort_direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then(a.id.cmp(&b.id))
        });

        Ok(page
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn update_amount(
        &self,
        id: i64,
        owner: &str,
        amount: Decimal,
    ) -> Result<bool, StoreError> {
        let mut cards = self.cards.write().expect("card map lock poisoned");
        match cards.get_mut(&id) {
            Some(card) if card.owner == owner => {
                card.amount = amount;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: i64, owner: &str) -> Result<bool, StoreError> {
        let mut cards = self.cards.write().expect("card map lock poisoned");
        match cards.get(&id) {
            Some(card) if card.owner == owner => {
                cards.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
