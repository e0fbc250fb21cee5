//! In-memory cart repository
//!
//! `lines` maps `(user, product)` to the item id; holding its entry while
//! touching `items` makes add-or-increment atomic per line.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kernel::id::{CartItemId, ProductId, UserId};

use crate::domain::entity::CartItem;
use crate::domain::repository::CartRepository;
use crate::domain::value_object::Quantity;
use crate::error::CartResult;

#[derive(Clone, Default)]
pub struct InMemoryCartRepository {
    items: Arc<DashMap<CartItemId, CartItem>>,
    lines: Arc<DashMap<(UserId, ProductId), CartItemId>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartRepository for InMemoryCartRepository {
    async fn list_by_user(&self, user_id: &UserId) -> CartResult<Vec<CartItem>> {
        let mut items: Vec<CartItem> = self
            .items
            .iter()
            .filter(|entry| entry.user_id == *user_id)
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|item| (item.created_at, *item.cart_item_id.as_uuid()));
        Ok(items)
    }

    async fn add_or_increment(&self, item: &CartItem) -> CartResult<(CartItem, bool)> {
        match self.lines.entry((item.user_id, item.product_id)) {
            Entry::Occupied(mut line) => {
                if let Some(mut existing) = self.items.get_mut(line.get()) {
                    let quantity = existing.quantity.checked_add(item.quantity)?;
                    existing.set_quantity(quantity);
                    return Ok((existing.clone(), false));
                }
                // Stale line left behind by a concurrent delete
                self.items.insert(item.cart_item_id, item.clone());
                line.insert(item.cart_item_id);
                Ok((item.clone(), true))
            }
            Entry::Vacant(line) => {
                self.items.insert(item.cart_item_id, item.clone());
                line.insert(item.cart_item_id);
                Ok((item.clone(), true))
            }
        }
    }

    async fn update_quantity(
        &self,
        cart_item_id: &CartItemId,
        quantity: Quantity,
    ) -> CartResult<Option<CartItem>> {
        Ok(self.items.get_mut(cart_item_id).map(|mut entry| {
            entry.quantity = quantity;
            entry.updated_at = Utc::now();
            entry.clone()
        }))
    }

    async fn delete(&self, cart_item_id: &CartItemId) -> CartResult<bool> {
        let Some((_, item)) = self.items.remove(cart_item_id) else {
            return Ok(false);
        };
        self.lines
            .remove_if(&(item.user_id, item.product_id), |_, id| id == cart_item_id);
        Ok(true)
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> CartResult<u64> {
        let before = self.items.len();
        self.items.retain(|_, item| item.user_id != *user_id);
        self.lines.retain(|(owner, _), _| owner != user_id);
        Ok(before.saturating_sub(self.items.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::Price;

    fn item(user_id: UserId, product_id: ProductId, quantity: i64) -> CartItem {
        CartItem::new(
            user_id,
            product_id,
            Quantity::new(quantity).unwrap(),
            Price::new(10.0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_add_then_increment() {
        let repo = InMemoryCartRepository::new();
        let (user, product) = (UserId::new(), ProductId::new());

        let first = item(user, product, 2);
        let (stored, inserted) = repo.add_or_increment(&first).await.unwrap();
        assert!(inserted);
        assert_eq!(stored.quantity.get(), 2);

        let mut again = item(user, product, 3);
        again.price = Price::new(99.0).unwrap();
        let (stored, inserted) = repo.add_or_increment(&again).await.unwrap();
        assert!(!inserted);
        assert_eq!(stored.cart_item_id, first.cart_item_id);
        assert_eq!(stored.quantity.get(), 5);
        assert_eq!(stored.price.get(), 10.0);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_increment_past_max_is_rejected() {
        let repo = InMemoryCartRepository::new();
        let (user, product) = (UserId::new(), ProductId::new());

        repo.add_or_increment(&item(user, product, 9_999)).await.unwrap();
        assert!(repo.add_or_increment(&item(user, product, 2)).await.is_err());

        let items = repo.list_by_user(&user).await.unwrap();
        assert_eq!(items[0].quantity.get(), 9_999);
    }

    #[tokio::test]
    async fn test_delete_frees_the_line() {
        let repo = InMemoryCartRepository::new();
        let (user, product) = (UserId::new(), ProductId::new());

        let first = item(user, product, 1);
        repo.add_or_increment(&first).await.unwrap();
        assert!(repo.delete(&first.cart_item_id).await.unwrap());
        assert!(!repo.delete(&first.cart_item_id).await.unwrap());

        let (_, inserted) = repo.add_or_increment(&item(user, product, 1)).await.unwrap();
        assert!(inserted);
    }

    #[tokio::test]
    async fn test_delete_all_for_user() {
        let repo = InMemoryCartRepository::new();
        let (alice, bob) = (UserId::new(), UserId::new());

        repo.add_or_increment(&item(alice, ProductId::new(), 1)).await.unwrap();
        repo.add_or_increment(&item(alice, ProductId::new(), 1)).await.unwrap();
        repo.add_or_increment(&item(bob, ProductId::new(), 1)).await.unwrap();

        assert_eq!(repo.delete_all_for_user(&alice).await.unwrap(), 2);
        assert_eq!(repo.delete_all_for_user(&alice).await.unwrap(), 0);
        assert_eq!(repo.list_by_user(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_one_line() {
        let repo = InMemoryCartRepository::new();
        let (user, product) = (UserId::new(), ProductId::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.add_or_increment(&item(user, product, 1)).await.unwrap()
            }));
        }
        let mut inserts = 0;
        for handle in handles {
            if handle.await.unwrap().1 {
                inserts += 1;
            }
        }

        assert_eq!(inserts, 1);
        let items = repo.list_by_user(&user).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity.get(), 16);
    }
}
