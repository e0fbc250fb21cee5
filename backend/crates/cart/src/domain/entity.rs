//! Cart item entity

use chrono::{DateTime, Utc};
use kernel::id::{CartItemId, ProductId, UserId};

use crate::domain::value_object::{Price, Quantity};

/// One product line in a user's cart
///
/// A user has at most one item per product; adding the product again
/// increases the quantity and keeps the original price.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub cart_item_id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(user_id: UserId, product_id: ProductId, quantity: Quantity, price: Price) -> Self {
        let now = Utc::now();
        Self {
            cart_item_id: CartItemId::new(),
            user_id,
            product_id,
            quantity,
            price,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
        self.updated_at = Utc::now();
    }

    pub fn is_same_line(&self, user_id: &UserId, product_id: &ProductId) -> bool {
        self.user_id == *user_id && self.product_id == *product_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_quantity_touches_updated_at() {
        let mut item = CartItem::new(
            UserId::new(),
            ProductId::new(),
            Quantity::one(),
            Price::new(5.0).unwrap(),
        );
        let created = item.created_at;
        item.set_quantity(Quantity::new(4).unwrap());

        assert_eq!(item.quantity.get(), 4);
        assert_eq!(item.created_at, created);
        assert!(item.updated_at >= created);
    }
}
