//! Repository Traits

use kernel::id::{CartItemId, UserId};

use crate::domain::entity::CartItem;
use crate::domain::value_object::Quantity;
use crate::error::CartResult;

/// Cart item repository trait
#[trait_variant::make(CartRepository: Send)]
pub trait LocalCartRepository {
    /// The user's items, oldest first
    async fn list_by_user(&self, user_id: &UserId) -> CartResult<Vec<CartItem>>;

    /// Insert `item`, or add its quantity to the user's existing line for the
    /// same product. Atomic per `(user_id, product_id)`.
    ///
    /// Returns the stored item and `true` if it was inserted.
    async fn add_or_increment(&self, item: &CartItem) -> CartResult<(CartItem, bool)>;

    /// `None` if the item does not exist
    async fn update_quantity(
        &self,
        cart_item_id: &CartItemId,
        quantity: Quantity,
    ) -> CartResult<Option<CartItem>>;

    /// `false` if there was nothing to delete
    async fn delete(&self, cart_item_id: &CartItemId) -> CartResult<bool>;

    /// Number of items removed
    async fn delete_all_for_user(&self, user_id: &UserId) -> CartResult<u64>;
}
