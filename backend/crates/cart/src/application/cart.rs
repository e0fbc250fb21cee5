//! Cart Use Cases
//!
//! Carts are addressed by user id from the path or body; the service does
//! not authenticate callers.

use std::str::FromStr;
use std::sync::Arc;

use kernel::id::{CartItemId, ProductId, UserId};

use crate::domain::entity::CartItem;
use crate::domain::repository::CartRepository;
use crate::domain::value_object::{Price, Quantity};
use crate::error::{CartError, CartResult};

pub struct AddItemInput {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
}

/// Stored item and whether a new line was created
#[derive(Debug)]
pub struct AddItemOutput {
    pub item: CartItem,
    pub created: bool,
}

pub struct CartUseCase<R>
where
    R: CartRepository,
{
    repo: Arc<R>,
}

/// Parse a trimmed id, naming the field in the error
pub(crate) fn parse_id<T>(raw: &str, field: &'static str) -> CartResult<T>
where
    T: FromStr,
{
    raw.trim()
        .parse::<T>()
        .map_err(|_| CartError::validation(format!("Invalid {field}")))
}

impl<R> CartUseCase<R>
where
    R: CartRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user_id: &UserId) -> CartResult<Vec<CartItem>> {
        self.repo.list_by_user(user_id).await
    }

    /// Add a product, or bump the quantity of the existing line
    pub async fn add(&self, input: AddItemInput) -> CartResult<AddItemOutput> {
        let (Some(user_id), Some(product_id), Some(price)) =
            (input.user_id, input.product_id, input.price)
        else {
            return Err(CartError::validation(
                "userId, productId and price are required",
            ));
        };

        let user_id: UserId = parse_id(&user_id, "userId")?;
        let product_id: ProductId = parse_id(&product_id, "productId")?;
        let quantity = input
            .quantity
            .map(Quantity::from_json)
            .transpose()?
            .unwrap_or_else(Quantity::one);
        let price = Price::new(price)?;

        let (item, created) = self
            .repo
            .add_or_increment(&CartItem::new(user_id, product_id, quantity, price))
            .await?;

        tracing::info!(
            cart_item_id = %item.cart_item_id,
            user_id = %user_id,
            quantity = item.quantity.get(),
            created,
            "Cart line saved"
        );
        Ok(AddItemOutput { item, created })
    }

    pub async fn update_quantity(
        &self,
        cart_item_id: &CartItemId,
        quantity: Option<f64>,
    ) -> CartResult<CartItem> {
        let quantity = quantity
            .ok_or_else(|| CartError::validation("Quantity is required"))
            .and_then(Quantity::from_json)?;

        self.repo
            .update_quantity(cart_item_id, quantity)
            .await?
            .ok_or(CartError::NotFound)
    }

    pub async fn remove(&self, cart_item_id: &CartItemId) -> CartResult<()> {
        if !self.repo.delete(cart_item_id).await? {
            return Err(CartError::NotFound);
        }
        tracing::debug!(cart_item_id = %cart_item_id, "Cart line removed");
        Ok(())
    }

    /// Empty the user's cart; clearing an empty cart is not an error
    pub async fn clear(&self, user_id: &UserId) -> CartResult<u64> {
        let removed = self.repo.delete_all_for_user(user_id).await?;
        tracing::info!(user_id = %user_id, removed, "Cart cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryCartRepository;

    fn use_case() -> CartUseCase<InMemoryCartRepository> {
        CartUseCase::new(Arc::new(InMemoryCartRepository::new()))
    }

    fn input(user_id: &UserId, quantity: Option<f64>, price: Option<f64>) -> AddItemInput {
        AddItemInput {
            user_id: Some(user_id.to_string()),
            product_id: Some(ProductId::new().to_string()),
            quantity,
            price,
        }
    }

    #[tokio::test]
    async fn test_add_defaults_quantity_to_one() {
        let use_case = use_case();
        let user_id = UserId::new();

        let out = use_case.add(input(&user_id, None, Some(3.5))).await.unwrap();
        assert!(out.created);
        assert_eq!(out.item.quantity.get(), 1);
        assert_eq!(out.item.price.get(), 3.5);
    }

    #[tokio::test]
    async fn test_add_validation() {
        let use_case = use_case();
        let user_id = UserId::new();

        let err = use_case.add(input(&user_id, None, None)).await.unwrap_err();
        assert_eq!(err.to_string(), "userId, productId and price are required");

        let mut bad_user = input(&user_id, None, Some(1.0));
        bad_user.user_id = Some("abc".to_string());
        let err = use_case.add(bad_user).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid userId");

        let err = use_case.add(input(&user_id, Some(0.0), Some(1.0))).await.unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));

        let err = use_case.add(input(&user_id, None, Some(-1.0))).await.unwrap_err();
        assert_eq!(err.to_string(), "Price must be a non-negative number");
    }

    #[tokio::test]
    async fn test_update_and_remove_missing_item() {
        let use_case = use_case();
        let missing = CartItemId::new();

        let err = use_case.update_quantity(&missing, Some(2.0)).await.unwrap_err();
        assert!(matches!(err, CartError::NotFound));

        let err = use_case.update_quantity(&missing, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Quantity is required");

        assert!(matches!(
            use_case.remove(&missing).await.unwrap_err(),
            CartError::NotFound
        ));
        assert_eq!(use_case.clear(&UserId::new()).await.unwrap(), 0);
    }
}
