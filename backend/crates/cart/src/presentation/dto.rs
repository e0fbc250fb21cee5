//! Cart DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::CartItem;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CartItem> for CartItemResponse {
    fn from(item: &CartItem) -> Self {
        Self {
            id: *item.cart_item_id.as_uuid(),
            user_id: *item.user_id.as_uuid(),
            product_id: *item.product_id.as_uuid(),
            quantity: item.quantity.get(),
            price: item.price.get(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddItemRequest {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateQuantityRequest {
    pub quantity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Price, Quantity};
    use kernel::id::{ProductId, UserId};

    #[test]
    fn test_cart_item_response_shape() {
        let item = CartItem::new(
            UserId::new(),
            ProductId::new(),
            Quantity::new(2).unwrap(),
            Price::new(4.25).unwrap(),
        );
        let json = serde_json::to_value(CartItemResponse::from(&item)).unwrap();

        assert_eq!(json["id"], item.cart_item_id.to_string());
        assert_eq!(json["userId"], item.user_id.to_string());
        assert_eq!(json["productId"], item.product_id.to_string());
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["price"], 4.25);
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
    }

    #[test]
    fn test_add_item_request_accepts_integers() {
        let req: AddItemRequest =
            serde_json::from_str(r#"{"userId":"u","productId":"p","quantity":3,"price":10}"#)
                .unwrap();
        assert_eq!(req.quantity, Some(3.0));
        assert_eq!(req.price, Some(10.0));

        let req: AddItemRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_id.is_none());
    }
}
