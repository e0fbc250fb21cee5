//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{CartItemId, ProductId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::CartItem;
use crate::domain::repository::CartRepository;
use crate::domain::value_object::{MAX_QUANTITY, Price, Quantity};
use crate::error::{CartError, CartResult};

const CART_ITEM_COLUMNS: &str = r#"
    cart_item_id,
    user_id,
    product_id,
    quantity,
    price,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed cart repository
#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// CHECK violations on `cart_items.quantity` come from increments past the cap
fn map_quantity_check(err: sqlx::Error) -> CartError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23514") {
            return CartError::validation(format!(
                "Quantity must be an integer between 1 and {MAX_QUANTITY}"
            ));
        }
    }
    CartError::Database(err)
}

impl CartRepository for PgCartRepository {
    async fn list_by_user(&self, user_id: &UserId) -> CartResult<Vec<CartItem>> {
        let sql = format!(
            "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE user_id = $1 ORDER BY created_at, cart_item_id"
        );
        let rows = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CartItemRow::into_item).collect())
    }

    async fn add_or_increment(&self, item: &CartItem) -> CartResult<(CartItem, bool)> {
        // xmax is 0 only for a freshly inserted tuple
        let sql = format!(
            r#"
            INSERT INTO cart_items (
                cart_item_id,
                user_id,
                product_id,
                quantity,
                price,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                quantity = cart_items.quantity + EXCLUDED.quantity,
                updated_at = EXCLUDED.updated_at
            RETURNING {CART_ITEM_COLUMNS}, (xmax = 0) AS inserted
            "#
        );
        let row = sqlx::query_as::<_, UpsertRow>(&sql)
            .bind(item.cart_item_id.as_uuid())
            .bind(item.user_id.as_uuid())
            .bind(item.product_id.as_uuid())
            .bind(item.quantity.get())
            .bind(item.price.get())
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_quantity_check)?;

        tracing::debug!(
            cart_item_id = %row.item.cart_item_id,
            inserted = row.inserted,
            "Cart line upserted"
        );
        Ok((row.item.into_item(), row.inserted))
    }

    async fn update_quantity(
        &self,
        cart_item_id: &CartItemId,
        quantity: Quantity,
    ) -> CartResult<Option<CartItem>> {
        let sql = format!(
            r#"
            UPDATE cart_items SET
                quantity = $2,
                updated_at = $3
            WHERE cart_item_id = $1
            RETURNING {CART_ITEM_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(cart_item_id.as_uuid())
            .bind(quantity.get())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CartItemRow::into_item))
    }

    async fn delete(&self, cart_item_id: &CartItemId) -> CartResult<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_item_id = $1")
            .bind(cart_item_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> CartResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct CartItemRow {
    cart_item_id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartItemRow {
    fn into_item(self) -> CartItem {
        CartItem {
            cart_item_id: CartItemId::from_uuid(self.cart_item_id),
            user_id: UserId::from_uuid(self.user_id),
            product_id: ProductId::from_uuid(self.product_id),
            quantity: Quantity::from_db(self.quantity),
            price: Price::from_db(self.price),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    item: CartItemRow,
    inserted: bool,
}
