//! Cart Router

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::domain::repository::CartRepository;
use crate::presentation::handlers::{self, CartAppState};

/// `/api/cart` routes
///
/// `GET` on `/{id}` takes a user id, `PUT`/`DELETE` a cart item id.
pub fn cart_router<R>(state: CartAppState<R>) -> Router
where
    R: CartRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/cart", post(handlers::add_item::<R>))
        .route(
            "/api/cart/{id}",
            get(handlers::list_items::<R>)
                .put(handlers::update_item::<R>)
                .delete(handlers::remove_item::<R>),
        )
        .route("/api/cart/user/{user_id}", delete(handlers::clear_cart::<R>))
        .with_state(state)
}
