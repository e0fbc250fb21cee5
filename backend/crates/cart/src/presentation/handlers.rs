//! HTTP Handlers for `/api/cart`

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::{CartItemId, UserId};

use crate::application::cart::parse_id;
use crate::application::{AddItemInput, CartUseCase};
use crate::domain::repository::CartRepository;
use crate::error::{CartError, CartResult};
use crate::presentation::dto::{AddItemRequest, CartItemResponse, UpdateQuantityRequest};

/// Shared state for cart handlers
#[derive(Clone)]
pub struct CartAppState<R>
where
    R: CartRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

impl<R> CartAppState<R>
where
    R: CartRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    fn use_case(&self) -> CartUseCase<R> {
        CartUseCase::new(self.repo.clone())
    }
}

/// Malformed JSON is a 400 with a `message`, like every other input error
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> CartResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| CartError::validation(rejection.body_text()))
}

/// GET /api/cart/{userId}
pub async fn list_items<R>(
    State(state): State<CartAppState<R>>,
    Path(user_id): Path<String>,
) -> CartResult<Json<Vec<CartItemResponse>>>
where
    R: CartRepository + Clone + Send + Sync + 'static,
{
    let user_id: UserId = parse_id(&user_id, "userId")?;
    let items = state.use_case().list(&user_id).await?;

    Ok(Json(items.iter().map(CartItemResponse::from).collect()))
}

/// POST /api/cart
///
/// 201 for a new line, 200 when an existing line was incremented.
pub async fn add_item<R>(
    State(state): State<CartAppState<R>>,
    body: Result<Json<AddItemRequest>, JsonRejection>,
) -> CartResult<impl IntoResponse>
where
    R: CartRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let output = state
        .use_case()
        .add(AddItemInput {
            user_id: req.user_id,
            product_id: req.product_id,
            quantity: req.quantity,
            price: req.price,
        })
        .await?;

    let status = if output.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(CartItemResponse::from(&output.item))))
}

/// PUT /api/cart/{id}
pub async fn update_item<R>(
    State(state): State<CartAppState<R>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> CartResult<Json<CartItemResponse>>
where
    R: CartRepository + Clone + Send + Sync + 'static,
{
    let cart_item_id: CartItemId = parse_id(&id, "cart item id")?;
    let req = json_body(body)?;

    let item = state
        .use_case()
        .update_quantity(&cart_item_id, req.quantity)
        .await?;

    Ok(Json(CartItemResponse::from(&item)))
}

/// DELETE /api/cart/{id}
pub async fn remove_item<R>(
    State(state): State<CartAppState<R>>,
    Path(id): Path<String>,
) -> CartResult<StatusCode>
where
    R: CartRepository + Clone + Send + Sync + 'static,
{
    let cart_item_id: CartItemId = parse_id(&id, "cart item id")?;
    state.use_case().remove(&cart_item_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/cart/user/{userId}
pub async fn clear_cart<R>(
    State(state): State<CartAppState<R>>,
    Path(user_id): Path<String>,
) -> CartResult<StatusCode>
where
    R: CartRepository + Clone + Send + Sync + 'static,
{
    let user_id: UserId = parse_id(&user_id, "userId")?;
    state.use_case().clear(&user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
