//! Cart Backend Module
//!
//! Shopping cart lines keyed by user and product.
//!
//! - `domain/` - `CartItem`, quantity and price rules, repository trait
//! - `application/` - cart use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use error::{CartError, CartResult};
pub use infra::{InMemoryCartRepository, PgCartRepository};
pub use presentation::{CartAppState, cart_router};
