//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::CartAppState;
pub use router::cart_router;
