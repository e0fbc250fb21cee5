//! Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::CartItem;
pub use repository::CartRepository;
pub use value_object::{Price, Quantity};
