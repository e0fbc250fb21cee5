//! Application Layer

pub mod cart;

pub use cart::{AddItemInput, AddItemOutput, CartUseCase};
