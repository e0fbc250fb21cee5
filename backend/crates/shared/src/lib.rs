//! Shared Kernel
//!
//! Vocabulary shared by every storefront service:
//! - The unified [`error::app_error::AppError`] and its HTTP mapping
//! - Typed UUID identifiers ([`id::UserId`], [`id::CartItemId`], [`id::ProductId`])
//!
//! Only things whose meaning is identical across services belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
