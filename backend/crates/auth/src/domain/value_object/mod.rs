//! Value Object Module

pub mod display_name;
pub mod email;
pub mod reset_token;
pub mod user_password;
pub mod user_role;

pub use display_name::DisplayName;
pub use email::Email;
pub use reset_token::ResetToken;
pub use user_password::{RawPassword, UserPassword};
pub use user_role::UserRole;
