//! Application Layer
//!
//! Use cases and application services.

pub mod admin;
pub mod change_password;
pub mod config;
pub mod login;
pub mod password_reset;
pub mod profile;
pub mod refresh;
pub mod register;

// Re-exports
pub use admin::{AdminUseCase, CreateAdminInput, UpdateUserInput};
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use password_reset::{ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase};
pub use profile::{ProfileUseCase, UpdateProfileInput};
pub use refresh::RefreshUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};

use platform::jwt::TokenSubject;

use crate::domain::entity::user::User;

/// Trimmed value, `None` when missing or blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Claims identity for a user
pub(crate) fn token_subject(user: &User) -> TokenSubject {
    TokenSubject {
        id: user.user_id.to_string(),
        email: user.email.to_string(),
        role: user.role.code().to_string(),
    }
}
