//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_password::UserPassword;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user; a taken email is `AuthError::EmailInUse`
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Look up by SHA-256 of a reset token; expiry is checked by the caller
    async fn find_by_reset_token_hash(&self, token_hash: &str) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// All users, oldest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Persist every mutable field; `false` if the user no longer exists
    async fn update(&self, user: &User) -> AuthResult<bool>;

    /// Store `password` only while `token_hash` is the user's unexpired reset
    /// token, clearing it in the same write; `false` if the token was already
    /// spent, replaced or expired
    async fn consume_reset_token(
        &self,
        user_id: &UserId,
        token_hash: &str,
        password: &UserPassword,
        now: DateTime<Utc>,
    ) -> AuthResult<bool>;

    /// `false` if there was nothing to delete
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;
}
