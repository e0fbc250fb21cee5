//! Change Password Use Case
//!
//! For a logged-in user who knows the current password. Rate limiting is
//! applied by the handler, keyed by user id.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::non_blank;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub const CHANGE_PASSWORD_SUCCESS: &str = "changePassword.success";

pub struct ChangePasswordInput {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

pub struct ChangePasswordUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, user_id: &UserId, input: ChangePasswordInput) -> AuthResult<()> {
        let (Some(old_password), Some(new_password), Some(confirm_password)) = (
            non_blank(input.old_password),
            non_blank(input.new_password),
            non_blank(input.confirm_password),
        ) else {
            return Err(AuthError::validation("changePassword.error"));
        };

        if new_password != confirm_password {
            return Err(AuthError::validation("changePassword.passwordsMismatch"));
        }

        let new_raw = RawPassword::new(new_password)
            .map_err(|_| AuthError::validation("changePassword.error"))?;

        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound("profile.user_not_found"))?;

        let old_raw = RawPassword::for_verification(old_password);
        if !user.password.verify(&old_raw, self.config.pepper()) {
            tracing::warn!(user_id = %user_id, "Change password with wrong current password");
            return Err(AuthError::validation("changePassword.oldPasswordIncorrect"));
        }

        let password = UserPassword::from_raw(&new_raw, self.config.pepper())?;
        user.change_password(password);

        if !self.repo.update(&user).await? {
            return Err(AuthError::NotFound("profile.user_not_found"));
        }

        tracing::info!(
            user_id = %user_id,
            password_change_count = user.password_change_count,
            "Password changed"
        );
        Ok(())
    }
}
