//! Forgot / Reset Password Use Cases
//!
//! No email is sent: the reset link is written to the log. The forgot
//! response is identical for known and unknown addresses.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::non_blank;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    reset_token::ResetToken,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub const FORGOT_PASSWORD_CHECK_EMAIL: &str = "forgotPassword.check_email";
pub const RESET_PASSWORD_SUCCESS: &str = "ResetPassword.success";

pub struct ForgotPasswordUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ForgotPasswordUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Returns the reset link when a token was issued (for logging and tests)
    pub async fn execute(&self, email: Option<String>) -> AuthResult<Option<String>> {
        let email = non_blank(email).ok_or_else(|| AuthError::validation("forgotPassword.error"))?;

        let Ok(email) = Email::new(email) else {
            return Ok(None);
        };

        let Some(mut user) = self.repo.find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(None);
        };

        let token = user.issue_reset_token(self.config.reset_token_ttl_chrono());
        if !self.repo.update(&user).await? {
            return Ok(None);
        }

        let link = self.config.reset_link(token.as_str());
        tracing::info!(user_id = %user.user_id, reset_link = %link, "Password reset link issued");

        Ok(Some(link))
    }
}

pub struct ResetPasswordInput {
    pub token: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

pub struct ResetPasswordUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ResetPasswordUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        let (Some(token), Some(password)) = (non_blank(input.token), non_blank(input.new_password))
        else {
            return Err(AuthError::validation("ResetPassword.error"));
        };

        if let Some(confirm) = non_blank(input.confirm_password) {
            if confirm != password {
                return Err(AuthError::validation("ResetPassword.passwordMismatch"));
            }
        }

        let raw_password =
            RawPassword::new(password).map_err(|_| AuthError::validation("ResetPassword.error"))?;

        let token = ResetToken::from_client(token);
        let invalid_link = || AuthError::validation("ResetPassword.invalidLink");

        let token_hash = token.hash();
        let user = self
            .repo
            .find_by_reset_token_hash(&token_hash)
            .await?
            .ok_or_else(invalid_link)?;

        if !user.reset_token_matches(&token, Utc::now()) {
            return Err(invalid_link());
        }

        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        // Only one request can spend a token
        if !self
            .repo
            .consume_reset_token(&user.user_id, &token_hash, &password, Utc::now())
            .await?
        {
            return Err(invalid_link());
        }

        tracing::info!(user_id = %user.user_id, "Password reset completed");
        Ok(())
    }
}
