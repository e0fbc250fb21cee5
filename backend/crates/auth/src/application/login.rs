//! Login Use Case

use std::sync::Arc;

use platform::jwt::{JwtKeys, TokenPair};

use crate::application::config::AuthConfig;
use crate::application::{non_blank, token_subject};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct LoginOutput {
    pub user: User,
    pub tokens: TokenPair,
}

pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    keys: Arc<JwtKeys>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, keys: Arc<JwtKeys>) -> Self {
        Self { repo, config, keys }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let (Some(email), Some(password)) = (
            non_blank(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::validation("Email and password are required"));
        };

        // A malformed email cannot belong to anyone
        let Ok(email) = Email::new(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let raw_password = RawPassword::for_verification(password);
        if !user.password.verify(&raw_password, self.config.pepper()) {
            tracing::debug!(user_id = %user.user_id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self
            .keys
            .issue_pair(&token_subject(&user))
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.user_id, role = %user.role, "User logged in");

        Ok(LoginOutput { user, tokens })
    }
}
